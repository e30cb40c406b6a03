//! SA1012: opening curly brackets must be spaced correctly
//!
//! An opening curly bracket that is not first on its line must be preceded
//! by a space, unless it directly follows an opening parenthesis, in which
//! case it must not be. Unless it is last on its line it must be followed by
//! a space. Both sides are checked independently.
//!
//! ```csharp
//! var a = new[]{1, 2};   // preceded and followed
//! F({ x });              // fine: no space after `(`
//! F( { x });             // must not be preceded
//! ```

use rowan::TextRange;
use sharplint_core::context::{TokenContext, TokenId};
use sharplint_core::cst::{CsSyntaxKind, edit};
use sharplint_core::{
    Fix, FixCapability, Fixer, Rule, RuleCategory, RuleMetadata, Severity, Violation,
};

pub const OPENING_BRACE_SPACING: &str = "SA1012";

static METADATA: RuleMetadata = RuleMetadata {
    id: OPENING_BRACE_SPACING,
    title: "Opening curly brackets must be spaced correctly",
    description: "An opening curly bracket within a C# element is not spaced correctly.",
    category: RuleCategory::Spacing,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1012.html",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpacingIssue {
    /// Whitespace between `(` and `{`
    UnexpectedSpaceBefore,
    MissingSpaceBefore,
    MissingSpaceAfter,
}

impl SpacingIssue {
    fn message(self) -> &'static str {
        match self {
            SpacingIssue::UnexpectedSpaceBefore => {
                "Opening curly bracket must not be preceded by a space."
            }
            SpacingIssue::MissingSpaceBefore => {
                "Opening curly bracket must be preceded by a space."
            }
            SpacingIssue::MissingSpaceAfter => "Opening curly bracket must be followed by a space.",
        }
    }
}

/// Issues of one `{` with the range each is reported at
///
/// An unexpected space is reported at the space, a missing leading space at
/// the bracket and a missing trailing space at the empty range after it.
fn spacing_issues(ctx: &TokenContext, id: TokenId) -> Vec<(SpacingIssue, TextRange)> {
    let mut issues = Vec::new();
    if ctx.is_missing(id) {
        return issues;
    }
    let range = ctx.range(id);

    if !ctx.is_first_in_line(id)
        && let Some(preceding) = ctx.preceding_token(id)
    {
        let preceded_by_space = !ctx.gap_trivia(id).is_empty();
        if ctx.kind(preceding) == CsSyntaxKind::OpenParen {
            if preceded_by_space {
                issues.push((
                    SpacingIssue::UnexpectedSpaceBefore,
                    TextRange::new(ctx.range(preceding).end(), range.start()),
                ));
            }
        } else if !preceded_by_space {
            issues.push((SpacingIssue::MissingSpaceBefore, range));
        }
    }

    if !ctx.is_last_in_line(id) && ctx.trailing_trivia(id).is_empty() {
        issues.push((
            SpacingIssue::MissingSpaceAfter,
            TextRange::empty(range.end()),
        ));
    }

    issues
}

/// Rule SA1012
pub struct OpeningBraceSpacing;

impl Rule for OpeningBraceSpacing {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        ctx.tokens_of_kind(CsSyntaxKind::OpenBrace)
            .flat_map(|id| spacing_issues(ctx, id))
            .map(|(issue, range)| {
                Violation::new(
                    OPENING_BRACE_SPACING,
                    issue.message(),
                    range,
                    METADATA.default_severity,
                )
            })
            .collect()
    }

    fn fixer(&self) -> Option<&dyn Fixer> {
        Some(self)
    }
}

impl Fixer for OpeningBraceSpacing {
    fn capability(&self) -> FixCapability {
        FixCapability::BATCH
    }

    fn title(&self) -> &'static str {
        "Fix spacing around opening curly bracket"
    }

    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix> {
        let (id, issue) = ctx.tokens_of_kind(CsSyntaxKind::OpenBrace).find_map(|id| {
            spacing_issues(ctx, id)
                .into_iter()
                .find(|(_, range)| *range == violation.range)
                .map(|(issue, _)| (id, issue))
        })?;
        let brace = ctx.token(id);
        let range = ctx.range(id);

        let (root, edited, description) = match issue {
            SpacingIssue::UnexpectedSpaceBefore => {
                let spaces = ctx.trivia_tokens_in(violation.range);
                // Comments between `(` and `{` stay where they are
                if spaces.iter().any(|t| t.kind() != CsSyntaxKind::Whitespace) {
                    return None;
                }
                (
                    edit::remove_tokens(ctx.root(), &spaces),
                    violation.range,
                    "Remove space before opening curly bracket",
                )
            }
            SpacingIssue::MissingSpaceBefore => (
                edit::insert_token_before(brace, CsSyntaxKind::Whitespace, " ")?,
                TextRange::empty(range.start()),
                "Insert space before opening curly bracket",
            ),
            SpacingIssue::MissingSpaceAfter => (
                edit::insert_token_after(brace, CsSyntaxKind::Whitespace, " ")?,
                TextRange::empty(range.end()),
                "Insert space after opening curly bracket",
            ),
        };

        Some(Fix::new(OPENING_BRACE_SPACING, description, root, edited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_utils::{check, fix_all, range_of};

    fn messages(source: &str) -> Vec<&'static str> {
        let mut found: Vec<&'static str> = check(&OpeningBraceSpacing, source)
            .iter()
            .map(|v| match v.message.as_str() {
                m if m.contains("not be preceded") => "not-preceded",
                m if m.contains("be preceded") => "preceded",
                _ => "followed",
            })
            .collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn test_well_spaced_braces() {
        assert!(messages("class A { int x; }\n").is_empty());
        assert!(messages("class A\n{\n    get { return 1; }\n}\n").is_empty());
        assert!(messages("F({ x });").is_empty());
    }

    #[test]
    fn test_missing_space_before_and_after() {
        let source = "var a = new[]{1, 2 };";
        assert_eq!(messages(source), vec!["followed", "preceded"]);

        let violations = check(&OpeningBraceSpacing, source);
        let brace = range_of(source, "{", 0);
        assert!(violations.iter().any(|v| v.range == brace));
        assert!(
            violations
                .iter()
                .any(|v| v.range == TextRange::empty(brace.end()))
        );
    }

    #[test]
    fn test_space_after_open_paren() {
        let source = "F( { x });";
        let violations = check(&OpeningBraceSpacing, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Opening curly bracket must not be preceded by a space."
        );
        assert_eq!(violations[0].range, range_of(source, " ", 0));
    }

    #[test]
    fn test_first_in_line_never_checks_leading_space() {
        for previous in ["(", "=", ")", "x", "]"] {
            let source = format!("{previous}\n{{ y }}\n");
            let leading = messages(&source)
                .into_iter()
                .filter(|m| *m != "followed")
                .count();
            assert_eq!(leading, 0, "{source:?}");

            let indented = format!("{previous}\n    {{ y }}\n");
            assert!(messages(&indented).is_empty(), "{indented:?}");
        }
    }

    #[test]
    fn test_brace_after_open_paren_flags_space_only() {
        assert_eq!(messages("F({x });"), vec!["followed"]);
        assert_eq!(messages("F( {x });"), vec!["followed", "not-preceded"]);
        assert!(messages("F({ x });").is_empty());
    }

    #[test]
    fn test_last_in_line_needs_no_trailing_space() {
        assert!(messages("class A {\n}\n").is_empty());
        assert!(messages("class A {").is_empty());
        // Any trailing trivia counts as the space
        assert!(messages("class A {// c\n}\n").is_empty());
        assert_eq!(messages("class A {x }\n"), vec!["followed"]);
    }

    #[test]
    fn test_missing_tokens_are_skipped() {
        let ctx = crate::builtin::test_utils::context("F({");
        assert!(OpeningBraceSpacing.check(&ctx).is_empty());
    }

    #[test]
    fn test_fixes() {
        assert_eq!(
            fix_all(&OpeningBraceSpacing, "var a = new[]{1, 2 };"),
            "var a = new[] { 1, 2 };"
        );
        assert_eq!(fix_all(&OpeningBraceSpacing, "F(  { x });"), "F({ x });");
        assert_eq!(fix_all(&OpeningBraceSpacing, "F( /* c */ { x });"), "F( /* c */ { x });");
        assert_eq!(fix_all(&OpeningBraceSpacing, "class A{}"), "class A { }");
    }
}
