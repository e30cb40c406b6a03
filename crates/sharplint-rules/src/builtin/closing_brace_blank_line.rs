//! SA1508: closing curly brackets must not be preceded by blank line

use sharplint_core::context::{TokenContext, TokenId};
use sharplint_core::cst::{BlankLine, CsSyntaxKind};
use sharplint_core::{
    Fix, FixCapability, Fixer, Rule, RuleCategory, RuleMetadata, Severity, Violation,
};

pub const CLOSING_BRACE_BLANK_LINE: &str = "SA1508";

static METADATA: RuleMetadata = RuleMetadata {
    id: CLOSING_BRACE_BLANK_LINE,
    title: "Closing curly brackets must not be preceded by blank line",
    description: "A closing curly bracket within a C# element, statement, or expression is \
                  preceded by a blank line.",
    category: RuleCategory::Layout,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1508.html",
};

fn blank_lines_before_brace(ctx: &TokenContext, id: TokenId) -> Vec<BlankLine> {
    if ctx.is_missing(id) {
        return Vec::new();
    }
    ctx.blank_lines_before(id)
}

/// Rule SA1508
pub struct ClosingBraceBlankLine;

impl Rule for ClosingBraceBlankLine {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        ctx.tokens_of_kind(CsSyntaxKind::CloseBrace)
            .filter_map(|id| blank_lines_before_brace(ctx, id).into_iter().next())
            .map(|blank| {
                Violation::new(
                    CLOSING_BRACE_BLANK_LINE,
                    METADATA.title,
                    blank.end_of_line,
                    METADATA.default_severity,
                )
            })
            .collect()
    }

    fn fixer(&self) -> Option<&dyn Fixer> {
        Some(self)
    }
}

impl Fixer for ClosingBraceBlankLine {
    fn capability(&self) -> FixCapability {
        FixCapability::BATCH
    }

    fn title(&self) -> &'static str {
        "Remove blank lines before closing curly bracket"
    }

    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix> {
        let lines = ctx
            .tokens_of_kind(CsSyntaxKind::CloseBrace)
            .map(|id| blank_lines_before_brace(ctx, id))
            .find(|lines| {
                lines
                    .first()
                    .is_some_and(|blank| blank.end_of_line == violation.range)
            })?;
        super::remove_blank_lines(ctx, CLOSING_BRACE_BLANK_LINE, self.title(), &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_utils::{check, fix_all, fix_first};

    const ENABLED: &str = "public bool Enabled\n{\n    get { return this.enabled; }\n\n}\n";

    #[test]
    fn test_blank_line_before_final_brace() {
        let violations = check(&ClosingBraceBlankLine, ENABLED);
        assert_eq!(violations.len(), 1);
        // second line break of "}\n\n}"
        let start = ENABLED.rfind("\n\n").unwrap() + 1;
        assert_eq!(usize::from(violations[0].range.start()), start);
        assert_eq!(usize::from(violations[0].range.len()), 1);
    }

    #[test]
    fn test_independent_braces() {
        let source = "class A\n{\n    void F()\n    {\n        x();\n\n    }\n\n    \n}\n";
        let violations = check(&ClosingBraceBlankLine, source);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].range.start() < violations[1].range.start());
    }

    #[test]
    fn test_no_blank_line() {
        assert!(check(&ClosingBraceBlankLine, "class A\n{\n    int x;\n}\n").is_empty());
        assert!(check(&ClosingBraceBlankLine, "class A { }").is_empty());
        // A comment breaks the run of empty lines
        assert!(
            check(&ClosingBraceBlankLine, "class A\n{\n    int x;\n    // end\n}\n").is_empty()
        );
    }

    #[test]
    fn test_blank_line_before_comment_counts() {
        let source = "class A\n{\n    int x;\n\n    // end\n}\n";
        assert_eq!(check(&ClosingBraceBlankLine, source).len(), 1);
    }

    #[test]
    fn test_fix() {
        assert_eq!(
            fix_first(&ClosingBraceBlankLine, ENABLED).as_deref(),
            Some("public bool Enabled\n{\n    get { return this.enabled; }\n}\n")
        );
        assert_eq!(
            fix_all(&ClosingBraceBlankLine, "{\n    x;\n\n  \n\n}\n"),
            "{\n    x;\n}\n"
        );
    }
}
