//! SA1506: element documentation headers must not be followed by blank line
//!
//! ```csharp
//! /// <summary>
//! /// Gets a value.
//! /// </summary>
//!
//! public bool Enabled
//! ```

use sharplint_core::context::{TokenContext, TokenId};
use sharplint_core::cst::trivia::{self, TriviaKind};
use sharplint_core::cst::BlankLine;
use sharplint_core::{
    Fix, FixCapability, Fixer, Rule, RuleCategory, RuleMetadata, Severity, Violation,
};

pub const DOC_HEADER_BLANK_LINE: &str = "SA1506";

static METADATA: RuleMetadata = RuleMetadata {
    id: DOC_HEADER_BLANK_LINE,
    title: "Element documentation headers must not be followed by blank line",
    description: "An element documentation header above a C# element is followed by a blank line.",
    category: RuleCategory::Layout,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1506.html",
};

/// Blank lines between the last documentation comment before `id` and `id`
fn header_blank_lines(ctx: &TokenContext, id: TokenId) -> Vec<BlankLine> {
    if ctx.is_zero_width(id) {
        return Vec::new();
    }
    let gap = ctx.gap_trivia(id);
    match gap.iter().rposition(|t| t.kind == TriviaKind::DocComment) {
        Some(last_doc) => trivia::blank_lines(&gap[last_doc + 1..], false),
        None => Vec::new(),
    }
}

/// Rule SA1506
pub struct DocHeaderBlankLine;

impl Rule for DocHeaderBlankLine {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        ctx.tokens()
            .filter_map(|id| header_blank_lines(ctx, id).into_iter().next())
            .map(|blank| {
                Violation::new(
                    DOC_HEADER_BLANK_LINE,
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

impl Fixer for DocHeaderBlankLine {
    fn capability(&self) -> FixCapability {
        FixCapability::BATCH
    }

    fn title(&self) -> &'static str {
        "Remove blank lines after documentation header"
    }

    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix> {
        let lines = ctx.tokens().map(|id| header_blank_lines(ctx, id)).find(|lines| {
            lines
                .first()
                .is_some_and(|blank| blank.end_of_line == violation.range)
        })?;
        super::remove_blank_lines(ctx, DOC_HEADER_BLANK_LINE, self.title(), &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_utils::{check, fix_all};

    const HEADER: &str = "/// <summary>\n/// Gets a value.\n/// </summary>\n";

    #[test]
    fn test_blank_line_after_header() {
        let nested = "class A\n{\n    /// <summary>\n    /// Gets a value.\n    /// </summary>\n    public bool Enabled;\n}\n";
        assert!(check(&DocHeaderBlankLine, nested).is_empty());

        let source = format!("{HEADER}\npublic class A\n{{\n}}\n");
        let violations = check(&DocHeaderBlankLine, &source);
        assert_eq!(violations.len(), 1);
        // the line break closing the blank line
        assert_eq!(usize::from(violations[0].range.start()), HEADER.len());
        assert_eq!(usize::from(violations[0].range.len()), 1);
    }

    #[test]
    fn test_blank_line_before_header_is_fine() {
        let source = format!("int x;\n\n{HEADER}public class A {{ }}\n");
        assert!(check(&DocHeaderBlankLine, &source).is_empty());
    }

    #[test]
    fn test_plain_comments_are_not_headers() {
        assert!(check(&DocHeaderBlankLine, "// note\n\nclass A { }\n").is_empty());
        assert!(check(&DocHeaderBlankLine, "/* note */\n\nclass A { }\n").is_empty());
    }

    #[test]
    fn test_comment_between_header_and_element() {
        let source = format!("{HEADER}\n// TODO\nclass A {{ }}\n");
        assert_eq!(check(&DocHeaderBlankLine, &source).len(), 1);
    }

    #[test]
    fn test_fix_removes_every_blank_line() {
        let source = format!("{HEADER}\n   \n\npublic class A {{ }}\n");
        assert_eq!(
            fix_all(&DocHeaderBlankLine, &source),
            format!("{HEADER}public class A {{ }}\n")
        );
    }

    #[test]
    fn test_header_at_end_of_file_is_ignored() {
        let source = format!("class A {{ }}\n{HEADER}\n");
        assert!(check(&DocHeaderBlankLine, &source).is_empty());
    }
}
