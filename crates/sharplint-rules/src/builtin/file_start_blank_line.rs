//! SA1517: code must not contain blank lines at start of file
//!
//! Reported once per file, at the first line break in the trivia before the
//! first token. The fix only removes lines holding nothing but whitespace.

use sharplint_core::context::TokenContext;
use sharplint_core::cst::{BlankLine, TriviaToken, trivia};
use sharplint_core::{
    Fix, FixCapability, Fixer, Rule, RuleCategory, RuleMetadata, Severity, Violation,
};

pub const FILE_START_BLANK_LINE: &str = "SA1517";

static METADATA: RuleMetadata = RuleMetadata {
    id: FILE_START_BLANK_LINE,
    title: "Code must not contain blank lines at start of file",
    description: "The code file has blank lines at the start.",
    category: RuleCategory::Layout,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    help_link: "http://www.stylecop.com/docs/SA1517.html",
};

fn first_end_of_line(ctx: &TokenContext) -> Option<&TriviaToken> {
    let first = ctx.first_token()?;
    ctx.leading_trivia(first)
        .iter()
        .find(|token| token.is_end_of_line())
}

fn leading_blank_lines(ctx: &TokenContext) -> Vec<BlankLine> {
    match ctx.first_token() {
        Some(first) => trivia::leading_blank_lines(ctx.leading_trivia(first)),
        None => Vec::new(),
    }
}

/// Rule SA1517
pub struct FileStartBlankLine;

impl Rule for FileStartBlankLine {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &TokenContext) -> Vec<Violation> {
        first_end_of_line(ctx)
            .map(|end_of_line| {
                Violation::new(
                    FILE_START_BLANK_LINE,
                    METADATA.title,
                    end_of_line.range,
                    METADATA.default_severity,
                )
            })
            .into_iter()
            .collect()
    }

    fn fixer(&self) -> Option<&dyn Fixer> {
        Some(self)
    }
}

impl Fixer for FileStartBlankLine {
    fn capability(&self) -> FixCapability {
        FixCapability::BATCH
    }

    fn title(&self) -> &'static str {
        "Remove blank lines at start of file"
    }

    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix> {
        if first_end_of_line(ctx)?.range != violation.range {
            return None;
        }
        // A leading comment line stays; nothing to remove then
        let lines = leading_blank_lines(ctx);
        super::remove_blank_lines(ctx, FILE_START_BLANK_LINE, self.title(), &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_utils::{check, fix_first};

    #[test]
    fn test_two_newlines_then_declaration() {
        let violations = check(&FileStartBlankLine, "\n\nclass A { }\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(usize::from(violations[0].range.start()), 0);
        assert_eq!(usize::from(violations[0].range.len()), 1);
        assert_eq!(violations[0].message, "Code must not contain blank lines at start of file");
    }

    #[test]
    fn test_single_blank_line_reports_once() {
        for source in ["\nclass A { }\n", "  \nclass A { }\n", "\r\n\r\n\r\nclass A { }\n"] {
            assert_eq!(check(&FileStartBlankLine, source).len(), 1, "{source:?}");
        }
    }

    #[test]
    fn test_no_line_break_before_code() {
        for source in ["class A { }\n\n", "  class A { }\n", "", "/* a */ class A { }\n"] {
            assert!(check(&FileStartBlankLine, source).is_empty(), "{source:?}");
        }
    }

    #[test]
    fn test_line_break_after_leading_comment() {
        for (source, start) in [
            ("// header\nclass A { }\n", 9),
            ("// header\n\nclass A { }\n", 9),
            ("#region R\n\nclass A { }\n", 9),
            ("/// <summary/>\nclass A { }\n", 14),
        ] {
            let violations = check(&FileStartBlankLine, source);
            assert_eq!(violations.len(), 1, "{source:?}");
            assert_eq!(usize::from(violations[0].range.start()), start, "{source:?}");
            assert_eq!(usize::from(violations[0].range.len()), 1, "{source:?}");
        }
    }

    #[test]
    fn test_comment_line_is_not_removed() {
        assert_eq!(fix_first(&FileStartBlankLine, "// header\nclass A { }\n"), None);
        assert_eq!(fix_first(&FileStartBlankLine, "// header\n\nclass A { }\n"), None);
    }

    #[test]
    fn test_file_of_blank_lines() {
        // The first token is the zero-width end of file
        assert_eq!(check(&FileStartBlankLine, "\n\n").len(), 1);
    }

    #[test]
    fn test_fix() {
        assert_eq!(
            fix_first(&FileStartBlankLine, "\n \n\nclass A { }\n").as_deref(),
            Some("class A { }\n")
        );
        assert_eq!(
            fix_first(&FileStartBlankLine, "\n// header\nclass A { }\n").as_deref(),
            Some("// header\nclass A { }\n")
        );
    }
}
