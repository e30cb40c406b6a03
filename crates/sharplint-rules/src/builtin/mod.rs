//! Built-in rules
//!
//! - [`opening_brace_spacing`]: SA1012
//! - [`precedence`]: SA1407, SA1408
//! - [`doc_header_blank_line`]: SA1506
//! - [`closing_brace_blank_line`]: SA1508
//! - [`file_start_blank_line`]: SA1517

use rowan::TextRange;
use sharplint_core::context::TokenContext;
use sharplint_core::cst::{BlankLine, edit};
use sharplint_core::{Fix, Rule};

pub mod closing_brace_blank_line;
pub mod doc_header_blank_line;
pub mod file_start_blank_line;
pub mod opening_brace_spacing;
pub mod precedence;

pub use closing_brace_blank_line::ClosingBraceBlankLine;
pub use doc_header_blank_line::DocHeaderBlankLine;
pub use file_start_blank_line::FileStartBlankLine;
pub use opening_brace_spacing::OpeningBraceSpacing;
pub use precedence::{ArithmeticPrecedence, ConditionalPrecedence};

/// Every built-in rule in evaluation order
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(OpeningBraceSpacing),
        Box::new(ArithmeticPrecedence),
        Box::new(ConditionalPrecedence),
        Box::new(DocHeaderBlankLine),
        Box::new(ClosingBraceBlankLine),
        Box::new(FileStartBlankLine),
    ]
}

/// Fix deleting the whitespace and line break of each blank line
///
/// Returns `None` when `lines` is empty.
pub(crate) fn remove_blank_lines(
    ctx: &TokenContext,
    rule_id: &str,
    description: &str,
    lines: &[BlankLine],
) -> Option<Fix> {
    let (first, last) = (lines.first()?, lines.last()?);
    let tokens: Vec<_> = lines
        .iter()
        .flat_map(|line| ctx.trivia_tokens_in(line.span))
        .collect();
    if tokens.is_empty() {
        return None;
    }
    let root = edit::remove_tokens(ctx.root(), &tokens);
    Some(Fix::new(
        rule_id,
        description,
        root,
        TextRange::new(first.span.start(), last.span.end()),
    ))
}
