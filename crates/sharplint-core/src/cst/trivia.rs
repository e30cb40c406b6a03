//! Trivia classification for the C# CST
//!
//! Trivia (whitespace, line breaks, comments, directives) is stored in the
//! tree as ordinary tokens. This module copies trivia out of the tree into
//! [`TriviaToken`] values and answers the layout questions the rules ask of a
//! trivia sequence, most importantly whether it contains a blank line.
//!
//! # Attachment
//!
//! Between two tokens, trivia up to and including the first line break is
//! the *trailing* trivia of the earlier token; the rest is the *leading*
//! trivia of the later one. Everything before the first token of a file is
//! leading trivia. See [`split_attached`].
//!
//! # Blank lines
//!
//! A blank line is a line holding nothing but whitespace. In a trivia
//! sequence it shows up as a line break reached while still at the start of
//! a line. The *terminating* line break is reported as the blank line's
//! anchor.
//!
//! ```text
//! x;⏎        <- trailing trivia of `;`
//! ····⏎      <- blank line: whitespace + terminating line break
//! }
//! ```

use rowan::{TextRange, TextSize};

use super::{CsSyntaxKind, CsSyntaxToken};

/// Kind of a trivia token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    DocComment,
    BlockComment,
    Directive,
}

impl TriviaKind {
    /// Classify a syntax kind, `None` for non-trivia kinds
    pub const fn from_syntax_kind(kind: CsSyntaxKind) -> Option<Self> {
        match kind {
            CsSyntaxKind::Whitespace => Some(Self::Whitespace),
            CsSyntaxKind::Newline => Some(Self::EndOfLine),
            CsSyntaxKind::LineComment => Some(Self::SingleLineComment),
            CsSyntaxKind::DocComment => Some(Self::DocComment),
            CsSyntaxKind::BlockComment => Some(Self::BlockComment),
            CsSyntaxKind::Directive => Some(Self::Directive),
            _ => None,
        }
    }

    pub const fn syntax_kind(self) -> CsSyntaxKind {
        match self {
            Self::Whitespace => CsSyntaxKind::Whitespace,
            Self::EndOfLine => CsSyntaxKind::Newline,
            Self::SingleLineComment => CsSyntaxKind::LineComment,
            Self::DocComment => CsSyntaxKind::DocComment,
            Self::BlockComment => CsSyntaxKind::BlockComment,
            Self::Directive => CsSyntaxKind::Directive,
        }
    }
}

/// A single trivia token copied out of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaToken {
    pub kind: TriviaKind,
    pub text: String,
    /// Position in the tree the token was copied from
    pub range: TextRange,
}

impl TriviaToken {
    pub fn new(kind: TriviaKind, text: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// Copy a tree token, `None` if it is not trivia
    pub fn from_token(token: &CsSyntaxToken) -> Option<Self> {
        let kind = TriviaKind::from_syntax_kind(token.kind())?;
        Some(Self {
            kind,
            text: token.text().to_string(),
            range: token.text_range(),
        })
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TriviaKind::Whitespace
    }

    pub fn is_end_of_line(&self) -> bool {
        self.kind == TriviaKind::EndOfLine
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.kind,
            TriviaKind::SingleLineComment | TriviaKind::DocComment | TriviaKind::BlockComment
        )
    }
}

/// A blank line found in a trivia sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankLine {
    /// The line break terminating the blank line
    pub end_of_line: TextRange,
    /// The whole blank line: its whitespace plus the terminating line break
    pub span: TextRange,
}

/// All blank lines of `trivia`, in order
///
/// `at_line_start` tells whether the sequence begins at the start of a line
/// (start of file); otherwise it is assumed to follow a token on the same
/// line.
pub fn blank_lines(trivia: &[TriviaToken], at_line_start: bool) -> Vec<BlankLine> {
    let mut found = Vec::new();
    // Start offset of the current line while nothing but whitespace is on it
    let mut line_begin: Option<TextSize> = if at_line_start {
        trivia.first().map(|t| t.range.start())
    } else {
        None
    };

    for token in trivia {
        match token.kind {
            TriviaKind::EndOfLine => {
                if let Some(begin) = line_begin {
                    found.push(BlankLine {
                        end_of_line: token.range,
                        span: TextRange::new(begin, token.range.end()),
                    });
                }
                line_begin = Some(token.range.end());
            }
            TriviaKind::Whitespace => {}
            _ => line_begin = None,
        }
    }

    found
}

/// First blank line of `trivia`, see [`blank_lines`]
pub fn first_blank_line(trivia: &[TriviaToken], at_line_start: bool) -> Option<BlankLine> {
    blank_lines(trivia, at_line_start).into_iter().next()
}

/// Check for two line breaks separated by nothing but whitespace
pub fn has_blank_line(trivia: &[TriviaToken]) -> bool {
    first_blank_line(trivia, false).is_some()
}

/// Kind of the first trivia token that is not whitespace
pub fn first_significant(trivia: &[TriviaToken]) -> Option<TriviaKind> {
    trivia
        .iter()
        .find(|token| !token.is_whitespace())
        .map(|token| token.kind)
}

/// Split the trivia between two tokens into (trailing, leading)
///
/// Trailing trivia runs up to and including the first line break.
pub fn split_attached(trivia: &[TriviaToken]) -> (&[TriviaToken], &[TriviaToken]) {
    match trivia.iter().position(TriviaToken::is_end_of_line) {
        Some(index) => trivia.split_at(index + 1),
        None => (trivia, &[]),
    }
}

/// Leading blank lines of a sequence that starts at the start of a line
///
/// Stops at the first comment or directive.
pub fn leading_blank_lines(trivia: &[TriviaToken]) -> Vec<BlankLine> {
    let end = trivia
        .iter()
        .position(|token| !token.is_whitespace() && !token.is_end_of_line())
        .unwrap_or(trivia.len());
    blank_lines(&trivia[..end], true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a contiguous trivia sequence from (kind, text) pairs
    fn seq(parts: &[(TriviaKind, &str)]) -> Vec<TriviaToken> {
        let mut offset = 0u32;
        parts
            .iter()
            .map(|(kind, text)| {
                let start = TextSize::from(offset);
                offset += text.len() as u32;
                TriviaToken::new(*kind, *text, TextRange::new(start, TextSize::from(offset)))
            })
            .collect()
    }

    use TriviaKind::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            TriviaKind::from_syntax_kind(CsSyntaxKind::Newline),
            Some(EndOfLine)
        );
        assert_eq!(TriviaKind::from_syntax_kind(CsSyntaxKind::OpenBrace), None);
        for kind in [
            Whitespace,
            EndOfLine,
            SingleLineComment,
            DocComment,
            BlockComment,
            Directive,
        ] {
            assert_eq!(TriviaKind::from_syntax_kind(kind.syntax_kind()), Some(kind));
        }
    }

    #[test]
    fn test_two_line_breaks_make_a_blank_line() {
        let trivia = seq(&[(EndOfLine, "\n"), (EndOfLine, "\n")]);
        assert!(has_blank_line(&trivia));
        let blank = first_blank_line(&trivia, false).unwrap();
        assert_eq!(blank.end_of_line, TextRange::new(1.into(), 2.into()));
    }

    #[test]
    fn test_whitespace_only_line_is_blank() {
        let trivia = seq(&[(EndOfLine, "\n"), (Whitespace, "    "), (EndOfLine, "\n")]);
        let blank = first_blank_line(&trivia, false).unwrap();
        assert_eq!(blank.span, TextRange::new(1.into(), 6.into()));
        assert_eq!(blank.end_of_line, TextRange::new(5.into(), 6.into()));
    }

    #[test]
    fn test_comment_line_is_not_blank() {
        let trivia = seq(&[
            (EndOfLine, "\n"),
            (Whitespace, "  "),
            (SingleLineComment, "// note"),
            (EndOfLine, "\n"),
        ]);
        assert!(!has_blank_line(&trivia));
    }

    #[test]
    fn test_single_line_break_is_not_blank() {
        assert!(!has_blank_line(&seq(&[(Whitespace, " "), (EndOfLine, "\n")])));
        assert!(!has_blank_line(&[]));
    }

    #[test]
    fn test_line_start_makes_first_break_blank() {
        let trivia = seq(&[(EndOfLine, "\n"), (EndOfLine, "\n")]);
        let blank = first_blank_line(&trivia, true).unwrap();
        assert_eq!(blank.end_of_line, TextRange::new(0.into(), 1.into()));
        assert_eq!(blank_lines(&trivia, true).len(), 2);
    }

    #[test]
    fn test_first_significant() {
        let trivia = seq(&[(Whitespace, " "), (DocComment, "/// x"), (EndOfLine, "\n")]);
        assert_eq!(first_significant(&trivia), Some(DocComment));
        assert_eq!(first_significant(&seq(&[(Whitespace, " ")])), None);
    }

    #[test]
    fn test_split_attached_at_first_line_break() {
        let trivia = seq(&[
            (Whitespace, " "),
            (SingleLineComment, "// tail"),
            (EndOfLine, "\n"),
            (EndOfLine, "\n"),
            (Whitespace, "    "),
        ]);
        let (trailing, leading) = split_attached(&trivia);
        assert_eq!(trailing.len(), 3);
        assert_eq!(leading.len(), 2);

        let same_line = seq(&[(Whitespace, " ")]);
        let (trailing, leading) = split_attached(&same_line);
        assert_eq!(trailing.len(), 1);
        assert!(leading.is_empty());
    }

    #[test]
    fn test_leading_blank_lines_stop_at_comment() {
        let trivia = seq(&[
            (EndOfLine, "\n"),
            (EndOfLine, "\n"),
            (SingleLineComment, "// c"),
            (EndOfLine, "\n"),
            (EndOfLine, "\n"),
        ]);
        assert_eq!(blank_lines(&trivia, true).len(), 3);
        assert_eq!(leading_blank_lines(&trivia).len(), 2);
    }
}
