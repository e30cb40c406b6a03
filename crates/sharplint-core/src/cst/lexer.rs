//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating
//! the token texts reproduces the source. The token stream always ends
//! with a zero-width [`CsSyntaxKind::EndOfFile`] token.

use crate::cst::CsSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: CsSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Multi-character operators, longest first
const OPERATORS: &[(&str, CsSyntaxKind)] = &[
    ("??=", CsSyntaxKind::CompoundAssign),
    ("<<=", CsSyntaxKind::CompoundAssign),
    (">>=", CsSyntaxKind::CompoundAssign),
    ("=>", CsSyntaxKind::Arrow),
    ("==", CsSyntaxKind::EqEq),
    ("!=", CsSyntaxKind::BangEq),
    ("<=", CsSyntaxKind::LtEq),
    (">=", CsSyntaxKind::GtEq),
    ("&&", CsSyntaxKind::AmpAmp),
    ("||", CsSyntaxKind::PipePipe),
    ("++", CsSyntaxKind::PlusPlus),
    ("--", CsSyntaxKind::MinusMinus),
    ("+=", CsSyntaxKind::CompoundAssign),
    ("-=", CsSyntaxKind::CompoundAssign),
    ("*=", CsSyntaxKind::CompoundAssign),
    ("/=", CsSyntaxKind::CompoundAssign),
    ("%=", CsSyntaxKind::CompoundAssign),
    ("&=", CsSyntaxKind::CompoundAssign),
    ("|=", CsSyntaxKind::CompoundAssign),
    ("^=", CsSyntaxKind::CompoundAssign),
    ("<<", CsSyntaxKind::LtLt),
    (">>", CsSyntaxKind::GtGt),
    ("??", CsSyntaxKind::QuestionQuestion),
    ("{", CsSyntaxKind::OpenBrace),
    ("}", CsSyntaxKind::CloseBrace),
    ("(", CsSyntaxKind::OpenParen),
    (")", CsSyntaxKind::CloseParen),
    ("[", CsSyntaxKind::OpenBracket),
    ("]", CsSyntaxKind::CloseBracket),
    (";", CsSyntaxKind::Semicolon),
    (",", CsSyntaxKind::Comma),
    (".", CsSyntaxKind::Dot),
    (":", CsSyntaxKind::Colon),
    ("?", CsSyntaxKind::Question),
    ("=", CsSyntaxKind::Equals),
    ("+", CsSyntaxKind::Plus),
    ("-", CsSyntaxKind::Minus),
    ("*", CsSyntaxKind::Star),
    ("/", CsSyntaxKind::Slash),
    ("%", CsSyntaxKind::Percent),
    ("&", CsSyntaxKind::Amp),
    ("|", CsSyntaxKind::Pipe),
    ("^", CsSyntaxKind::Caret),
    ("~", CsSyntaxKind::Tilde),
    ("!", CsSyntaxKind::Bang),
    ("<", CsSyntaxKind::Lt),
    (">", CsSyntaxKind::Gt),
];

/// Lex input preserving ALL trivia for CST construction
///
/// - Whitespace runs become `Whitespace` tokens
/// - Each line break becomes its own `Newline` token
/// - Comments and preprocessor directives stop before the line break
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;
    // Only whitespace seen since the last line break
    let mut at_line_start = true;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        let (kind, end) = match current {
            '\n' => (CsSyntaxKind::Newline, i + size),
            '\r' => {
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                (CsSyntaxKind::Newline, end)
            }
            c if c.is_whitespace() => {
                let end = scan_while(input, i, |c| c.is_whitespace() && c != '\n' && c != '\r');
                (CsSyntaxKind::Whitespace, end)
            }
            '/' if input[i..].starts_with("///") && !input[i..].starts_with("////") => {
                (CsSyntaxKind::DocComment, line_end(input, i))
            }
            '/' if input[i..].starts_with("//") => (CsSyntaxKind::LineComment, line_end(input, i)),
            '/' if input[i..].starts_with("/*") => {
                let kind = if input[i..].starts_with("/**") && !input[i..].starts_with("/**/") {
                    CsSyntaxKind::DocComment
                } else {
                    CsSyntaxKind::BlockComment
                };
                let end = match input[i + 2..].find("*/") {
                    Some(offset) => i + 2 + offset + 2,
                    None => {
                        errors.push(LexerError::new(
                            "Unterminated block comment",
                            span(start, len),
                        ));
                        len
                    }
                };
                (kind, end)
            }
            '#' if at_line_start => (CsSyntaxKind::Directive, line_end(input, i)),
            '"' => {
                let (end, error) = lex_string(input, i, false, false);
                errors.extend(error);
                (CsSyntaxKind::String, end)
            }
            '$' | '@' if string_prefix_len(input, i).is_some() => {
                let prefix = string_prefix_len(input, i).unwrap_or(1);
                let prefix_text = &input[i..i + prefix];
                let verbatim = prefix_text.contains('@');
                let interpolated = prefix_text.contains('$');
                let (end, error) = lex_string(input, i + prefix - 1, verbatim, interpolated);
                errors.extend(error);
                (CsSyntaxKind::String, end)
            }
            '\'' => {
                let (end, error) = lex_char(input, i);
                errors.extend(error);
                (CsSyntaxKind::Char, end)
            }
            '@' if next_char(input, i + size).is_some_and(|(c, _)| is_ident_start(c)) => {
                let end = scan_while(input, i + size, is_ident_continue);
                (CsSyntaxKind::Ident, end)
            }
            c if is_ident_start(c) => {
                (CsSyntaxKind::Ident, scan_while(input, i, is_ident_continue))
            }
            c if c.is_ascii_digit() => (CsSyntaxKind::Number, lex_number(input, i)),
            '.' if next_char(input, i + size).is_some_and(|(c, _)| c.is_ascii_digit()) => {
                (CsSyntaxKind::Number, lex_number(input, i))
            }
            _ => match lex_operator(input, i) {
                Some((kind, end)) => (kind, end),
                None => {
                    errors.push(LexerError::new(
                        format!("Unexpected character '{current}'"),
                        span(start, i + size),
                    ));
                    (CsSyntaxKind::Unknown, i + size)
                }
            },
        };

        match kind {
            CsSyntaxKind::Newline => at_line_start = true,
            CsSyntaxKind::Whitespace => {}
            _ => at_line_start = false,
        }

        tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
        i = end;
    }

    tokens.push(CstToken::new(CsSyntaxKind::EndOfFile, "", span(len, len)));
    (tokens, errors)
}

/// Length of a `$"`, `@"`, `$@"` or `@$"` prefix including the quote
fn string_prefix_len(input: &str, pos: usize) -> Option<usize> {
    let rest = &input[pos..];
    ["$@\"", "@$\"", "$\"", "@\""]
        .iter()
        .find(|prefix| rest.starts_with(*prefix))
        .map(|prefix| prefix.len())
}

/// Lex a string literal whose opening quote is at `quote_pos`
fn lex_string(
    input: &str,
    quote_pos: usize,
    verbatim: bool,
    interpolated: bool,
) -> (usize, Option<LexerError>) {
    let len = input.len();
    let mut i = quote_pos + 1;
    let mut hole_depth = 0usize;

    while i < len {
        let Some((c, size)) = next_char(input, i) else {
            break;
        };
        match c {
            '"' if hole_depth > 0 => {
                // Nested string inside an interpolation hole
                let (end, _) = lex_string(input, i, false, false);
                i = end;
                continue;
            }
            '"' if verbatim && input[i + size..].starts_with('"') => {
                i += size + 1;
                continue;
            }
            '"' => return (i + size, None),
            '\\' if !verbatim => {
                i += size;
                if let Some((_, escaped)) = next_char(input, i) {
                    i += escaped;
                }
                continue;
            }
            '{' if interpolated => {
                if hole_depth == 0 && input[i + size..].starts_with('{') {
                    i += size + 1;
                    continue;
                }
                hole_depth += 1;
            }
            '}' if interpolated && hole_depth > 0 => hole_depth -= 1,
            '\n' | '\r' if !verbatim && hole_depth == 0 => {
                return (
                    i,
                    Some(LexerError::new("Unterminated string literal", span(quote_pos, i))),
                );
            }
            _ => {}
        }
        i += size;
    }

    (
        len,
        Some(LexerError::new("Unterminated string literal", span(quote_pos, len))),
    )
}

fn lex_char(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let len = input.len();
    let mut i = start + 1;
    while i < len {
        let Some((c, size)) = next_char(input, i) else {
            break;
        };
        match c {
            '\'' => return (i + size, None),
            '\\' => {
                i += size;
                if let Some((_, escaped)) = next_char(input, i) {
                    i += escaped;
                }
                continue;
            }
            '\n' | '\r' => break,
            _ => {}
        }
        i += size;
    }
    (
        i,
        Some(LexerError::new("Unterminated character literal", span(start, i))),
    )
}

/// Numbers: digits, hex/binary prefixes, `_` separators, a fraction and suffixes
fn lex_number(input: &str, start: usize) -> usize {
    let mut end = start;
    loop {
        end = scan_while(input, end, |c| c.is_ascii_alphanumeric() || c == '_');
        let rest = &input[end..];
        let continues_fraction = rest.starts_with('.')
            && rest[1..].chars().next().is_some_and(|c| c.is_ascii_digit());
        if continues_fraction {
            end += 1;
            continue;
        }
        // Exponent sign: 1e-5, 2E+3
        let prev = input[start..end].chars().last();
        if matches!(prev, Some('e') | Some('E'))
            && (rest.starts_with('-') || rest.starts_with('+'))
            && rest[1..].chars().next().is_some_and(|c| c.is_ascii_digit())
            && !input[start..end].starts_with("0x")
        {
            end += 1;
            continue;
        }
        return end;
    }
}

fn lex_operator(input: &str, start: usize) -> Option<(CsSyntaxKind, usize)> {
    let rest = &input[start..];
    OPERATORS
        .iter()
        .find(|(text, _)| rest.starts_with(text))
        .map(|(text, kind)| (*kind, start + text.len()))
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Offset of the next line break (or end of input) at or after `pos`
fn line_end(input: &str, pos: usize) -> usize {
    input[pos..]
        .find(['\n', '\r'])
        .map(|offset| pos + offset)
        .unwrap_or(input.len())
}

fn scan_while(input: &str, pos: usize, predicate: impl Fn(char) -> bool) -> usize {
    let mut end = pos;
    while let Some((c, size)) = next_char(input, end) {
        if !predicate(c) {
            break;
        }
        end += size;
    }
    end
}

/// Get the next char and its byte length at `pos`
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input.get(pos..)?.chars().next().map(|c| (c, c.len_utf8()))
}

/// Create a span from start to end
fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<CsSyntaxKind> {
        lex_with_trivia(input).0.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_preserves_whitespace() {
        let (tokens, errors) = lex_with_trivia("int  x");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].kind, CsSyntaxKind::Whitespace);
        assert_eq!(tokens[1].text, "  ");
        assert_eq!(tokens[3].kind, CsSyntaxKind::EndOfFile);
        assert!(tokens[3].text.is_empty());
    }

    #[test]
    fn test_each_line_break_is_a_token() {
        let input = "a\n\r\nb\r";
        let newlines: Vec<_> = lex_with_trivia(input)
            .0
            .into_iter()
            .filter(|t| t.kind == CsSyntaxKind::Newline)
            .map(|t| t.text)
            .collect();
        assert_eq!(newlines, vec!["\n", "\r\n", "\r"]);
    }

    #[test]
    fn test_lossless_reconstruction() {
        let input = "namespace A\n{\n    /// <summary>doc</summary>\n    class B { int x = 1 + 2; } // tail\n}\n";
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty());
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_comment_flavours() {
        assert_eq!(
            kinds("/// doc\n// line\n/* block */ /** doc block */ //// rule"),
            vec![
                CsSyntaxKind::DocComment,
                CsSyntaxKind::Newline,
                CsSyntaxKind::LineComment,
                CsSyntaxKind::Newline,
                CsSyntaxKind::BlockComment,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::DocComment,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::LineComment,
                CsSyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_directive_only_at_line_start() {
        let tokens = lex_with_trivia("  #region Fields\nx").0;
        assert_eq!(tokens[1].kind, CsSyntaxKind::Directive);
        assert_eq!(tokens[1].text, "#region Fields");
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds("a<<=b&&c??d=>e"),
            vec![
                CsSyntaxKind::Ident,
                CsSyntaxKind::CompoundAssign,
                CsSyntaxKind::Ident,
                CsSyntaxKind::AmpAmp,
                CsSyntaxKind::Ident,
                CsSyntaxKind::QuestionQuestion,
                CsSyntaxKind::Ident,
                CsSyntaxKind::Arrow,
                CsSyntaxKind::Ident,
                CsSyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        let tokens = lex_with_trivia(r#"s = @"a""b" + $"{x["k"]}" + "\"q";"#).0;
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CsSyntaxKind::String)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec![r#"@"a""b""#, r#"$"{x["k"]}""#, r#""\"q""#]);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex_with_trivia("\"abc\nx");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[1].kind, CsSyntaxKind::Newline);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex_with_trivia("1.5e-3f 0xFF 10.ToString()").0;
        assert_eq!(tokens[0].text, "1.5e-3f");
        assert_eq!(tokens[2].text, "0xFF");
        assert_eq!(tokens[4].text, "10");
        assert_eq!(tokens[5].kind, CsSyntaxKind::Dot);
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex_with_trivia("a ` b");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[2].kind, CsSyntaxKind::Unknown);
    }
}
