//! Syntax kind enumeration for the C# CST
//!
//! This module defines all node and token types the sharplint syntax tree
//! can contain. The set is deliberately layout-oriented: tokens are fully
//! classified, nodes only describe the structure the rules work on.

use std::fmt;

/// Syntax kind for C# elements
///
/// Discriminants are contiguous starting at zero; [`CsSyntaxKind::ALL`]
/// lists every kind in discriminant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum CsSyntaxKind {
    // ==================
    // Trivia
    // ==================
    /// Spaces and tabs
    Whitespace = 0,
    /// `\n`, `\r\n` or `\r`
    Newline,
    /// `// ...` up to (not including) the line break
    LineComment,
    /// `/// ...` or `/** ... */` documentation comment
    DocComment,
    /// `/* ... */`
    BlockComment,
    /// `#if`, `#region`, ... up to the line break
    Directive,

    // ==================
    // Punctuation and operators
    // ==================
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    QuestionQuestion,
    Equals,
    /// `=>`
    Arrow,
    /// `+=`, `-=`, `*=`, `??=`, `<<=`, ...
    CompoundAssign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpAmp,
    PipePipe,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    LtLt,
    GtGt,
    PlusPlus,
    MinusMinus,

    // ==================
    // Literals & identifiers
    // ==================
    /// Identifiers and keywords
    Ident,
    Number,
    String,
    Char,
    /// A character the lexer could not classify
    Unknown,
    /// Zero-width token closing every compilation unit
    EndOfFile,

    // ==================
    // Nodes
    // ==================
    CompilationUnit,
    /// `{ ... }`
    Block,
    /// A `;`-terminated (or block-terminated) statement or declaration
    Statement,
    /// `( ... )` that is not an expression: argument and parameter lists
    ParenGroup,
    /// `[ ... ]`: attributes, indexers, array ranks
    BracketGroup,
    /// `( expr )` in expression position
    ParenthesizedExpr,
    BinaryExpr,
    PrefixExpr,
    PostfixExpr,
    /// Tokens the builder could not place
    Error,
}

impl CsSyntaxKind {
    /// Every kind, indexed by discriminant
    pub const ALL: &'static [CsSyntaxKind] = &[
        Self::Whitespace,
        Self::Newline,
        Self::LineComment,
        Self::DocComment,
        Self::BlockComment,
        Self::Directive,
        Self::OpenBrace,
        Self::CloseBrace,
        Self::OpenParen,
        Self::CloseParen,
        Self::OpenBracket,
        Self::CloseBracket,
        Self::Semicolon,
        Self::Comma,
        Self::Dot,
        Self::Colon,
        Self::Question,
        Self::QuestionQuestion,
        Self::Equals,
        Self::Arrow,
        Self::CompoundAssign,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Percent,
        Self::Amp,
        Self::Pipe,
        Self::Caret,
        Self::Tilde,
        Self::Bang,
        Self::AmpAmp,
        Self::PipePipe,
        Self::EqEq,
        Self::BangEq,
        Self::Lt,
        Self::Gt,
        Self::LtEq,
        Self::GtEq,
        Self::LtLt,
        Self::GtGt,
        Self::PlusPlus,
        Self::MinusMinus,
        Self::Ident,
        Self::Number,
        Self::String,
        Self::Char,
        Self::Unknown,
        Self::EndOfFile,
        Self::CompilationUnit,
        Self::Block,
        Self::Statement,
        Self::ParenGroup,
        Self::BracketGroup,
        Self::ParenthesizedExpr,
        Self::BinaryExpr,
        Self::PrefixExpr,
        Self::PostfixExpr,
        Self::Error,
    ];

    /// Look up a kind by its raw discriminant
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// Check if this is trivia (whitespace, line breaks, comments, directives)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Newline
                | Self::LineComment
                | Self::DocComment
                | Self::BlockComment
                | Self::Directive
        )
    }

    /// Check if this is a comment of any flavour
    pub const fn is_comment(self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::DocComment | Self::BlockComment
        )
    }

    /// Check if this kind is a node rather than a token
    pub const fn is_node(self) -> bool {
        (self as u16) >= (Self::CompilationUnit as u16)
    }

    /// Check if this is an opening delimiter
    pub const fn is_opening_delimiter(self) -> bool {
        matches!(self, Self::OpenBrace | Self::OpenParen | Self::OpenBracket)
    }

    /// Check if this is a closing delimiter
    pub const fn is_closing_delimiter(self) -> bool {
        matches!(
            self,
            Self::CloseBrace | Self::CloseParen | Self::CloseBracket
        )
    }

    /// Closing delimiter matching an opening one
    pub const fn closing_delimiter(self) -> Option<Self> {
        match self {
            Self::OpenBrace => Some(Self::CloseBrace),
            Self::OpenParen => Some(Self::CloseParen),
            Self::OpenBracket => Some(Self::CloseBracket),
            _ => None,
        }
    }

    /// Binary operator binding power, `None` for non-operators
    ///
    /// Higher binds tighter. Assignment-like operators are right associative
    /// (see [`CsSyntaxKind::is_right_associative`]).
    pub const fn binary_precedence(self) -> Option<u8> {
        let bp = match self {
            Self::Equals | Self::CompoundAssign | Self::Arrow => 1,
            Self::Question | Self::Colon => 2,
            Self::QuestionQuestion => 3,
            Self::PipePipe => 4,
            Self::AmpAmp => 5,
            Self::Pipe => 6,
            Self::Caret => 7,
            Self::Amp => 8,
            Self::EqEq | Self::BangEq => 9,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 10,
            Self::LtLt | Self::GtGt => 11,
            Self::Plus | Self::Minus => 12,
            Self::Star | Self::Slash | Self::Percent => 13,
            _ => return None,
        };
        Some(bp)
    }

    pub const fn is_right_associative(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::CompoundAssign
                | Self::Arrow
                | Self::Question
                | Self::Colon
                | Self::QuestionQuestion
        )
    }

    /// Check if this operator may start a prefix expression
    pub const fn is_prefix_operator(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Bang
                | Self::Tilde
                | Self::PlusPlus
                | Self::MinusMinus
                | Self::Amp
                | Self::Star
        )
    }

    /// Get a human-readable name for this syntax kind
    pub const fn name(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::LineComment => "line comment",
            Self::DocComment => "documentation comment",
            Self::BlockComment => "block comment",
            Self::Directive => "preprocessor directive",
            Self::OpenBrace => "'{'",
            Self::CloseBrace => "'}'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::OpenBracket => "'['",
            Self::CloseBracket => "']'",
            Self::Semicolon => "';'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Colon => "':'",
            Self::Question => "'?'",
            Self::QuestionQuestion => "'??'",
            Self::Equals => "'='",
            Self::Arrow => "'=>'",
            Self::CompoundAssign => "compound assignment",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Amp => "'&'",
            Self::Pipe => "'|'",
            Self::Caret => "'^'",
            Self::Tilde => "'~'",
            Self::Bang => "'!'",
            Self::AmpAmp => "'&&'",
            Self::PipePipe => "'||'",
            Self::EqEq => "'=='",
            Self::BangEq => "'!='",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::LtEq => "'<='",
            Self::GtEq => "'>='",
            Self::LtLt => "'<<'",
            Self::GtGt => "'>>'",
            Self::PlusPlus => "'++'",
            Self::MinusMinus => "'--'",
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::String => "string",
            Self::Char => "character",
            Self::Unknown => "unknown",
            Self::EndOfFile => "end of file",
            Self::CompilationUnit => "compilation unit",
            Self::Block => "block",
            Self::Statement => "statement",
            Self::ParenGroup => "parenthesized group",
            Self::BracketGroup => "bracketed group",
            Self::ParenthesizedExpr => "parenthesized expression",
            Self::BinaryExpr => "binary expression",
            Self::PrefixExpr => "prefix expression",
            Self::PostfixExpr => "postfix expression",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CsSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<CsSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: CsSyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_indexed_by_discriminant() {
        for (index, kind) in CsSyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{kind:?} is out of order");
        }
        assert_eq!(
            CsSyntaxKind::from_raw(CsSyntaxKind::Error as u16),
            Some(CsSyntaxKind::Error)
        );
        assert_eq!(CsSyntaxKind::from_raw(CsSyntaxKind::ALL.len() as u16), None);
    }

    #[test]
    fn test_trivia_classification() {
        assert!(CsSyntaxKind::Whitespace.is_trivia());
        assert!(CsSyntaxKind::Newline.is_trivia());
        assert!(CsSyntaxKind::DocComment.is_trivia());
        assert!(CsSyntaxKind::Directive.is_trivia());
        assert!(!CsSyntaxKind::OpenBrace.is_trivia());
        assert!(!CsSyntaxKind::EndOfFile.is_trivia());
    }

    #[test]
    fn test_node_classification() {
        assert!(CsSyntaxKind::Block.is_node());
        assert!(CsSyntaxKind::CompilationUnit.is_node());
        assert!(!CsSyntaxKind::EndOfFile.is_node());
    }

    #[test]
    fn test_precedence_ordering() {
        let mul = CsSyntaxKind::Star.binary_precedence().unwrap();
        let add = CsSyntaxKind::Plus.binary_precedence().unwrap();
        let and = CsSyntaxKind::AmpAmp.binary_precedence().unwrap();
        let or = CsSyntaxKind::PipePipe.binary_precedence().unwrap();
        assert!(mul > add);
        assert!(and > or);
        assert_eq!(CsSyntaxKind::Ident.binary_precedence(), None);
    }
}
