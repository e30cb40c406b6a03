//! Layout-level tree builder
//!
//! Builds a lossless rowan tree from the token stream of
//! [`lex_with_trivia`](super::lex_with_trivia). This is not a C# grammar: it
//! recognises only the structure the style rules inspect.
//!
//! - `{ ... }` blocks holding statements
//! - `;`-terminated statements (a statement also ends after a block unless
//!   the block is followed by `;`, `,`, `.` or `=`)
//! - `( ... )` and `[ ... ]` groups
//! - binary/prefix/postfix expressions by operator precedence
//!
//! Trivia placement follows the Roslyn convention: trivia up to and including
//! the first line break after a token stays next to that token; the rest is
//! emitted immediately before the following token. Unterminated groups get a
//! zero-width closing token and absent operands a zero-width identifier.

use rowan::{GreenNode, GreenNodeBuilder};

use super::lexer::{CstSpan, CstToken, LexerError, lex_with_trivia};
use super::{CsSyntaxKind, CsSyntaxNode};

/// Binding power used for operands of prefix operators
const PREFIX_BINDING_POWER: u8 = 14;

/// Parse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Reported by the lexer
    Lexer,
    /// A group or block reached its end without its closing delimiter
    UnclosedDelimiter,
    /// A closing delimiter with no matching opener
    UnexpectedDelimiter,
    /// An operator without its right-hand operand
    MissingOperand,
}

/// A parse error with its byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: CstSpan,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(error: LexerError) -> Self {
        Self::new(ParseErrorKind::Lexer, error.message, error.span)
    }
}

/// Result of building a tree
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Root of the tree (a `CompilationUnit`)
    pub fn syntax(&self) -> CsSyntaxNode {
        CsSyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Build a tree for `source`
///
/// Never fails: `parse_source(s).syntax().text() == s` for every input.
pub fn parse_source(source: &str) -> Parse {
    let (tokens, lexer_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(tokens);
    parser
        .errors
        .extend(lexer_errors.into_iter().map(ParseError::from));
    parser.compilation_unit();
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupPosition {
    /// The group starts an operand: `(a + b)`
    Primary,
    /// The group follows an operand: `f(a)`, `x[0]`
    Postfix,
}

struct Parser {
    tokens: Vec<CstToken>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(tokens: Vec<CstToken>) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // ---- token access ----

    /// Index of the next non-trivia token at or after `pos`
    fn significant_index(&self) -> Option<usize> {
        (self.pos..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    fn current(&self) -> CsSyntaxKind {
        self.significant_index()
            .map(|i| self.tokens[i].kind)
            .unwrap_or(CsSyntaxKind::EndOfFile)
    }

    /// `?` directly followed by `.` or `[`: null-conditional access
    fn at_conditional_access(&self) -> bool {
        let Some(index) = self.significant_index() else {
            return false;
        };
        self.tokens[index].kind == CsSyntaxKind::Question
            && self.tokens.get(index + 1).is_some_and(|next| {
                matches!(next.kind, CsSyntaxKind::Dot | CsSyntaxKind::OpenBracket)
            })
    }

    fn emit_current(&mut self) {
        let token = &self.tokens[self.pos];
        self.builder.token(token.kind.into(), token.text.as_str());
        self.pos += 1;
    }

    /// Emit trivia preceding the next significant token
    fn flush_leading(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.emit_current();
        }
    }

    /// Emit trivia following a token up to and including the first line break
    fn flush_trailing(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            let is_newline = self.tokens[self.pos].kind == CsSyntaxKind::Newline;
            self.emit_current();
            if is_newline {
                break;
            }
        }
    }

    fn bump(&mut self) {
        self.flush_leading();
        if self.pos >= self.tokens.len() {
            return;
        }
        let kind = self.tokens[self.pos].kind;
        self.emit_current();
        if kind != CsSyntaxKind::EndOfFile {
            self.flush_trailing();
        }
    }

    fn current_span(&self) -> CstSpan {
        match self.significant_index() {
            Some(index) => self.tokens[index].span.clone(),
            None => {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                end..end
            }
        }
    }

    /// Insert a zero-width placeholder for a token the source lacks
    fn missing(&mut self, kind: CsSyntaxKind, error: ParseErrorKind, message: String) {
        let offset = self
            .tokens
            .get(self.pos)
            .map(|t| t.span.start)
            .unwrap_or_else(|| self.current_span().start);
        self.builder.token(kind.into(), "");
        self.errors.push(ParseError::new(error, message, offset..offset));
    }

    fn error_token(&mut self, message: &str) {
        let span = self.current_span();
        self.errors.push(ParseError::new(
            ParseErrorKind::UnexpectedDelimiter,
            format!("{message}: {}", self.current()),
            span,
        ));
        self.builder.start_node(CsSyntaxKind::Error.into());
        self.bump();
        self.builder.finish_node();
    }

    // ---- structure ----

    fn compilation_unit(&mut self) {
        self.builder.start_node(CsSyntaxKind::CompilationUnit.into());
        loop {
            match self.current() {
                CsSyntaxKind::EndOfFile => break,
                CsSyntaxKind::CloseBrace
                | CsSyntaxKind::CloseParen
                | CsSyntaxKind::CloseBracket => {
                    self.error_token("Unexpected closing delimiter")
                }
                _ => self.statement(),
            }
        }
        // EndOfFile with the trailing trivia of the file as its leading trivia
        self.bump();
        self.builder.finish_node();
    }

    fn block(&mut self) {
        self.builder.start_node(CsSyntaxKind::Block.into());
        self.bump();
        loop {
            match self.current() {
                CsSyntaxKind::CloseBrace => {
                    self.bump();
                    break;
                }
                CsSyntaxKind::EndOfFile => {
                    self.missing(
                        CsSyntaxKind::CloseBrace,
                        ParseErrorKind::UnclosedDelimiter,
                        "Expected '}'".to_string(),
                    );
                    break;
                }
                CsSyntaxKind::CloseParen | CsSyntaxKind::CloseBracket => {
                    self.error_token("Unexpected closing delimiter")
                }
                _ => self.statement(),
            }
        }
        self.builder.finish_node();
    }

    fn statement(&mut self) {
        self.builder.start_node(CsSyntaxKind::Statement.into());
        loop {
            match self.current() {
                CsSyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                CsSyntaxKind::CloseBrace
                | CsSyntaxKind::CloseParen
                | CsSyntaxKind::CloseBracket
                | CsSyntaxKind::EndOfFile => break,
                CsSyntaxKind::OpenBrace => {
                    self.block();
                    if !matches!(
                        self.current(),
                        CsSyntaxKind::Semicolon
                            | CsSyntaxKind::Comma
                            | CsSyntaxKind::Dot
                            | CsSyntaxKind::Equals
                    ) {
                        break;
                    }
                }
                kind if can_start_expression(kind) => self.expression(),
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    fn group(&mut self, open: CsSyntaxKind, position: GroupPosition) {
        let close = match open {
            CsSyntaxKind::OpenBracket => CsSyntaxKind::CloseBracket,
            _ => CsSyntaxKind::CloseParen,
        };
        let checkpoint = self.builder.checkpoint();
        self.bump();

        let mut expressions = 0usize;
        let mut separators = 0usize;
        loop {
            let kind = self.current();
            if kind == close {
                self.bump();
                break;
            }
            match kind {
                CsSyntaxKind::EndOfFile | CsSyntaxKind::CloseBrace => {
                    self.missing(
                        close,
                        ParseErrorKind::UnclosedDelimiter,
                        format!("Expected {close}"),
                    );
                    break;
                }
                CsSyntaxKind::CloseParen | CsSyntaxKind::CloseBracket => {
                    self.error_token("Mismatched closing delimiter")
                }
                kind if can_start_expression(kind) => {
                    self.expression();
                    expressions += 1;
                }
                _ => {
                    self.bump();
                    separators += 1;
                }
            }
        }

        let kind = match (open, position) {
            (CsSyntaxKind::OpenParen, GroupPosition::Primary)
                if expressions == 1 && separators == 0 =>
            {
                CsSyntaxKind::ParenthesizedExpr
            }
            (CsSyntaxKind::OpenParen, _) => CsSyntaxKind::ParenGroup,
            _ => CsSyntaxKind::BracketGroup,
        };
        self.builder.start_node_at(checkpoint, kind.into());
        self.builder.finish_node();
    }

    // ---- expressions ----

    fn expression(&mut self) {
        self.expression_bp(1);
    }

    fn expression_bp(&mut self, min_bp: u8) {
        let checkpoint = self.builder.checkpoint();
        self.unary();
        loop {
            let op = self.current();
            let Some(bp) = op.binary_precedence() else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.bump();
            let rhs_bp = if op.is_right_associative() { bp } else { bp + 1 };
            self.operand(rhs_bp);
            self.builder
                .start_node_at(checkpoint, CsSyntaxKind::BinaryExpr.into());
            self.builder.finish_node();
        }
    }

    fn operand(&mut self, min_bp: u8) {
        if can_start_expression(self.current()) {
            self.expression_bp(min_bp);
        } else {
            self.missing(
                CsSyntaxKind::Ident,
                ParseErrorKind::MissingOperand,
                "Expected expression".to_string(),
            );
        }
    }

    fn unary(&mut self) {
        if self.current().is_prefix_operator() {
            let checkpoint = self.builder.checkpoint();
            self.bump();
            self.operand(PREFIX_BINDING_POWER);
            self.builder
                .start_node_at(checkpoint, CsSyntaxKind::PrefixExpr.into());
            self.builder.finish_node();
        } else {
            self.postfix();
        }
    }

    fn postfix(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.primary();
        let mut extended = false;
        loop {
            match self.current() {
                CsSyntaxKind::Dot => {
                    self.bump();
                    if self.current() == CsSyntaxKind::Ident {
                        self.bump();
                    }
                }
                CsSyntaxKind::OpenParen => {
                    self.group(CsSyntaxKind::OpenParen, GroupPosition::Postfix)
                }
                CsSyntaxKind::OpenBracket => {
                    self.group(CsSyntaxKind::OpenBracket, GroupPosition::Postfix)
                }
                CsSyntaxKind::PlusPlus | CsSyntaxKind::MinusMinus => self.bump(),
                CsSyntaxKind::Question if self.at_conditional_access() => self.bump(),
                _ => break,
            }
            extended = true;
        }
        if extended {
            self.builder
                .start_node_at(checkpoint, CsSyntaxKind::PostfixExpr.into());
            self.builder.finish_node();
        }
    }

    fn primary(&mut self) {
        match self.current() {
            CsSyntaxKind::OpenParen => self.group(CsSyntaxKind::OpenParen, GroupPosition::Primary),
            CsSyntaxKind::OpenBracket => {
                self.group(CsSyntaxKind::OpenBracket, GroupPosition::Primary)
            }
            CsSyntaxKind::OpenBrace => self.block(),
            _ => self.bump(),
        }
    }
}

fn can_start_expression(kind: CsSyntaxKind) -> bool {
    matches!(
        kind,
        CsSyntaxKind::Ident
            | CsSyntaxKind::Number
            | CsSyntaxKind::String
            | CsSyntaxKind::Char
            | CsSyntaxKind::Unknown
            | CsSyntaxKind::OpenParen
            | CsSyntaxKind::OpenBracket
            | CsSyntaxKind::OpenBrace
    ) || kind.is_prefix_operator()
}
