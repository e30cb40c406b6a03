//! Concrete Syntax Tree (CST) for C#
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments
//! and directives, which the layout rules inspect directly.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia
//!   - Cheap to clone (uses Arc internally)
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal
//!   - Thread-confined: one red tree per thread
//!
//! ## Trivia Handling
//!
//! Trivia tokens are siblings of ordinary tokens. Which token a piece of
//! trivia belongs to is derived, not stored:
//! - **Trailing trivia**: after a token up to and including the line break
//! - **Leading trivia**: everything else before a token
//!
//! This enables lossless representation: `parse_source(s).syntax().text() == s`
//!
//! ## Example
//!
//! ```rust
//! use sharplint_core::cst::{CsSyntaxKind, parse_source};
//!
//! let root = parse_source("class A\n{\n}\n").syntax();
//! assert_eq!(root.text().to_string(), "class A\n{\n}\n");
//!
//! let braces = root
//!     .descendants_with_tokens()
//!     .filter_map(|element| element.into_token())
//!     .filter(|token| token.kind() == CsSyntaxKind::OpenBrace)
//!     .count();
//! assert_eq!(braces, 1);
//! ```

mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod edit;
pub mod trivia;

pub use language::{CsLanguage, CsSyntaxElement, CsSyntaxNode, CsSyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{Parse, ParseError, ParseErrorKind, parse_source};
pub use syntax_kind::CsSyntaxKind;
pub use trivia::{BlankLine, TriviaKind, TriviaToken};

#[cfg(test)]
mod tests;
