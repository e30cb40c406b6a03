//! Rowan language implementation for C#
//!
//! This module implements the `rowan::Language` trait, which connects
//! [`CsSyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::CsSyntaxKind;

/// Language marker for the sharplint C# tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

impl Language for CsLanguage {
    type Kind = CsSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Raw kinds only ever come from `kind_to_raw`; anything else is a
        // tree built from a foreign kind table.
        CsSyntaxKind::from_raw(raw.0).unwrap_or(CsSyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A node in the C# concrete syntax tree
pub type CsSyntaxNode = rowan::SyntaxNode<CsLanguage>;

/// A token (including trivia) in the C# concrete syntax tree
pub type CsSyntaxToken = rowan::SyntaxToken<CsLanguage>;

/// Either a node or a token
pub type CsSyntaxElement = rowan::SyntaxElement<CsLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in CsSyntaxKind::ALL {
            let raw = CsLanguage::kind_to_raw(*kind);
            assert_eq!(CsLanguage::kind_from_raw(raw), *kind);
        }
    }

    #[test]
    fn test_unknown_raw_kind_maps_to_error() {
        assert_eq!(
            CsLanguage::kind_from_raw(rowan::SyntaxKind(u16::MAX)),
            CsSyntaxKind::Error
        );
    }
}
