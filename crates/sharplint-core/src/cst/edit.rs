//! Tree-edit primitives
//!
//! Rowan trees are immutable: every edit rebuilds the path from the edited
//! element to the root and returns the new root. Untouched subtrees are
//! shared between the old and new tree.
//!
//! Tokens passed in must belong to the tree the edit is applied to. Edits
//! that take several tokens resolve them again by range in the intermediate
//! trees and apply them from the end of the file backwards, so earlier
//! ranges stay valid.

use std::cmp::Reverse;

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange};

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Replace `node` with `replacement`, returning the new root
pub fn replace_node(node: &CsSyntaxNode, replacement: GreenNode) -> CsSyntaxNode {
    CsSyntaxNode::new_root(node.replace_with(replacement))
}

/// Insert a new token right after `token` in the same parent
pub fn insert_token_after(
    token: &CsSyntaxToken,
    kind: CsSyntaxKind,
    text: &str,
) -> Option<CsSyntaxNode> {
    insert_token_at(token, token.index() + 1, kind, text)
}

/// Insert a new token right before `token` in the same parent
pub fn insert_token_before(
    token: &CsSyntaxToken,
    kind: CsSyntaxKind,
    text: &str,
) -> Option<CsSyntaxNode> {
    insert_token_at(token, token.index(), kind, text)
}

fn insert_token_at(
    token: &CsSyntaxToken,
    index: usize,
    kind: CsSyntaxKind,
    text: &str,
) -> Option<CsSyntaxNode> {
    let parent = token.parent()?;
    let green = parent
        .green()
        .insert_child(index, NodeOrToken::Token(GreenToken::new(kind.into(), text)));
    Some(replace_node(&parent, green))
}

/// Remove every token in `tokens` from the tree rooted at `root`
///
/// Tokens that can no longer be found are skipped.
pub fn remove_tokens(root: &CsSyntaxNode, tokens: &[CsSyntaxToken]) -> CsSyntaxNode {
    let mut targets: Vec<(TextRange, CsSyntaxKind)> = tokens
        .iter()
        .map(|token| (token.text_range(), token.kind()))
        .collect();
    targets.sort_by_key(|(range, _)| (Reverse(range.start()), Reverse(range.end())));
    targets.dedup();

    let mut current = root.clone();
    for (range, kind) in targets {
        let Some(token) = find_token(&current, range, kind) else {
            tracing::debug!("Token {kind:?}@{range:?} vanished before removal");
            continue;
        };
        let Some(parent) = token.parent() else {
            continue;
        };
        let green = parent.green().remove_child(token.index());
        current = replace_node(&parent, green);
    }
    current
}

/// Token of `kind` spanning exactly `range`
pub fn find_token(
    root: &CsSyntaxNode,
    range: TextRange,
    kind: CsSyntaxKind,
) -> Option<CsSyntaxToken> {
    if !root.text_range().contains_range(range) {
        return None;
    }
    if !range.is_empty() {
        if let NodeOrToken::Token(token) = root.covering_element(range) {
            if token.text_range() == range && token.kind() == kind {
                return Some(token);
            }
        }
    }
    root.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.text_range() == range && token.kind() == kind)
}

/// Innermost node of `kind` whose trimmed range is exactly `range`
pub fn find_node_at(
    root: &CsSyntaxNode,
    range: TextRange,
    kind: CsSyntaxKind,
) -> Option<CsSyntaxNode> {
    if !root.text_range().contains_range(range) {
        return None;
    }
    let start = match root.covering_element(range) {
        NodeOrToken::Node(node) => node,
        NodeOrToken::Token(token) => token.parent()?,
    };
    start
        .ancestors()
        .find(|node| node.kind() == kind && trimmed_range(node) == range)
}

/// Green copy of `node` without its leading and trailing trivia
pub fn without_trivia(node: &CsSyntaxNode) -> GreenNode {
    let detached = CsSyntaxNode::new_root(node.green().into_owned());
    let (leading, trailing) = edge_trivia(&detached);
    let strip: Vec<_> = leading.into_iter().chain(trailing).collect();
    remove_tokens(&detached, &strip).green().into_owned()
}

/// Range of `node` without leading and trailing trivia
pub fn trimmed_range(node: &CsSyntaxNode) -> TextRange {
    let mut significant = node
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia());
    let Some(first) = significant.next() else {
        return node.text_range();
    };
    let end = significant
        .last()
        .map(|last| last.text_range().end())
        .unwrap_or_else(|| first.text_range().end());
    TextRange::new(first.text_range().start(), end)
}

/// Zero-width token standing in for source text that is not there
pub fn is_missing(token: &CsSyntaxToken) -> bool {
    token.text().is_empty() && token.kind() != CsSyntaxKind::EndOfFile
}

/// Check for placeholder tokens or error nodes anywhere under `node`
pub fn contains_missing(node: &CsSyntaxNode) -> bool {
    node.descendants_with_tokens().any(|element| match element {
        NodeOrToken::Node(node) => node.kind() == CsSyntaxKind::Error,
        NodeOrToken::Token(token) => is_missing(&token),
    })
}

/// Wrap `node` in a `ParenthesizedExpr`
///
/// The node's leading and trailing trivia move outside the parentheses.
pub fn parenthesize(node: &CsSyntaxNode) -> GreenNode {
    let (leading, trailing) = edge_trivia(node);
    let to_green = |token: &CsSyntaxToken| {
        NodeOrToken::Token(GreenToken::new(token.kind().into(), token.text()))
    };

    let mut children: Vec<NodeOrToken<GreenNode, GreenToken>> =
        leading.iter().map(to_green).collect();
    children.push(NodeOrToken::Token(GreenToken::new(
        CsSyntaxKind::OpenParen.into(),
        "(",
    )));
    children.push(NodeOrToken::Node(without_trivia(node)));
    children.push(NodeOrToken::Token(GreenToken::new(
        CsSyntaxKind::CloseParen.into(),
        ")",
    )));
    children.extend(trailing.iter().map(to_green));

    GreenNode::new(CsSyntaxKind::ParenthesizedExpr.into(), children)
}

/// Trivia tokens before the first and after the last non-trivia token
fn edge_trivia(node: &CsSyntaxNode) -> (Vec<CsSyntaxToken>, Vec<CsSyntaxToken>) {
    let tokens: Vec<CsSyntaxToken> = node
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .collect();
    let first = tokens.iter().position(|t| !t.kind().is_trivia());
    let last = tokens.iter().rposition(|t| !t.kind().is_trivia());
    match (first, last) {
        (Some(first), Some(last)) => (tokens[..first].to_vec(), tokens[last + 1..].to_vec()),
        _ => (tokens, Vec::new()),
    }
}
