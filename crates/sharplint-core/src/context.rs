//! Token context resolution
//!
//! [`TokenContext`] indexes every token of a tree in document order together
//! with its attached leading/trailing trivia, and answers the positional
//! questions layout rules ask: is a token first or last on its line, what
//! are its real neighbors, is there a blank line in front of it.
//!
//! Zero-width tokens ([`CsSyntaxKind::EndOfFile`] and placeholders the tree
//! builder inserts) are indexed like any other token so their trivia is seen,
//! but they are never returned as a neighbor.

use rowan::TextRange;

use crate::cst::trivia::{self, BlankLine, TriviaKind, TriviaToken};
use crate::cst::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};
use crate::diagnostics::SourceMap;

/// Index of a token in a [`TokenContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TokenEntry {
    token: CsSyntaxToken,
    leading: Vec<TriviaToken>,
    trailing: Vec<TriviaToken>,
}

/// Token/trivia index over one tree version
#[derive(Debug, Clone)]
pub struct TokenContext {
    root: CsSyntaxNode,
    text: String,
    source_map: SourceMap,
    entries: Vec<TokenEntry>,
}

impl TokenContext {
    pub fn new(root: CsSyntaxNode) -> Self {
        let text = root.text().to_string();
        let source_map = SourceMap::new(&text);

        let mut entries: Vec<TokenEntry> = Vec::new();
        let mut pending: Vec<TriviaToken> = Vec::new();
        for token in root
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
        {
            if let Some(trivia) = TriviaToken::from_token(&token) {
                pending.push(trivia);
                continue;
            }
            let leading = match entries.last_mut() {
                Some(previous) => {
                    let (trailing, leading) = trivia::split_attached(&pending);
                    previous.trailing = trailing.to_vec();
                    leading.to_vec()
                }
                None => pending.clone(),
            };
            pending.clear();
            entries.push(TokenEntry {
                token,
                leading,
                trailing: Vec::new(),
            });
        }
        // Trees without an EndOfFile token may end in trivia
        if let Some(last) = entries.last_mut() {
            last.trailing.append(&mut pending);
        }

        Self {
            root,
            text,
            source_map,
            entries,
        }
    }

    pub fn root(&self) -> &CsSyntaxNode {
        &self.root
    }

    /// Full text of the tree
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All tokens in document order, zero-width ones included
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        (0..self.entries.len()).map(TokenId)
    }

    /// Tokens of one kind in document order
    pub fn tokens_of_kind(&self, kind: CsSyntaxKind) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens().filter(move |&id| self.kind(id) == kind)
    }

    pub fn token(&self, id: TokenId) -> &CsSyntaxToken {
        &self.entries[id.0].token
    }

    pub fn kind(&self, id: TokenId) -> CsSyntaxKind {
        self.entries[id.0].token.kind()
    }

    pub fn range(&self, id: TokenId) -> TextRange {
        self.entries[id.0].token.text_range()
    }

    /// Token of `kind` starting at `offset`
    pub fn token_at(&self, offset: rowan::TextSize, kind: CsSyntaxKind) -> Option<TokenId> {
        let first = self
            .entries
            .partition_point(|entry| entry.token.text_range().start() < offset);
        self.entries[first..]
            .iter()
            .take_while(|entry| entry.token.text_range().start() == offset)
            .position(|entry| entry.token.kind() == kind)
            .map(|index| TokenId(first + index))
    }

    pub fn is_zero_width(&self, id: TokenId) -> bool {
        self.entries[id.0].token.text().is_empty()
    }

    /// Placeholder for source text that is not there
    pub fn is_missing(&self, id: TokenId) -> bool {
        self.is_zero_width(id) && self.kind(id) != CsSyntaxKind::EndOfFile
    }

    pub fn leading_trivia(&self, id: TokenId) -> &[TriviaToken] {
        &self.entries[id.0].leading
    }

    pub fn trailing_trivia(&self, id: TokenId) -> &[TriviaToken] {
        &self.entries[id.0].trailing
    }

    /// First token of the document, zero-width ones included
    pub fn first_token(&self) -> Option<TokenId> {
        (!self.entries.is_empty()).then_some(TokenId(0))
    }

    /// Nearest earlier token with text
    pub fn preceding_token(&self, id: TokenId) -> Option<TokenId> {
        (0..id.0)
            .rev()
            .map(TokenId)
            .find(|&candidate| !self.is_zero_width(candidate))
    }

    /// Nearest later token with text
    pub fn following_token(&self, id: TokenId) -> Option<TokenId> {
        (id.0 + 1..self.entries.len())
            .map(TokenId)
            .find(|&candidate| !self.is_zero_width(candidate))
    }

    /// All trivia between `id` and its preceding real token
    ///
    /// Trailing trivia of the preceding token, the trivia of skipped
    /// zero-width tokens, then the leading trivia of `id`.
    pub fn gap_trivia(&self, id: TokenId) -> Vec<TriviaToken> {
        let (mut gap, skipped_from) = match self.preceding_token(id) {
            Some(preceding) => (self.trailing_trivia(preceding).to_vec(), preceding.0 + 1),
            None => (Vec::new(), 0),
        };
        for entry in &self.entries[skipped_from..id.0] {
            gap.extend_from_slice(&entry.leading);
            gap.extend_from_slice(&entry.trailing);
        }
        gap.extend_from_slice(self.leading_trivia(id));
        gap
    }

    /// No real token earlier on the same physical line
    pub fn is_first_in_line(&self, id: TokenId) -> bool {
        if self.preceding_token(id).is_none() || !self.leading_trivia(id).is_empty() {
            return true;
        }
        if self.gap_trivia(id).iter().any(TriviaToken::is_end_of_line) {
            return true;
        }
        self.source_map
            .is_line_start(usize::from(self.range(id).start()))
    }

    /// A line break follows before any comment or directive, or nothing follows
    pub fn is_last_in_line(&self, id: TokenId) -> bool {
        match self.following_token(id) {
            Some(following) => {
                trivia::first_significant(&self.gap_trivia(following))
                    == Some(TriviaKind::EndOfLine)
            }
            None => true,
        }
    }

    /// Every blank line in the gap before `id`
    pub fn blank_lines_before(&self, id: TokenId) -> Vec<BlankLine> {
        let at_line_start = self.preceding_token(id).is_none();
        trivia::blank_lines(&self.gap_trivia(id), at_line_start)
    }

    pub fn blank_line_before(&self, id: TokenId) -> Option<BlankLine> {
        self.blank_lines_before(id).into_iter().next()
    }

    /// Tree trivia tokens lying entirely inside `range`
    pub fn trivia_tokens_in(&self, range: TextRange) -> Vec<CsSyntaxToken> {
        self.root
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind().is_trivia() && range.contains_range(token.text_range()))
            .collect()
    }

    /// 1-based (line, column) of an offset
    pub fn position(&self, offset: usize) -> (usize, usize) {
        self.source_map.offset_to_position(offset, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn context(source: &str) -> TokenContext {
        TokenContext::new(parse_source(source).syntax())
    }

    fn find(ctx: &TokenContext, kind: CsSyntaxKind) -> TokenId {
        ctx.tokens_of_kind(kind).next().expect("token of kind")
    }

    #[test]
    fn test_attachment_splits_at_first_line_break() {
        let ctx = context("a; // x\n\n    b;");
        let semicolon = find(&ctx, CsSyntaxKind::Semicolon);
        let trailing: Vec<_> = ctx
            .trailing_trivia(semicolon)
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            trailing,
            vec![
                TriviaKind::Whitespace,
                TriviaKind::SingleLineComment,
                TriviaKind::EndOfLine
            ]
        );
        let b = ctx
            .tokens_of_kind(CsSyntaxKind::Ident)
            .nth(1)
            .expect("b");
        assert_eq!(ctx.leading_trivia(b).len(), 2);
    }

    #[test]
    fn test_first_token_trivia_is_leading() {
        let ctx = context("\n\nclass A { }");
        let first = ctx.first_token().unwrap();
        assert_eq!(ctx.kind(first), CsSyntaxKind::Ident);
        assert_eq!(ctx.leading_trivia(first).len(), 2);
        assert!(ctx.is_first_in_line(first));
    }

    #[test]
    fn test_neighbors_skip_zero_width_tokens() {
        let ctx = context("{ a }");
        let open = find(&ctx, CsSyntaxKind::OpenBrace);
        let close = find(&ctx, CsSyntaxKind::CloseBrace);
        let eof = find(&ctx, CsSyntaxKind::EndOfFile);

        assert_eq!(ctx.preceding_token(open), None);
        assert_eq!(ctx.following_token(close), None);
        assert_eq!(ctx.preceding_token(eof), Some(close));
        assert!(ctx.is_last_in_line(close));

        // Placeholders close both groups at the end of the file
        let ctx = context("f( {");
        let open_paren = find(&ctx, CsSyntaxKind::OpenParen);
        let open_brace = find(&ctx, CsSyntaxKind::OpenBrace);
        assert_eq!(ctx.following_token(open_paren), Some(open_brace));
        assert_eq!(ctx.preceding_token(open_brace), Some(open_paren));
    }

    #[test]
    fn test_first_and_last_in_line() {
        let ctx = context("if (x) {\n    a;\n}\nelse\n{ b; }");
        let braces: Vec<_> = ctx.tokens_of_kind(CsSyntaxKind::OpenBrace).collect();
        assert!(!ctx.is_first_in_line(braces[0]));
        assert!(ctx.is_last_in_line(braces[0]));
        assert!(ctx.is_first_in_line(braces[1]));
        assert!(!ctx.is_last_in_line(braces[1]));
    }

    #[test]
    fn test_comment_before_line_break_is_not_last_in_line() {
        let ctx = context("x {// note\n}");
        let open = find(&ctx, CsSyntaxKind::OpenBrace);
        assert!(!ctx.is_last_in_line(open));
    }

    #[test]
    fn test_blank_line_before_closing_brace() {
        let source = "public bool Enabled\n{\n    get { return this.enabled; }\n\n}\n";
        let ctx = context(source);
        let closes: Vec<_> = ctx.tokens_of_kind(CsSyntaxKind::CloseBrace).collect();
        assert!(ctx.blank_line_before(closes[0]).is_none());
        let blank = ctx.blank_line_before(closes[1]).expect("blank line");
        let offset = source.find("}\n\n}").unwrap() + 2;
        assert_eq!(usize::from(blank.end_of_line.start()), offset);
    }

    #[test]
    fn test_blank_line_at_file_start() {
        let ctx = context("\n\nclass A { }");
        let first = ctx.first_token().unwrap();
        let blank = ctx.blank_line_before(first).unwrap();
        assert_eq!(blank.end_of_line, TextRange::new(0.into(), 1.into()));
        assert_eq!(ctx.blank_lines_before(first).len(), 2);
    }

    #[test]
    fn test_token_at_finds_zero_width_tokens() {
        let ctx = context("f( {");
        let brace = find(&ctx, CsSyntaxKind::OpenBrace);
        assert_eq!(ctx.token_at(ctx.range(brace).start(), CsSyntaxKind::OpenBrace), Some(brace));
        let eof = find(&ctx, CsSyntaxKind::EndOfFile);
        assert_eq!(
            ctx.token_at(ctx.range(eof).start(), CsSyntaxKind::EndOfFile),
            Some(eof)
        );
    }

    #[test]
    fn test_trivia_tokens_in_range() {
        let ctx = context("a;\n\n}");
        let tokens = ctx.trivia_tokens_in(TextRange::new(3.into(), 4.into()));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), CsSyntaxKind::Newline);
    }
}
