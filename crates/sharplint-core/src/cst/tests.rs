//! Tests for CST construction and manipulation

use super::*;
use rowan::GreenNodeBuilder;

/// Build: `{\n    get;\n\n}` by hand, without the tree builder
fn property_block() -> CsSyntaxNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(CsSyntaxKind::CompilationUnit.into());

    builder.start_node(CsSyntaxKind::Statement.into());
    builder.start_node(CsSyntaxKind::Block.into());
    builder.token(CsSyntaxKind::OpenBrace.into(), "{");
    builder.token(CsSyntaxKind::Newline.into(), "\n");
    builder.start_node(CsSyntaxKind::Statement.into());
    builder.token(CsSyntaxKind::Whitespace.into(), "    ");
    builder.token(CsSyntaxKind::Ident.into(), "get");
    builder.token(CsSyntaxKind::Semicolon.into(), ";");
    builder.token(CsSyntaxKind::Newline.into(), "\n");
    builder.finish_node();
    builder.token(CsSyntaxKind::Newline.into(), "\n");
    builder.token(CsSyntaxKind::CloseBrace.into(), "}");
    builder.finish_node();
    builder.finish_node();

    builder.token(CsSyntaxKind::EndOfFile.into(), "");
    builder.finish_node();

    CsSyntaxNode::new_root(builder.finish())
}

#[test]
fn test_hand_built_tree_is_lossless() {
    let root = property_block();
    assert_eq!(root.kind(), CsSyntaxKind::CompilationUnit);
    assert_eq!(root.text().to_string(), "{\n    get;\n\n}");

    let statement = root.first_child().expect("statement");
    assert_eq!(statement.kind(), CsSyntaxKind::Statement);
    let block = statement.first_child().expect("block");
    assert_eq!(block.kind(), CsSyntaxKind::Block);
}

#[test]
fn test_builder_matches_hand_built_tree() {
    let parsed = parse_source("{\n    get;\n\n}").syntax();
    assert_eq!(parsed.green().into_owned(), property_block().green().into_owned());
}

#[test]
fn test_trivia_tokens_copy_out_of_tree() {
    let root = property_block();
    let trivia: Vec<TriviaToken> = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter_map(|token| TriviaToken::from_token(&token))
        .collect();
    let kinds: Vec<TriviaKind> = trivia.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TriviaKind::EndOfLine,
            TriviaKind::Whitespace,
            TriviaKind::EndOfLine,
            TriviaKind::EndOfLine,
        ]
    );

    // The `;` line break and the empty line before `}`
    assert!(trivia::has_blank_line(&trivia[2..]));
}

#[test]
fn test_comments_and_directives_survive() {
    let source = "#region A\n/// <summary>x</summary>\n/* b */ int y; // c\n#endregion\n";
    let parse = parse_source(source);
    assert!(!parse.has_errors());
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), source);

    let kinds: Vec<CsSyntaxKind> = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .map(|token| token.kind())
        .filter(|kind| kind.is_trivia() && *kind != CsSyntaxKind::Newline)
        .collect();
    assert_eq!(
        kinds,
        vec![
            CsSyntaxKind::Directive,
            CsSyntaxKind::DocComment,
            CsSyntaxKind::BlockComment,
            CsSyntaxKind::Whitespace,
            CsSyntaxKind::Whitespace,
            CsSyntaxKind::Whitespace,
            CsSyntaxKind::LineComment,
            CsSyntaxKind::Directive,
        ]
    );
}

#[test]
fn test_edits_keep_other_text() {
    let root = parse_source("a;\n\n}").syntax();
    let blank = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == CsSyntaxKind::Newline)
        .nth(1)
        .expect("second newline");
    let edited = edit::remove_tokens(&root, &[blank]);
    assert_eq!(edited.text().to_string(), "a;\n}");
    // Original tree is untouched
    assert_eq!(root.text().to_string(), "a;\n\n}");
}
