//! レキサーテスト
//!
//! トークン検証に使う粗いレキサーの正常系とエッジケース。

use jsmin::lexer::{Lexer, Position, Token};
use pretty_assertions::assert_eq;

/// トークンの型のみを比較するヘルパー関数
fn extract_tokens(source: &str) -> Vec<Token> {
    Lexer::new(source).map(|t| t.token).collect()
}

#[test]
fn test_every_punctuation_character_is_its_own_token() {
    let tokens = extract_tokens("a+=++b");
    assert_eq!(
        tokens,
        vec![
            Token::Word("a".into()),
            Token::Punct('+'),
            Token::Punct('='),
            Token::Punct('+'),
            Token::Punct('+'),
            Token::Word("b".into()),
        ]
    );
}

#[test]
fn test_numbers_split_at_the_dot() {
    assert_eq!(
        extract_tokens("1.5e3"),
        vec![
            Token::Word("1".into()),
            Token::Punct('.'),
            Token::Word("5e3".into()),
        ]
    );
}

#[test]
fn test_template_literal() {
    assert_eq!(
        extract_tokens("`a ${b}\nc`"),
        vec![Token::Template("`a ${b}\nc`".into())]
    );
}

#[test]
fn test_non_ascii_identifier() {
    assert_eq!(extract_tokens("café"), vec![Token::Word("café".into())]);
}

#[test]
fn test_unterminated_string_is_an_error_token() {
    let tokens = extract_tokens("\"abc");
    assert_eq!(tokens[0], Token::Error);
}

#[test]
fn test_control_characters_are_whitespace() {
    assert_eq!(
        extract_tokens("a\t\x0bb"),
        vec![Token::Word("a".into()), Token::Word("b".into())]
    );
}

#[test]
fn test_positions_follow_lines() {
    let tokens = Lexer::new("x\n/* c\n */ y").collect_tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].position, Position { line: 1, column: 1 });
    assert_eq!(tokens[1].position, Position { line: 3, column: 5 });
}

#[test]
fn test_display_round_trips_the_slice() {
    let rendered: Vec<String> = extract_tokens("f('x', 2)")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["f", "(", "'x'", ",", "2", ")"]);
}

#[test]
fn test_block_comments_are_skipped() {
    assert_eq!(extract_tokens("/* b */ x"), vec![Token::Word("x".into())]);
    assert_eq!(extract_tokens("/**/ x"), vec![Token::Word("x".into())]);
    assert_eq!(
        extract_tokens("a /* * / ** */ b"),
        vec![Token::Word("a".into()), Token::Word("b".into())]
    );
}

#[test]
fn test_unterminated_block_comment_is_one_error_token() {
    let tokens = Lexer::new("a /* open").collect_tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].token, Token::Error);
    assert_eq!(tokens[1].span, 2..9);
}
