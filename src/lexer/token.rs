//! トークン定義
//!
//! ミニファイ前後のテキストを比較するための粗いJavaScriptトークン。
//! 構文解析用ではないため、正規表現リテラルは区別しない。

use logos::{FilterResult, Logos};
use std::fmt;

#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(skip r"[\x00-\x20]+")]
pub enum Token {
    /// 識別子、キーワード、数値（`\` と非ASCII文字を含む）
    #[regex(r"[A-Za-z0-9_$\\\u{80}-\u{10FFFF}]+", |lex| lex.slice().to_owned())]
    Word(String),

    #[regex(r#""([^"\\]|\\[\x00-\u{10FFFF}])*""#, |lex| lex.slice().to_owned())]
    #[regex(r#"'([^'\\]|\\[\x00-\u{10FFFF}])*'"#, |lex| lex.slice().to_owned())]
    String(String),

    #[regex(r"`([^`\\]|\\[\x00-\u{10FFFF}])*`", |lex| lex.slice().to_owned())]
    Template(String),

    #[regex(r"[!#%&()*+,\-./:;<=>?@\[\]^{|}~]", |lex| lex.slice().chars().next())]
    Punct(char),

    // Comments (skip them)
    #[regex(r"//[^\n]*", logos::skip)]
    #[token("/*", skip_block_comment)]
    // 認識できない入力
    Error,
}

/// `*/` までを読み飛ばす。閉じていなければ残りをすべて消費してエラーにする
fn skip_block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(s) | Token::String(s) | Token::Template(s) => write!(f, "{s}"),
            Token::Punct(c) => write!(f, "{c}"),
            Token::Error => write!(f, "<error>"),
        }
    }
}
