//! Coarse lexical analysis used to check that minification preserved tokens.
//!
//! This is not a JavaScript tokenizer in the full sense: it does not tell a
//! regular expression literal from a division, and every punctuation
//! character is its own token. That is enough to compare a source with its
//! minified form, because the minifier never splits or joins tokens.

mod token;

pub use token::Token;

use logos::Logos;

/// Position tracking for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Position { line: 1, column: 1 }
    }

    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// A token with its position information
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPosition {
    pub token: Token,
    pub position: Position,
    pub span: logos::Span,
}

/// Lexer over JavaScript source text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Token>,
    position: Position,
    input: &'a str,
    base: usize,
    last_end: usize,
}

impl<'a> Lexer<'a> {
    /// A leading byte-order mark is not part of the token stream.
    pub fn new(input: &'a str) -> Self {
        let offset = if input.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
        Self {
            inner: Token::lexer(&input[offset..]),
            position: Position::new(),
            input,
            base: offset,
            last_end: offset,
        }
    }

    /// Collect all tokens
    pub fn collect_tokens(self) -> Vec<TokenWithPosition> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = TokenWithPosition;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let span = span.start + self.base..span.end + self.base;

        // Update position for any skipped content since last token
        for ch in self.input[self.last_end..span.start].chars() {
            self.position.advance(ch);
        }
        let position = self.position;
        for ch in self.input[span.start..span.end].chars() {
            self.position.advance(ch);
        }
        self.last_end = span.end;

        Some(TokenWithPosition {
            token: result.unwrap_or(Token::Error),
            position,
            span,
        })
    }
}
