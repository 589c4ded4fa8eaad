//! Significant-character reader: the raw source with comments removed.

use std::io::Read;

use super::source::RawSource;
use crate::error::{JsminResult, Span, SyntaxError};

/// Pulls significant bytes from a [`RawSource`].
///
/// A line comment is replaced by the byte that ended it (a newline, or end of
/// input). A block comment collapses to a single space. A lone `/` is
/// returned as is; whether it divides or opens a regular expression is the
/// engine's call.
///
/// The reader remembers the last two significant bytes it returned,
/// regardless of how the caller used them.
pub struct SignificantReader<R> {
    source: RawSource<R>,
    prior_raw: Option<u8>,
    prior_prior_raw: Option<u8>,
    prior_raw_at: usize,
}

impl<R: Read> SignificantReader<R> {
    pub fn new(source: RawSource<R>) -> Self {
        Self {
            source,
            prior_raw: None,
            prior_prior_raw: None,
            prior_raw_at: 0,
        }
    }

    pub fn next_significant(&mut self) -> JsminResult<Option<u8>> {
        let start = self.source.offset();
        let mut unit = self.source.read()?;
        if unit == Some(b'/') {
            match self.source.peek()? {
                Some(b'/') => unit = self.skip_line_comment()?,
                Some(b'*') => unit = self.skip_block_comment(start)?,
                _ => {}
            }
        }
        self.prior_prior_raw = self.prior_raw;
        self.prior_raw = unit;
        self.prior_raw_at = start;
        Ok(unit)
    }

    /// Raw read, bypassing comment stripping. Used inside literals.
    pub fn read_raw(&mut self) -> JsminResult<Option<u8>> {
        self.source.read()
    }

    pub fn peek_raw(&mut self) -> JsminResult<Option<u8>> {
        self.source.peek()
    }

    pub fn prior_raw(&self) -> Option<u8> {
        self.prior_raw
    }

    /// The significant byte fetched before [`Self::prior_raw`].
    pub fn prior_prior_raw(&self) -> Option<u8> {
        self.prior_prior_raw
    }

    /// Where the most recent significant byte started in the input.
    pub fn prior_raw_offset(&self) -> usize {
        self.prior_raw_at
    }

    pub fn offset(&self) -> usize {
        self.source.offset()
    }

    fn skip_line_comment(&mut self) -> JsminResult<Option<u8>> {
        loop {
            let unit = self.source.read()?;
            if unit.map_or(true, |byte| byte <= b'\n') {
                return Ok(unit);
            }
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> JsminResult<Option<u8>> {
        // the peeked '*'
        self.source.read()?;
        loop {
            match self.source.read()? {
                Some(b'*') => {
                    if self.source.peek()? == Some(b'/') {
                        self.source.read()?;
                        return Ok(Some(b' '));
                    }
                }
                Some(_) => {}
                None => {
                    let span = Span::new(start, self.source.offset());
                    return Err(SyntaxError::UnterminatedComment { span }.into());
                }
            }
        }
    }
}
