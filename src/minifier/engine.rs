//! Reduction engine: the decision table and literal passthrough.

use std::io::{BufWriter, Read, Write};

use log::{debug, trace};

use super::chars::{
    closes_before_newline, is_alphanum, is_fusable_operator, is_quote, opens_after_newline,
    precedes_regex,
};
use super::reader::SignificantReader;
use super::source::RawSource;
use crate::error::{JsminResult, Span, SyntaxError};

/// What to do with the current `(pending, lookahead)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Emit `pending`, then shift `lookahead` into it.
    KeepAndAdvance,
    /// Discard `pending` and shift `lookahead` into it.
    DropAndAdvance,
    /// Discard `lookahead` and fetch the next one.
    AdvanceLookahead,
}

/// The decision table. `pending` is never end of input here.
pub fn decide(pending: u8, lookahead: Option<u8>) -> Action {
    use Action::*;

    let word_follows = lookahead.is_some_and(is_alphanum);
    match (pending, lookahead) {
        (b' ', _) => {
            if word_follows {
                KeepAndAdvance
            } else {
                DropAndAdvance
            }
        }
        (b'\n', Some(next)) if opens_after_newline(next) => KeepAndAdvance,
        (b'\n', Some(b' ')) => AdvanceLookahead,
        (b'\n', _) => {
            if word_follows {
                KeepAndAdvance
            } else {
                DropAndAdvance
            }
        }
        (_, Some(b' ')) => {
            if is_alphanum(pending) {
                KeepAndAdvance
            } else {
                AdvanceLookahead
            }
        }
        (_, Some(b'\n')) => {
            if closes_before_newline(pending) || is_alphanum(pending) {
                KeepAndAdvance
            } else {
                AdvanceLookahead
            }
        }
        _ => KeepAndAdvance,
    }
}

/// One minification run over one input stream.
///
/// `pending` starts as a newline so the first real token is handled as if
/// it began a line. The value is consumed by [`Minifier::run`].
///
/// Output is emitted a byte at a time into an internal `BufWriter`, so the
/// writer passed in needs no buffering of its own.
pub struct Minifier<R, W: Write> {
    reader: SignificantReader<R>,
    out: BufWriter<W>,
    pending: Option<u8>,
    lookahead: Option<u8>,
    written: usize,
}

impl<R: Read, W: Write> Minifier<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            reader: SignificantReader::new(RawSource::new(input)),
            out: BufWriter::new(out),
            pending: Some(b'\n'),
            lookahead: None,
            written: 0,
        }
    }

    /// Minify the whole input. On error, whatever was already written stays
    /// written and nothing more is.
    pub fn run(mut self) -> JsminResult<()> {
        let result = self.reduce();
        let flushed = self.out.flush();
        result?;
        flushed?;
        debug!("minified {} bytes into {}", self.reader.offset(), self.written);
        Ok(())
    }

    fn reduce(&mut self) -> JsminResult<()> {
        self.skip_byte_order_mark()?;
        self.advance_lookahead()?;
        while let Some(pending) = self.pending {
            match decide(pending, self.lookahead) {
                Action::KeepAndAdvance => self.flush_and_shift()?,
                Action::DropAndAdvance => self.copy_literal_if_quoted()?,
                Action::AdvanceLookahead => self.advance_lookahead()?,
            }
        }
        Ok(())
    }

    /// A leading 0xEF is taken as a byte-order mark and three bytes go,
    /// whatever the other two are.
    fn skip_byte_order_mark(&mut self) -> JsminResult<()> {
        if self.reader.peek_raw()? == Some(0xEF) {
            for _ in 0..3 {
                self.reader.read_raw()?;
            }
            debug!("skipped byte-order mark");
        }
        Ok(())
    }

    fn flush_and_shift(&mut self) -> JsminResult<()> {
        if let Some(pending) = self.pending {
            self.emit(pending)?;
            // keep `a + +b` from becoming `a++b`
            if let (Some(separator @ (b' ' | b'\n')), Some(next)) =
                (self.reader.prior_prior_raw(), self.lookahead)
            {
                if is_fusable_operator(pending) && is_fusable_operator(next) {
                    self.emit(separator)?;
                }
            }
        }
        self.copy_literal_if_quoted()
    }

    fn copy_literal_if_quoted(&mut self) -> JsminResult<()> {
        self.pending = self.lookahead;
        if let Some(quote) = self.pending.filter(|&byte| is_quote(byte)) {
            self.copy_string(quote)?;
        }
        self.advance_lookahead()
    }

    fn advance_lookahead(&mut self) -> JsminResult<()> {
        self.lookahead = self.reader.next_significant()?;
        if self.lookahead == Some(b'/') {
            if let Some(pending) = self.pending.filter(|&byte| precedes_regex(byte)) {
                self.copy_regex(pending)?;
                self.lookahead = self.reader.next_significant()?;
            }
        }
        Ok(())
    }

    /// Copy a quoted literal through verbatim. The closing quote is left in
    /// `pending`.
    fn copy_string(&mut self, quote: u8) -> JsminResult<()> {
        let start = self.reader.prior_raw_offset();
        trace!("string literal at byte {start}");
        let mut unit = quote;
        loop {
            self.emit(unit)?;
            unit = match self.reader.read_raw()? {
                Some(byte) if byte == quote => return Ok(()),
                Some(b'\\') => {
                    self.emit(b'\\')?;
                    self.read_in_literal(start, |span| SyntaxError::UnterminatedStringLiteral { span })?
                }
                Some(byte) => byte,
                None => {
                    let span = Span::new(start, self.reader.offset());
                    return Err(SyntaxError::UnterminatedStringLiteral { span }.into());
                }
            };
        }
    }

    /// Emit `pending` and copy a regular expression literal through. The
    /// closing slash is left in `pending`.
    fn copy_regex(&mut self, pending: u8) -> JsminResult<()> {
        let start = self.reader.prior_raw_offset();
        trace!("regular expression literal at byte {start}");
        self.emit(pending)?;
        if matches!(pending, b'/' | b'*') {
            self.emit(b' ')?;
        }
        self.emit(b'/')?;
        let unterminated = |span| SyntaxError::UnterminatedRegexLiteral { span };
        loop {
            let byte = match self.reader.read_raw()? {
                Some(b'[') => {
                    self.copy_character_class()?;
                    b']'
                }
                Some(b'/') => {
                    if matches!(self.reader.peek_raw()?, Some(b'/' | b'*')) {
                        let span = Span::new(start, self.reader.offset());
                        return Err(unterminated(span).into());
                    }
                    break;
                }
                Some(b'\\') => {
                    self.emit(b'\\')?;
                    self.read_in_literal(start, unterminated)?
                }
                Some(byte) => byte,
                None => {
                    let span = Span::new(start, self.reader.offset());
                    return Err(unterminated(span).into());
                }
            };
            self.emit(byte)?;
        }
        self.pending = Some(b'/');
        Ok(())
    }

    /// Copy `[...]` inside a regular expression up to, not including, the
    /// closing `]`. A `/` has no special meaning in here.
    fn copy_character_class(&mut self) -> JsminResult<()> {
        let start = self.reader.offset() - 1;
        let unterminated = |span| SyntaxError::UnterminatedRegexCharacterClass { span };
        let mut unit = b'[';
        loop {
            self.emit(unit)?;
            unit = match self.reader.read_raw()? {
                Some(b']') => return Ok(()),
                Some(b'\\') => {
                    self.emit(b'\\')?;
                    self.read_in_literal(start, unterminated)?
                }
                Some(byte) => byte,
                None => {
                    let span = Span::new(start, self.reader.offset());
                    return Err(unterminated(span).into());
                }
            };
        }
    }

    /// Raw read of an escaped byte; end of input fails with `error`.
    fn read_in_literal(
        &mut self,
        start: usize,
        error: impl FnOnce(Span) -> SyntaxError,
    ) -> JsminResult<u8> {
        match self.reader.read_raw()? {
            Some(byte) => Ok(byte),
            None => Err(error(Span::new(start, self.reader.offset())).into()),
        }
    }

    fn emit(&mut self, byte: u8) -> JsminResult<()> {
        self.out.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Action::*;
    use super::*;

    #[test]
    fn space_survives_only_before_a_word() {
        assert_eq!(decide(b' ', Some(b'a')), KeepAndAdvance);
        assert_eq!(decide(b' ', Some(b'(')), DropAndAdvance);
        assert_eq!(decide(b' ', None), DropAndAdvance);
    }

    #[test]
    fn newline_before_prefix_operators_survives() {
        for next in b"{[(+-!~" {
            assert_eq!(decide(b'\n', Some(*next)), KeepAndAdvance);
        }
        assert_eq!(decide(b'\n', Some(b' ')), AdvanceLookahead);
        assert_eq!(decide(b'\n', Some(b'x')), KeepAndAdvance);
        assert_eq!(decide(b'\n', Some(b'.')), DropAndAdvance);
        assert_eq!(decide(b'\n', None), DropAndAdvance);
    }

    #[test]
    fn trailing_separators() {
        assert_eq!(decide(b'x', Some(b' ')), KeepAndAdvance);
        assert_eq!(decide(b'=', Some(b' ')), AdvanceLookahead);
        for pending in b"}])+-\"'`x9" {
            assert_eq!(decide(*pending, Some(b'\n')), KeepAndAdvance);
        }
        assert_eq!(decide(b';', Some(b'\n')), AdvanceLookahead);
        assert_eq!(decide(b'{', Some(b'\n')), AdvanceLookahead);
    }

    #[test]
    fn ordinary_boundaries_are_kept() {
        assert_eq!(decide(b'a', Some(b'(')), KeepAndAdvance);
        assert_eq!(decide(b';', None), KeepAndAdvance);
    }

    fn run(input: &[u8]) -> (JsminResult<()>, Vec<u8>) {
        let mut out = Vec::new();
        let result = Minifier::new(input, &mut out).run();
        (result, out)
    }

    /// Counts calls that reach the underlying writer.
    #[derive(Default)]
    struct CountingWriter {
        writes: usize,
        bytes: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_reaches_the_writer_in_blocks() {
        let input = "var a = 1;\n".repeat(100);
        let mut writer = CountingWriter::default();
        Minifier::new(input.as_bytes(), &mut writer).run().unwrap();
        assert_eq!(writer.bytes.len(), 1 + "var a=1;".len() * 100);
        assert_eq!(writer.writes, 1);
    }

    #[test]
    fn partial_output_is_flushed_on_error() {
        let mut writer = CountingWriter::default();
        let result = Minifier::new(&b"var x; /* open"[..], &mut writer).run();
        assert!(result.is_err());
        assert_eq!(writer.bytes, b"\nvar x");
    }

    #[test]
    fn closing_quote_is_emitted_once() {
        let (result, out) = run(b"s = 'a\\'b' ;");
        result.unwrap();
        assert_eq!(out, b"\ns='a\\'b';");
    }

    #[test]
    fn regex_after_slash_gets_a_space() {
        let (result, out) = run(b"a / /re/.test(x)");
        result.unwrap();
        assert_eq!(out, b"\na/ /re/.test(x)");
    }

    #[test]
    fn escape_at_end_of_input_is_unterminated() {
        let (result, _) = run(b"x = \"abc\\");
        assert!(matches!(
            result,
            Err(crate::JsminError::Syntax(SyntaxError::UnterminatedStringLiteral { .. }))
        ));
    }
}
