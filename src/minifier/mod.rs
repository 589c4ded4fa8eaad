//! Streaming minifier for JavaScript source text.
//!
//! Three layers, each pulling from the one below on demand:
//!
//! 1. [`source::RawSource`] reads bytes, canonicalizes control characters and
//!    keeps one byte of pushback.
//! 2. [`reader::SignificantReader`] strips `//` and `/* */` comments.
//! 3. [`engine::Minifier`] decides, byte by byte, which separators can go,
//!    and copies string, template and regular expression literals through
//!    untouched.
//!
//! Memory use does not grow with the input. There is no tokenization pass and
//! no backtracking beyond the single byte of lookahead.

pub mod chars;
pub mod engine;
pub mod reader;
pub mod source;

use std::io::{Read, Write};

use crate::error::{JsminError, JsminResult};

pub use engine::{decide, Action, Minifier};

/// Options applied around the core reduction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Lines written as `// line` comments ahead of the minified text.
    pub header_comments: Vec<String>,
}

impl MinifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_comments = comments.into_iter().map(Into::into).collect();
        self
    }
}

/// Minify `input` into `output`.
pub fn minify<R: Read, W: Write>(input: R, output: W) -> JsminResult<()> {
    Minifier::new(input, output).run()
}

/// Minify `input` into `output`, writing the configured header first.
pub fn minify_with<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &MinifyOptions,
) -> JsminResult<()> {
    write_header(&mut output, &options.header_comments)?;
    minify(input, output)
}

/// Write each line as a `// line` comment.
pub fn write_header<W: Write>(output: &mut W, comments: &[String]) -> JsminResult<()> {
    for comment in comments {
        writeln!(output, "// {comment}")?;
    }
    Ok(())
}

pub fn minify_bytes(input: &[u8]) -> JsminResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    minify(input, &mut out)?;
    Ok(out)
}

/// Minify a string. Valid UTF-8 in gives valid UTF-8 out, since only whole
/// ASCII separators are ever removed.
pub fn minify_str(input: &str) -> JsminResult<String> {
    let out = minify_bytes(input.as_bytes())?;
    String::from_utf8(out).map_err(|e| JsminError::Other(e.to_string()))
}
