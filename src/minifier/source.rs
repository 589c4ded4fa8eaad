//! Raw character source: canonicalized bytes with one byte of pushback.

use std::io::{Bytes, Read};
use std::iter::Fuse;

use crate::error::JsminResult;

/// The pushback cell. `Held(None)` means end of input was peeked, which is
/// different from having nothing held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pushback {
    Empty,
    Held(Option<u8>),
}

/// Reads one byte at a time from `R`.
///
/// Tabs and other control bytes come back as `b' '`, carriage returns as
/// `b'\n'`. `None` is end of input. The source does no buffering of its own;
/// wrap unbuffered readers in a `BufReader`.
pub struct RawSource<R> {
    bytes: Fuse<Bytes<R>>,
    pushback: Pushback,
    consumed: usize,
}

impl<R: Read> RawSource<R> {
    pub fn new(input: R) -> Self {
        Self {
            bytes: input.bytes().fuse(),
            pushback: Pushback::Empty,
            consumed: 0,
        }
    }

    /// Next canonical byte, taking the pushback cell first.
    pub fn read(&mut self) -> JsminResult<Option<u8>> {
        let unit = match std::mem::replace(&mut self.pushback, Pushback::Empty) {
            Pushback::Held(unit) => unit,
            Pushback::Empty => self.read_byte()?,
        };
        Ok(canonicalize(unit))
    }

    /// Look at the next byte without consuming it. Repeated peeks return the
    /// same value.
    pub fn peek(&mut self) -> JsminResult<Option<u8>> {
        let unit = self.read()?;
        self.pushback = Pushback::Held(unit);
        Ok(unit)
    }

    /// Byte offset of the next unread byte.
    pub fn offset(&self) -> usize {
        match self.pushback {
            Pushback::Held(Some(_)) => self.consumed - 1,
            Pushback::Held(None) | Pushback::Empty => self.consumed,
        }
    }

    fn read_byte(&mut self) -> JsminResult<Option<u8>> {
        match self.bytes.next() {
            Some(byte) => {
                self.consumed += 1;
                Ok(Some(byte?))
            }
            None => Ok(None),
        }
    }
}

fn canonicalize(unit: Option<u8>) -> Option<u8> {
    match unit {
        Some(b'\r') => Some(b'\n'),
        Some(byte) if byte >= b' ' || byte == b'\n' => Some(byte),
        Some(_) => Some(b' '),
        None => None,
    }
}
