//! Byte classes the reduction engine decides on.

/// Letters, digits, `_`, `$`, `\` and every non-ASCII byte.
///
/// Two of these on either side of a separator would fuse into one word, so
/// the separator has to survive.
pub fn is_alphanum(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$' | b'\\') || byte > 126
}

/// Operators that change meaning when doubled (`+ +` vs `++`, `/ /` vs `//`).
pub fn is_fusable_operator(byte: u8) -> bool {
    matches!(byte, b'+' | b'-' | b'*' | b'/')
}

/// A `/` right after one of these starts a regular expression literal.
pub fn precedes_regex(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b','
            | b'='
            | b':'
            | b'['
            | b'!'
            | b'&'
            | b'|'
            | b'?'
            | b'+'
            | b'-'
            | b'~'
            | b'*'
            | b'/'
            | b'{'
            | b'}'
            | b';'
    )
}

/// A line break before one of these may end a statement, so it is kept.
pub fn opens_after_newline(byte: u8) -> bool {
    matches!(byte, b'{' | b'[' | b'(' | b'+' | b'-' | b'!' | b'~')
}

/// A line break after one of these may end a statement, so it is kept.
pub fn closes_before_newline(byte: u8) -> bool {
    matches!(
        byte,
        b'}' | b']' | b')' | b'+' | b'-' | b'"' | b'\'' | b'`'
    )
}

pub fn is_quote(byte: u8) -> bool {
    matches!(byte, b'\'' | b'"' | b'`')
}
