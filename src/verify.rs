//! Token preservation check between a source and its minified form.

use crate::error::{Span, VerifyError};
use crate::lexer::Lexer;

/// Compare the token streams of `original` and `minified`.
///
/// Returns the number of tokens on success. Known false alarms: a regular
/// expression literal containing `/*` or `//` can make the two sides skip
/// different comment ranges, and tabs or carriage returns inside string
/// literals are canonicalized by the minifier and show up as changed
/// strings.
pub fn verify_tokens(original: &str, minified: &str) -> Result<usize, VerifyError> {
    let expected: Vec<_> = Lexer::new(original).collect();
    let found: Vec<_> = Lexer::new(minified).collect();

    for (index, (want, got)) in expected.iter().zip(&found).enumerate() {
        if want.token != got.token {
            return Err(VerifyError::TokenMismatch {
                index,
                expected: want.token.to_string(),
                found: got.token.to_string(),
                span: Span::from(want.span.clone()),
            });
        }
    }

    if expected.len() != found.len() {
        return Err(VerifyError::TokenCountMismatch {
            expected: expected.len(),
            found: found.len(),
        });
    }
    log::debug!("verified {} tokens", expected.len());
    Ok(expected.len())
}
