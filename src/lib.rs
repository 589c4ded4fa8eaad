//! jsmin Library
//!
//! A streaming JavaScript minifier: strips comments, collapses insignificant
//! whitespace and normalizes line endings without parsing the program.

pub mod error;
pub mod lexer;
pub mod minifier;
pub mod pipeline;
pub mod verify;

// Re-export commonly used types
pub use error::{ErrorCollector, JsminError, JsminResult, Span, SyntaxError, VerifyError};
pub use lexer::{Lexer, Token, TokenWithPosition};
pub use minifier::{minify, minify_bytes, minify_str, minify_with, Minifier, MinifyOptions};
pub use pipeline::{MinifyOutput, MinifyPipeline, MinifyState, MinifyStats};
pub use verify::verify_tokens;
