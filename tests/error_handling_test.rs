//! 統一的なエラーハンドリングのテスト
//!
//! 未終了リテラルは致命的エラーとなり、失敗位置以降は何も出力されない。

use jsmin::error::{JsminError, Span, SyntaxError};
use jsmin::{minify, MinifyPipeline, MinifyOptions, MinifyState};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// 失敗するまでに書き出された出力とエラーを返す
fn minify_partial(source: &str) -> (String, JsminError) {
    let mut out = Vec::new();
    let err = minify(source.as_bytes(), &mut out).unwrap_err();
    (String::from_utf8(out).unwrap(), err)
}

#[test_case(
    "var x; /* never closed",
    "\nvar x",
    SyntaxError::UnterminatedComment { span: Span::new(7, 22) }
    ; "unterminated comment"
)]
#[test_case(
    "var s = \"abc",
    "\nvar s=\"abc",
    SyntaxError::UnterminatedStringLiteral { span: Span::new(8, 12) }
    ; "unterminated string"
)]
#[test_case(
    "var s = \"abc\\",
    "\nvar s=\"abc\\",
    SyntaxError::UnterminatedStringLiteral { span: Span::new(8, 13) }
    ; "escape at end of input"
)]
#[test_case(
    "var t = `multi\nline",
    "\nvar t=`multi\nline",
    SyntaxError::UnterminatedStringLiteral { span: Span::new(8, 19) }
    ; "unterminated template"
)]
#[test_case(
    "x = /[abc/;",
    "\nx=/[abc/;",
    SyntaxError::UnterminatedRegexCharacterClass { span: Span::new(5, 11) }
    ; "unterminated character class"
)]
#[test_case(
    "(/[\\",
    "\n(/[\\",
    SyntaxError::UnterminatedRegexCharacterClass { span: Span::new(2, 4) }
    ; "escape at end of input in character class"
)]
#[test_case(
    "x = /[a\\",
    "\nx=/[a\\",
    SyntaxError::UnterminatedRegexCharacterClass { span: Span::new(5, 8) }
    ; "escape at end of input in character class after assignment"
)]
#[test_case(
    "x = /abc",
    "\nx=/abc",
    SyntaxError::UnterminatedRegexLiteral { span: Span::new(4, 8) }
    ; "unterminated regex"
)]
#[test_case(
    "x = /abc//",
    "\nx=/abc",
    SyntaxError::UnterminatedRegexLiteral { span: Span::new(4, 9) }
    ; "regex closed into line comment"
)]
#[test_case(
    "x = /abc/*c*/",
    "\nx=/abc",
    SyntaxError::UnterminatedRegexLiteral { span: Span::new(4, 9) }
    ; "regex closed into block comment"
)]
fn fails_without_further_output(source: &str, flushed: &str, expected: SyntaxError) {
    let (out, err) = minify_partial(source);
    assert_eq!(out, flushed);
    assert_eq!(err, JsminError::Syntax(expected));
}

#[test]
fn test_error_messages() {
    let (_, err) = minify_partial("/*");
    assert_eq!(err.to_string(), "Unterminated comment.");
    let (_, err) = minify_partial("'");
    assert_eq!(err.to_string(), "Unterminated string literal.");
    let (_, err) = minify_partial("(/[");
    assert_eq!(
        err.to_string(),
        "Unterminated set in Regular Expression literal."
    );
    let (_, err) = minify_partial("(/a");
    assert_eq!(err.to_string(), "Unterminated Regular Expression literal.");
}

#[test]
fn test_comment_markers_inside_strings_are_not_errors() {
    let mut out = Vec::new();
    minify("s = '/* not a comment'".as_bytes(), &mut out).unwrap();
    assert_eq!(out, b"\ns='/* not a comment'");
}

#[test]
fn test_write_failure_is_reported_as_io() {
    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = minify("x".as_bytes(), Broken).unwrap_err();
    assert!(matches!(err, JsminError::Io(ref message) if message.contains("pipe closed")));
}

#[test]
fn test_pipeline_collects_the_error() {
    let state = MinifyState::new_from_bytes("broken.js", b"let s = 'oops".to_vec());
    let mut pipeline = MinifyPipeline::new(state, MinifyOptions::new());
    assert!(pipeline.run(false).is_none());
    assert!(pipeline.state().has_errors());
    assert_eq!(pipeline.state().error_count(), 1);
}

#[test]
fn test_missing_file() {
    let result = MinifyState::new("does/not/exist.js");
    match result {
        Err(JsminError::Io(message)) => {
            assert!(message.starts_with("Failed to read source file does/not/exist.js"));
        }
        other => panic!("expected an I/O error, got {:?}", other.err()),
    }
}
