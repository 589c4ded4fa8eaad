//! 統一的なエラーハンドリングモジュール
//!
//! このモジュールは、ミニファイア全体で使用される統一的なエラー型と
//! エラー報告システムを提供します。

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use thiserror::Error;

/// ソース内のバイト範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<logos::Span> for Span {
    fn from(span: logos::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

/// jsminの統一エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsminError {
    /// 未終了リテラルなど、入力そのものに起因する致命的エラー
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// トークン保存検証の失敗
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// 先頭の 0xEF がバイトオーダーマークではない（警告用）
    #[error("leading 0xEF byte is not a byte-order mark; the first three bytes are discarded")]
    LooseByteOrderMark { span: Span },

    /// ファイルI/Oエラー
    #[error("{0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// 入力ストリームの走査中に検出される致命的エラー
///
/// どれも途中で回復できない。未終了のリテラル以降のバイトは分類できないため。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Unterminated comment.")]
    UnterminatedComment { span: Span },

    #[error("Unterminated string literal.")]
    UnterminatedStringLiteral { span: Span },

    #[error("Unterminated set in Regular Expression literal.")]
    UnterminatedRegexCharacterClass { span: Span },

    #[error("Unterminated Regular Expression literal.")]
    UnterminatedRegexLiteral { span: Span },
}

impl SyntaxError {
    /// リテラルの開始位置から失敗位置までの範囲
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::UnterminatedComment { span }
            | SyntaxError::UnterminatedStringLiteral { span }
            | SyntaxError::UnterminatedRegexCharacterClass { span }
            | SyntaxError::UnterminatedRegexLiteral { span } => *span,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SyntaxError::UnterminatedComment { .. } => "コメントがここで開始され、閉じられていません",
            SyntaxError::UnterminatedStringLiteral { .. } => "文字列が閉じられていません",
            SyntaxError::UnterminatedRegexCharacterClass { .. } => "文字クラスが閉じられていません",
            SyntaxError::UnterminatedRegexLiteral { .. } => "正規表現リテラルが閉じられていません",
        }
    }
}

/// 元のソースとミニファイ結果のトークン列の不一致
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token {index} differs: expected `{expected}`, found `{found}`")]
    TokenMismatch {
        index: usize,
        expected: String,
        found: String,
        span: Span,
    },

    #[error("token count differs: source has {expected}, minified output has {found}")]
    TokenCountMismatch { expected: usize, found: usize },
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: JsminError,
    pub file_id: usize,
    pub severity: Severity,
}

impl DiagnosticError {
    pub fn new(error: JsminError, file_id: usize) -> Self {
        Self {
            error,
            file_id,
            severity: Severity::Error,
        }
    }

    pub fn warning(error: JsminError, file_id: usize) -> Self {
        Self {
            error,
            file_id,
            severity: Severity::Warning,
        }
    }

    /// codespan-reportingのDiagnosticに変換
    ///
    /// `raw` は元のバイト列、`text` はそれを `String::from_utf8_lossy` で
    /// 変換したファイル内容。構文エラーと BOM の範囲は `raw` 上のオフセット
    /// なので `text` 上のオフセットに読み替える。検証エラーの範囲は最初から
    /// `text` 上にある。
    pub fn to_diagnostic(&self, raw: &[u8], text: &str) -> Diagnostic<usize> {
        let from_raw = |start: usize, end: usize| {
            clamp_range(text, lossy_offset(raw, start), lossy_offset(raw, end))
        };
        let labels = match &self.error {
            JsminError::Syntax(e) => {
                let span = e.span();
                vec![
                    Label::primary(self.file_id, from_raw(span.start, span.start + 1))
                        .with_message(e.label()),
                    Label::secondary(self.file_id, from_raw(span.end, span.end))
                        .with_message("入力がここで終了しました"),
                ]
            }
            JsminError::Verify(VerifyError::TokenMismatch { span, .. }) => vec![
                Label::primary(self.file_id, clamp_range(text, span.start, span.end))
                    .with_message("このトークンが出力で変化しました"),
            ],
            JsminError::LooseByteOrderMark { span } => vec![
                Label::primary(self.file_id, from_raw(span.start, span.end))
                    .with_message("この範囲は出力されません"),
            ],
            JsminError::Verify(VerifyError::TokenCountMismatch { .. })
            | JsminError::Io(_)
            | JsminError::Other(_) => vec![],
        };

        Diagnostic::new(self.severity)
            .with_message(self.error.to_string())
            .with_labels(labels)
    }
}

/// `raw` 上のバイトオフセットを `String::from_utf8_lossy(raw)` 上のオフセットに変換
///
/// 不正なバイト列はまとめて U+FFFD 1文字（3バイト）になる。不正な列の途中を
/// 指すオフセットはその置換文字の先頭に対応させる。
fn lossy_offset(raw: &[u8], offset: usize) -> usize {
    let mut raw_pos = 0;
    let mut text_pos = 0;
    for chunk in raw.utf8_chunks() {
        let valid = chunk.valid().len();
        if offset < raw_pos + valid {
            return text_pos + offset - raw_pos;
        }
        raw_pos += valid;
        text_pos += valid;

        let invalid = chunk.invalid().len();
        if invalid > 0 {
            if offset < raw_pos + invalid {
                return text_pos;
            }
            raw_pos += invalid;
            text_pos += char::REPLACEMENT_CHARACTER.len_utf8();
        }
    }
    text_pos
}

/// バイト範囲をソース長と文字境界に収める
fn clamp_range(source: &str, start: usize, end: usize) -> std::ops::Range<usize> {
    let floor = |mut index: usize| {
        index = index.min(source.len());
        while !source.is_char_boundary(index) {
            index -= 1;
        }
        index
    };
    let start = floor(start);
    start..floor(end).max(start)
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
    warnings: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: JsminError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// 警告を追加
    pub fn add_warning(&mut self, error: JsminError, file_id: usize) {
        self.warnings.push(DiagnosticError::warning(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告の数
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    /// すべての警告を取得
    pub fn warnings(&self) -> &[DiagnosticError] {
        &self.warnings
    }

    /// 最初のエラーを取得
    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }
}

/// Result型のエイリアス
pub type JsminResult<T> = Result<T, JsminError>;

/// エラー変換用のヘルパートレイト
pub trait IntoJsminError {
    fn into_jsmin_error(self) -> JsminError;
}

impl IntoJsminError for std::io::Error {
    fn into_jsmin_error(self) -> JsminError {
        JsminError::Io(self.to_string())
    }
}

impl IntoJsminError for JsminError {
    fn into_jsmin_error(self) -> JsminError {
        self
    }
}

impl From<std::io::Error> for JsminError {
    fn from(e: std::io::Error) -> Self {
        JsminError::Io(e.to_string())
    }
}

/// エラーコンテキスト追加用のヘルパートレイト
pub trait WithContext<T> {
    fn with_context<F>(self, f: F) -> JsminResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> WithContext<T> for Result<T, E>
where
    E: IntoJsminError,
{
    fn with_context<F>(self, f: F) -> JsminResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into_jsmin_error() {
            JsminError::Io(msg) => JsminError::Io(format!("{}: {}", f(), msg)),
            JsminError::Other(msg) => JsminError::Other(format!("{}: {}", f(), msg)),
            other => other,
        })
    }
}
