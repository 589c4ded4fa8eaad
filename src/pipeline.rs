//! ミニファイ処理のパイプラインモジュール
//!
//! このモジュールは、ファイル単位のミニファイ処理を管理し、
//! エラーと警告を蓄積して診断情報として報告する機能を提供します。

use crate::error::{ErrorCollector, JsminError, JsminResult, Span, WithContext};
use crate::minifier::{minify_with, MinifyOptions};
use crate::verify::verify_tokens;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// ミニファイ状態を管理する構造体
pub struct MinifyState {
    pub source_file: String,
    pub source: Vec<u8>,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl MinifyState {
    /// ファイルから新しい状態を作成
    pub fn new<P: AsRef<Path>>(source_file: P) -> JsminResult<Self> {
        let source_file_str = source_file.as_ref().display().to_string();
        let source = fs::read(source_file.as_ref())
            .with_context(|| format!("Failed to read source file {}", source_file_str))?;
        Ok(Self::new_from_bytes(&source_file_str, source))
    }

    /// バイト列から状態を作成（テスト用）
    pub fn new_from_bytes(filename: &str, source: Vec<u8>) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(
            filename.to_string(),
            String::from_utf8_lossy(&source).into_owned(),
        );

        Self {
            source_file: filename.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: JsminError) {
        self.error_collector.add_error(error, self.file_id);
    }

    /// 警告を追加
    pub fn add_warning(&mut self, error: JsminError) {
        self.error_collector.add_warning(error, self.file_id);
    }

    /// 診断情報を標準エラー出力に報告
    pub fn report_diagnostics(&self) -> JsminResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let mut lock = writer.lock();
        self.emit_diagnostics(&mut lock)
    }

    /// 診断情報を任意のライターに出力
    pub fn emit_diagnostics(&self, writer: &mut dyn WriteColor) -> JsminResult<()> {
        let config = codespan_reporting::term::Config::default();
        let text = self.text();

        let all = self
            .error_collector
            .errors()
            .iter()
            .chain(self.error_collector.warnings());
        for error in all {
            let diagnostic = error.to_diagnostic(&self.source, text);
            codespan_reporting::term::emit(writer, &config, &self.files, &diagnostic)
                .map_err(|e| JsminError::Io(format!("Failed to emit diagnostic: {}", e)))?;
        }

        Ok(())
    }

    /// エラーがあるかチェック
    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }

    /// 警告数を取得
    pub fn warning_count(&self) -> usize {
        self.error_collector.warning_count()
    }

    fn text(&self) -> &str {
        // 登録済みのファイルは必ず存在する
        self.files
            .get(self.file_id)
            .map(|file| file.source().as_str())
            .unwrap_or_default()
    }
}

/// サイズ統計
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinifyStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub saved_bytes: usize,
    pub reduction_pct: f64,
}

impl MinifyStats {
    pub fn new(input_bytes: usize, output_bytes: usize) -> Self {
        let saved_bytes = input_bytes.saturating_sub(output_bytes);
        let reduction_pct = if input_bytes > 0 {
            saved_bytes as f64 / input_bytes as f64 * 100.0
        } else {
            0.0
        };
        Self {
            input_bytes,
            output_bytes,
            saved_bytes,
            reduction_pct,
        }
    }
}

/// パイプラインの出力
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub minified: Vec<u8>,
    pub stats: MinifyStats,
    /// 検証を行った場合のトークン数
    pub verified_tokens: Option<usize>,
}

/// ミニファイパイプライン
pub struct MinifyPipeline {
    state: MinifyState,
    options: MinifyOptions,
}

impl MinifyPipeline {
    /// 新しいパイプラインを作成
    pub fn new(state: MinifyState, options: MinifyOptions) -> Self {
        Self { state, options }
    }

    /// 状態への参照を取得
    pub fn state(&self) -> &MinifyState {
        &self.state
    }

    /// 状態への可変参照を取得
    pub fn state_mut(&mut self) -> &mut MinifyState {
        &mut self.state
    }

    /// 先頭の 0xEF に続く2バイトがBOMでなければ警告する
    pub fn check_byte_order_mark(&mut self) {
        let source = &self.state.source;
        if source.first() == Some(&0xEF) && !source.starts_with(&[0xEF, 0xBB, 0xBF]) {
            let span = Span::new(0, source.len().min(3));
            self.state.add_warning(JsminError::LooseByteOrderMark { span });
        }
    }

    /// ミニファイを実行
    pub fn minify(&mut self) -> Option<Vec<u8>> {
        log::debug!("ステップ: {} のミニファイを開始", self.state.source_file);

        let mut out = Vec::with_capacity(self.state.source.len());
        match minify_with(self.state.source.as_slice(), &mut out, &self.options) {
            Ok(()) => Some(out),
            Err(e) => {
                self.state.add_error(e);
                None
            }
        }
    }

    /// トークン保存を検証
    pub fn verify(&mut self, minified: &[u8]) -> Option<usize> {
        log::debug!("ステップ: トークン検証を開始");

        let result = {
            let original = String::from_utf8_lossy(&self.state.source);
            let minified = String::from_utf8_lossy(minified);
            verify_tokens(&original, &minified)
        };
        match result {
            Ok(count) => Some(count),
            Err(e) => {
                self.state.add_error(e.into());
                None
            }
        }
    }

    /// エラーレポートを生成
    pub fn report_errors(&self) -> JsminResult<()> {
        self.state.report_diagnostics()?;

        if self.state.has_errors() {
            eprintln!(
                "\n{}: {} 個のエラーが見つかりました",
                self.state.source_file,
                self.state.error_count()
            );
        }

        Ok(())
    }

    /// パイプライン全体を実行（診断の出力は呼び出し側が行う）
    pub fn run(&mut self, verify: bool) -> Option<MinifyOutput> {
        self.check_byte_order_mark();

        let minified = self.minify()?;

        // ヘッダーコメントは検証の対象外
        let verified_tokens = if verify && self.options.header_comments.is_empty() {
            Some(self.verify(&minified)?)
        } else {
            None
        };

        let stats = MinifyStats::new(self.state.source.len(), minified.len());
        log::info!(
            "{}: {} -> {} bytes ({:.1}% smaller)",
            self.state.source_file,
            stats.input_bytes,
            stats.output_bytes,
            stats.reduction_pct
        );

        Some(MinifyOutput {
            minified,
            stats,
            verified_tokens,
        })
    }
}
