//! Builder Module
//!
//! Fluent Builder APIを提供し、`Ingestor`インスタンスを段階的に構築する。

use std::io::{Read, Seek};

use crate::api::{SheetErrorPolicy, SinkErrorPolicy};
use crate::error::XlsxIngestError;
use crate::parser::XlsxPackage;
use crate::processor::WorkbookProcessor;
use crate::security::SecurityConfig;
use crate::selection::{Selection, SelectionDescriptor};
use crate::sink::{MemorySink, RowSink};
use crate::types::ProcessOutcome;

/// プレビューに保持する行数のデフォルト
const DEFAULT_PREVIEW_ROWS: usize = 20;

/// 取り込み処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct IngestConfig {
    /// 検証済みの選択
    pub selection: Selection,

    /// 書き出し失敗時の処理方針
    pub sink_policy: SinkErrorPolicy,

    /// シートの構造エラー時の処理方針
    pub sheet_error_policy: SheetErrorPolicy,

    /// シートごとのプレビュー行数
    pub preview_rows: usize,

    /// ZIPアーカイブのセキュリティ制限
    pub security: SecurityConfig,
}

/// Fluent Builder APIを提供する構造体
///
/// 選択記述子は必須です。それ以外の設定項目にはデフォルト値があります。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxingest::{IngestBuilder, SelectionDescriptor, SheetErrorPolicy};
///
/// # fn main() -> Result<(), xlsxingest::XlsxIngestError> {
/// let descriptor = SelectionDescriptor::from_json(
///     r#"{"sheets":["Data"],"origin_rows":[1],"origin_columns":["A"],"columns":["id","name"]}"#,
/// )?;
///
/// let ingestor = IngestBuilder::new()
///     .with_selection(descriptor)
///     .with_sheet_error_policy(SheetErrorPolicy::Abort)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IngestBuilder {
    selection: Option<SelectionDescriptor>,
    sink_policy: SinkErrorPolicy,
    sheet_error_policy: SheetErrorPolicy,
    preview_rows: usize,
    security: SecurityConfig,
}

impl Default for IngestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 書き出し失敗: 警告を記録して継続
    /// - シートの構造エラー: 警告を記録して次のシートへ
    /// - プレビュー: シートごとに先頭20行
    /// - セキュリティ制限: `SecurityConfig::default()`
    pub fn new() -> Self {
        Self {
            selection: None,
            sink_policy: SinkErrorPolicy::default(),
            sheet_error_policy: SheetErrorPolicy::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            security: SecurityConfig::default(),
        }
    }

    /// 取り込むシート、原点、列を指定する
    ///
    /// # 引数
    ///
    /// * `descriptor` - 選択記述子。`build()`で検証されます
    pub fn with_selection(mut self, descriptor: SelectionDescriptor) -> Self {
        self.selection = Some(descriptor);
        self
    }

    /// 書き出し失敗時の処理方針を設定する
    pub fn with_sink_policy(mut self, policy: SinkErrorPolicy) -> Self {
        self.sink_policy = policy;
        self
    }

    /// シートの構造エラー時の処理方針を設定する
    pub fn with_sheet_error_policy(mut self, policy: SheetErrorPolicy) -> Self {
        self.sheet_error_policy = policy;
        self
    }

    /// シートごとのプレビュー行数を設定する（0でプレビューなし）
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// セキュリティ制限を上書きする
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxingest::{IngestBuilder, SecurityConfig, SelectionDescriptor};
    ///
    /// # fn main() -> Result<(), xlsxingest::XlsxIngestError> {
    /// # let descriptor = SelectionDescriptor::default();
    /// let security = SecurityConfig {
    ///     max_file_count: 500,
    ///     ..SecurityConfig::default()
    /// };
    /// let ingestor = IngestBuilder::new()
    ///     .with_selection(descriptor)
    ///     .with_security_config(security)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_security_config(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// 設定を検証して`Ingestor`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Ingestor)` - 設定が有効な場合
    /// * `Err(XlsxIngestError::Config)` - 選択記述子がない、またはリストの長さが一致しない、
    ///   原点座標が数値として解釈できない場合
    pub fn build(self) -> Result<Ingestor, XlsxIngestError> {
        let descriptor = self.selection.ok_or_else(|| {
            XlsxIngestError::Config("a selection descriptor is required".to_string())
        })?;
        let selection = descriptor.validate()?;

        Ok(Ingestor::new(IngestConfig {
            selection,
            sink_policy: self.sink_policy,
            sheet_error_policy: self.sheet_error_policy,
            preview_rows: self.preview_rows,
            security: self.security,
        }))
    }
}

/// 取り込み処理のファサード
///
/// `IngestBuilder`で構築します。同じ設定で複数のワークブックを処理できます。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::fs::File;
/// use xlsxingest::{IngestBuilder, MemorySink, SelectionDescriptor};
///
/// # fn main() -> Result<(), xlsxingest::XlsxIngestError> {
/// # let descriptor = SelectionDescriptor::default();
/// let ingestor = IngestBuilder::new().with_selection(descriptor).build()?;
/// let mut sink = MemorySink::new();
/// let outcome = ingestor.process(File::open("huge.xlsx")?, &mut sink)?;
/// println!("{} sheets, {} rows", outcome.sheet_count, sink.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub(crate) fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// 検証済みの選択
    pub fn selection(&self) -> &Selection {
        &self.config.selection
    }

    /// ワークブックを処理し、選択された行を書き出し先に渡す
    ///
    /// # 引数
    ///
    /// * `input` - XLSXファイルのリーダー（Read + Seekトレイトを実装）
    /// * `sink` - 行の書き出し先
    ///
    /// # 戻り値
    ///
    /// * `Ok(ProcessOutcome)` - プレビュー、シート名、シートごとの処理結果
    /// * `Err(XlsxIngestError)` - コンテナやワークブック単位のパーツが不正な場合、
    ///   セキュリティ制限に違反した場合、または中断方針のエラーが発生した場合
    ///
    /// # 処理フロー
    ///
    /// 1. ZIPエントリのセキュリティ検査
    /// 2. workbook.xmlとリレーションシップの解析
    /// 3. スタイルと共有文字列の読み込み（1回だけ）
    /// 4. 選択されたシートのストリーミング解析
    pub fn process<R, S>(&self, input: R, sink: &mut S) -> Result<ProcessOutcome, XlsxIngestError>
    where
        R: Read + Seek,
        S: RowSink + ?Sized,
    {
        let mut package = XlsxPackage::open(input, &self.config.security)?;
        WorkbookProcessor::new(&self.config).process(&mut package, sink)
    }

    /// ワークブックを処理し、行をメモリ上に集める
    ///
    /// 小さなワークブックやテスト向けです。
    pub fn collect<R: Read + Seek>(
        &self,
        input: R,
    ) -> Result<(ProcessOutcome, MemorySink), XlsxIngestError> {
        let mut sink = MemorySink::new();
        let outcome = self.process(input, &mut sink)?;
        Ok((outcome, sink))
    }
}
