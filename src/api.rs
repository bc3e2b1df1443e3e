//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 行の書き出しに失敗した場合の処理方針
///
/// 巨大なワークブックを処理している途中で1行の書き込みに失敗しても、
/// それまでの進捗を失わないように、デフォルトでは処理を継続します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SinkErrorPolicy {
    /// 警告を記録して次の行に進む（デフォルト）
    ///
    /// 失敗した行は`SheetReport::sink_failures`に計上されます。
    #[default]
    Continue,

    /// 最初の失敗で処理全体を中断する
    ///
    /// `XlsxIngestError::Sink`が返されます。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxingest::{IngestBuilder, SelectionDescriptor, SinkErrorPolicy};
    ///
    /// # fn main() -> Result<(), xlsxingest::XlsxIngestError> {
    /// # let descriptor = SelectionDescriptor::default();
    /// let ingestor = IngestBuilder::new()
    ///     .with_selection(descriptor)
    ///     .with_sink_policy(SinkErrorPolicy::Abort)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Abort,
}

/// シートの構造エラー（不正なXML、途中で切れたストリーム）の処理方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetErrorPolicy {
    /// 警告を記録し、そのシートを中断して次のシートに進む（デフォルト）
    ///
    /// エラーメッセージは`SheetReport::error`に記録されます。
    #[default]
    Skip,

    /// ワークブック全体の処理を中断する
    ///
    /// `XlsxIngestError::MalformedSheet`が返されます。
    Abort,
}
