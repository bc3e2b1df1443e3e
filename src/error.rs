//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! エラーは致命度によって3種類に分かれます。
//!
//! - [`XlsxIngestError`]: 処理を中断するエラー（構造エラー、設定エラーなど）
//! - [`DecodeError`]: 単一セルのデコード失敗。ログに記録してセルを破棄する
//! - [`SinkError`]: 行の永続化失敗。ポリシーに応じて継続または中断する

use thiserror::Error;

/// xlsxingestクレート全体で使用するエラー型
///
/// ワークブックの読み込み、シートのストリーミング解析、行の書き出し中に
/// 発生する致命的なエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Zip`: XLSXコンテナ（ZIPアーカイブ）の読み込みエラー
/// - `Xml`: ワークブック単位のパーツ（styles.xml等）の解析エラー
/// - `MalformedSheet`: シートXMLの構造エラー（そのシートにとって致命的）
/// - `Config`: 選択記述子などの設定の検証エラー
/// - `Sink`: 厳格モードでの行書き出しエラー
/// - `SecurityViolation`: セキュリティ制限違反
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxingest::XlsxIngestError;
/// use std::fs::File;
///
/// fn open_workbook(path: &str) -> Result<File, XlsxIngestError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxIngestError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 数値の解析エラー（styles.xmlの属性値など）
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// ワークブック単位のXMLパーツの解析エラー
    ///
    /// styles.xml、sharedStrings.xml、workbook.xmlなど、全シートで共有される
    /// パーツが壊れている場合に発生します。ワークブック全体にとって致命的です。
    #[error("XML parse error in '{part}': {message}")]
    Xml {
        /// パーツのパス（例: `xl/styles.xml`）
        part: String,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// シートXMLの構造エラー
    ///
    /// 不正なXML、予期しない要素の入れ子、途中で切れたストリームなど。
    /// そのシートの処理は中断されます。後続シートを処理するかどうかは
    /// `SheetErrorPolicy`で決まります。
    #[error("Malformed sheet '{sheet}': {message}")]
    MalformedSheet {
        /// シート名
        sheet: String,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// 必須パーツが見つからない
    #[error("Missing workbook part: {0}")]
    MissingPart(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `IngestBuilder::build()`時に選択記述子を検証し、リストの長さの不一致や
    /// 数値でない原点座標が検出された場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxingest::{IngestBuilder, SelectionDescriptor, XlsxIngestError};
    ///
    /// let descriptor = SelectionDescriptor {
    ///     sheets: vec!["Data".to_string()],
    ///     origin_rows: vec![],
    ///     origin_columns: vec![],
    ///     columns: vec![],
    /// };
    ///
    /// match IngestBuilder::new().with_selection(descriptor).build() {
    ///     Err(XlsxIngestError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 行の書き出しに失敗したエラー（`SinkErrorPolicy::Abort`の場合のみ）
    #[error("Row sink failed on sheet '{sheet}' at row {row}: {source}")]
    Sink {
        /// シート名
        sheet: String,
        /// 行の序数（0始まり）
        row: u64,
        /// 書き出し先のエラー
        #[source]
        source: SinkError,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、エントリ数の上限などに違反した場合に
    /// シートを開く前に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

/// セル単位のデコードエラー（非致命的）
///
/// このエラーは行やシートを中断しません。該当セルの値だけが破棄され、
/// `warn`レベルでログに記録されます。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// 数値として解釈できない生テキスト
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// 整数として解釈できない共有文字列インデックス
    #[error("invalid shared string index '{0}'")]
    InvalidSharedStringIndex(String),

    /// 共有文字列プールの範囲外のインデックス
    #[error("shared string index {index} out of range (pool size {len})")]
    IndexOutOfRange {
        /// 要求されたインデックス
        index: i64,
        /// プールのサイズ
        len: usize,
    },

    /// 列と行に分解できないセル参照
    #[error("invalid cell reference '{0}'")]
    InvalidCellRef(String),
}

/// 行の書き出し先で発生したエラー
#[derive(Error, Debug)]
pub enum SinkError {
    /// SQLiteへの挿入エラー
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// 書き出し先が行を拒否した
    #[error("row rejected: {0}")]
    Rejected(String),
}
