//! Security Module
//!
//! XLSXコンテナを開く前のセキュリティ検査を実装するモジュール。
//! ZIP bomb攻撃、パストラバーサル攻撃、過大なエントリ数への対策を提供します。
//!
//! 巨大なワークブックのストリーミング処理が前提のため、上限値はシートXMLの
//! 展開後サイズが数GBになるケースを許容する値にしています。

use crate::error::XlsxIngestError;

/// セキュリティ設定
///
/// ZIPアーカイブの検査で使用する上限値です。
/// `IngestBuilder::with_security_config`で上書きできます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// 展開後の合計最大サイズ（バイト）
    /// デフォルト: 16GB
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一エントリの展開後最大サイズ（バイト）
    /// デフォルト: 8GB
    pub max_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 17_179_869_184, // 16GB
            max_file_count: 10_000,
            max_file_size: 8_589_934_592, // 8GB
        }
    }
}

impl SecurityConfig {
    /// デフォルトのセキュリティ設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// アーカイブ全体のエントリを検査する
    ///
    /// # 引数
    ///
    /// * `entries` - (エントリ名, 展開後サイズ) のリスト
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - すべての制限を満たす場合
    /// * `Err(XlsxIngestError::SecurityViolation)` - いずれかの制限に違反した場合
    pub(crate) fn check_entries<'a, I>(&self, entries: I) -> Result<(), XlsxIngestError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut count = 0usize;
        let mut total_decompressed_size = 0u64;

        for (name, size) in entries {
            count += 1;
            if count > self.max_file_count {
                return Err(XlsxIngestError::SecurityViolation(format!(
                    "ZIP archive contains too many files (max: {})",
                    self.max_file_count
                )));
            }

            validate_zip_path(name).map_err(|e| {
                XlsxIngestError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            if size > self.max_file_size {
                return Err(XlsxIngestError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    name, size, self.max_file_size
                )));
            }

            total_decompressed_size = total_decompressed_size.checked_add(size).ok_or_else(|| {
                XlsxIngestError::SecurityViolation(
                    "Total decompressed size calculation overflow".to_string(),
                )
            })?;

            if total_decompressed_size > self.max_decompressed_size {
                return Err(XlsxIngestError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, self.max_decompressed_size
                )));
            }
        }

        Ok(())
    }
}

/// ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ZIPエントリのパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}
