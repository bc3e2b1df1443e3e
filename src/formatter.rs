//! Formatter Module
//!
//! 数値セルの生テキストを、スタイルの数値書式に従って表示文字列に変換するモジュール。

use std::collections::HashMap;

use crate::error::DecodeError;
use crate::format::{format_general, FormatParser};

/// 解析済み書式のキャッシュ上限
///
/// 1つのワークブックで使われる書式の数はスタイル数で抑えられるため、
/// 通常はこの上限に達しません。
const MAX_CACHED_PATTERNS: usize = 1024;

/// 数値フォーマッター
///
/// セルの生テキスト（常に10進数、指数表記を含む場合あり）と書式から、
/// Excelと同じ表示文字列を生成します。解析済みの書式はキャッシュされます。
///
/// # 使用例
///
/// ```rust
/// use xlsxingest::NumberFormatter;
///
/// let mut formatter = NumberFormatter::new(false);
/// assert_eq!(formatter.format("0.5", 9, Some("0%")).unwrap(), "50%");
/// assert_eq!(formatter.format("45658", 14, Some("m/d/yy")).unwrap(), "1/1/25");
/// assert_eq!(formatter.format("1.5", 0, None).unwrap(), "1.5");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberFormatter {
    /// 1904年エポックを使用するかどうか（workbook.xmlの`date1904`）
    date_1904: bool,

    cache: HashMap<String, FormatParser>,
}

impl NumberFormatter {
    /// 新しいNumberFormatterを生成
    ///
    /// # 引数
    ///
    /// * `date_1904` - 日付のシリアル値を1904年エポックで解釈するかどうか
    pub fn new(date_1904: bool) -> Self {
        Self {
            date_1904,
            cache: HashMap::new(),
        }
    }

    /// 1904年エポックを使用するかどうか
    pub fn date_1904(&self) -> bool {
        self.date_1904
    }

    /// 生テキストをフォーマット
    ///
    /// # 引数
    ///
    /// * `raw` - セルの生テキスト（例: `"0.5"`, `"1.2E-3"`）
    /// * `code` - 数値書式ID（numFmtId）
    /// * `pattern` - 書式文字列
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 表示文字列。書式がない場合は生テキストそのもの
    /// * `Err(DecodeError::InvalidNumber)` - 書式があり、生テキストが数値でない場合
    pub fn format(
        &mut self,
        raw: &str,
        code: u32,
        pattern: Option<&str>,
    ) -> Result<String, DecodeError> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(raw.to_string()),
        };

        let value = parse_decimal(raw)?;

        // テキスト書式は値をそのまま表示する
        if pattern == "@" {
            return Ok(raw.to_string());
        }
        if code == 0 || pattern.eq_ignore_ascii_case("General") {
            return Ok(format_general(value));
        }

        if !self.cache.contains_key(pattern) {
            if self.cache.len() >= MAX_CACHED_PATTERNS {
                self.cache.clear();
            }
            self.cache
                .insert(pattern.to_string(), FormatParser::parse(pattern));
        }

        let date_1904 = self.date_1904;
        Ok(self
            .cache
            .get(pattern)
            .map(|parser| parser.format_number(value, date_1904))
            .unwrap_or_else(|| format_general(value)))
    }
}

/// 10進数の生テキストを数値に変換する
///
/// 指数表記（`1.5E+10`）を受け付けます。無限大とNaNは拒否します。
fn parse_decimal(raw: &str) -> Result<f64, DecodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber(raw.to_string()))
}
