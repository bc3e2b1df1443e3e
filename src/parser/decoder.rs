//! Cell Value Decoder
//!
//! セルの型・スタイル・生テキストから最終的な表示文字列を生成します。

use log::warn;

use super::shared_strings::SharedStringTable;
use crate::error::DecodeError;
use crate::formatter::NumberFormatter;
use crate::types::{CellType, DecodedCell, StyleFormat};

/// セル値デコーダー
///
/// 共有文字列テーブルを借用し、数値書式のキャッシュを保持します。
#[derive(Debug)]
pub struct CellValueDecoder<'a> {
    shared_strings: &'a SharedStringTable,
    formatter: NumberFormatter,
}

impl<'a> CellValueDecoder<'a> {
    /// 新しいデコーダーを生成
    ///
    /// # 引数
    ///
    /// * `shared_strings` - ワークブックの共有文字列テーブル
    /// * `date_1904` - 日付のシリアル値を1904年エポックで解釈するかどうか
    pub fn new(shared_strings: &'a SharedStringTable, date_1904: bool) -> Self {
        Self {
            shared_strings,
            formatter: NumberFormatter::new(date_1904),
        }
    }

    /// セル値をデコード
    ///
    /// # 引数
    ///
    /// * `cell_type` - セルの型
    /// * `style` - 解決済みの数値書式（型属性のない数値セルのみ）
    /// * `raw` - `<v>`または`<is>`から蓄積した生テキスト
    ///
    /// # 戻り値
    ///
    /// * `Ok(DecodedCell)` - デコード済みの値
    /// * `Err(DecodeError)` - 共有文字列インデックスが不正、または範囲外の場合。
    ///   呼び出し側はセルを破棄してストリーミングを継続します
    ///
    /// 数値の書式適用に失敗した場合はエラーにせず、警告を記録して生テキストを返します。
    pub fn decode(
        &mut self,
        cell_type: CellType,
        style: Option<&StyleFormat>,
        raw: &str,
    ) -> Result<DecodedCell, DecodeError> {
        match cell_type {
            CellType::Boolean => {
                let value = if raw.starts_with('0') { "FALSE" } else { "TRUE" };
                Ok(DecodedCell::plain(value))
            }
            CellType::Error => Ok(DecodedCell::quoted(format!("ERROR:{}", raw))),
            CellType::FormulaString | CellType::InlineString => Ok(DecodedCell::quoted(raw)),
            CellType::SharedStringIndex => {
                let index = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| DecodeError::InvalidSharedStringIndex(raw.to_string()))?;
                self.shared_strings
                    .resolve(index)
                    .map(DecodedCell::plain)
            }
            CellType::Number => match style {
                Some(format) => {
                    let formatted = self
                        .formatter
                        .format(raw, format.code, format.pattern.as_deref())
                        .unwrap_or_else(|e| {
                            warn!("Keeping raw cell text, number format {} failed: {}", format.code, e);
                            raw.to_string()
                        });
                    Ok(DecodedCell::plain(formatted))
                }
                None => Ok(DecodedCell::plain(raw)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(code: u32, pattern: &str) -> StyleFormat {
        StyleFormat {
            code,
            pattern: Some(pattern.to_string()),
        }
    }

    #[test]
    fn test_decode_boolean() {
        let table = SharedStringTable::default();
        let mut decoder = CellValueDecoder::new(&table, false);
        assert_eq!(
            decoder.decode(CellType::Boolean, None, "0").unwrap(),
            DecodedCell::plain("FALSE")
        );
        assert_eq!(
            decoder.decode(CellType::Boolean, None, "1").unwrap(),
            DecodedCell::plain("TRUE")
        );
        assert_eq!(
            decoder.decode(CellType::Boolean, None, "").unwrap(),
            DecodedCell::plain("TRUE")
        );
    }

    #[test]
    fn test_decode_error_and_formula() {
        let table = SharedStringTable::default();
        let mut decoder = CellValueDecoder::new(&table, false);

        let cell = decoder.decode(CellType::Error, None, "#DIV/0!").unwrap();
        assert_eq!(cell, DecodedCell::quoted("ERROR:#DIV/0!"));
        assert_eq!(cell.rendered(), "\"ERROR:#DIV/0!\"");

        let cell = decoder.decode(CellType::FormulaString, None, "abc").unwrap();
        assert_eq!(cell.rendered(), "\"abc\"");

        let cell = decoder.decode(CellType::InlineString, None, "inline").unwrap();
        assert_eq!(cell.rendered(), "\"inline\"");
    }

    #[test]
    fn test_decode_shared_string() {
        let table = SharedStringTable::from_strings(["id", "name"]);
        let mut decoder = CellValueDecoder::new(&table, false);

        assert_eq!(
            decoder.decode(CellType::SharedStringIndex, None, "1").unwrap(),
            DecodedCell::plain("name")
        );
        assert_eq!(
            decoder.decode(CellType::SharedStringIndex, None, "2"),
            Err(DecodeError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            decoder.decode(CellType::SharedStringIndex, None, "x"),
            Err(DecodeError::InvalidSharedStringIndex("x".to_string()))
        );
    }

    #[test]
    fn test_decode_number() {
        let table = SharedStringTable::default();
        let mut decoder = CellValueDecoder::new(&table, false);

        assert_eq!(
            decoder.decode(CellType::Number, None, "1.50").unwrap(),
            DecodedCell::plain("1.50")
        );
        assert_eq!(
            decoder
                .decode(CellType::Number, Some(&style(9, "0%")), "0.5")
                .unwrap(),
            DecodedCell::plain("50%")
        );
        assert_eq!(
            decoder
                .decode(CellType::Number, Some(&style(14, "yyyy-mm-dd")), "4.5E+4")
                .unwrap(),
            DecodedCell::plain("2023-03-15")
        );
    }

    #[test]
    fn test_decode_number_format_failure_keeps_raw() {
        let table = SharedStringTable::default();
        let mut decoder = CellValueDecoder::new(&table, false);
        assert_eq!(
            decoder
                .decode(CellType::Number, Some(&style(2, "0.00")), "n/a")
                .unwrap(),
            DecodedCell::plain("n/a")
        );
    }

    #[test]
    fn test_decode_number_without_pattern() {
        let table = SharedStringTable::default();
        let mut decoder = CellValueDecoder::new(&table, false);
        let unknown = StyleFormat {
            code: 200,
            pattern: None,
        };
        assert_eq!(
            decoder
                .decode(CellType::Number, Some(&unknown), "12.5")
                .unwrap(),
            DecodedCell::plain("12.5")
        );
    }
}
