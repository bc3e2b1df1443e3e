//! Parser Module
//!
//! XLSXコンテナとシートXMLのストリーミング解析。
//! シートは`quick-xml`のプルパーサーで1イベントずつ読み進め、
//! シート全体をメモリに展開しません。

mod assembler;
mod decoder;
mod package;
mod shared_strings;
mod styles;
mod walker;

pub use assembler::{AssemblerState, RowAssembler};
pub use decoder::CellValueDecoder;
pub use package::{SheetEntry, XlsxPackage};
pub use shared_strings::SharedStringTable;
pub use styles::StylesTable;
pub use walker::SheetWalker;

use quick_xml::events::BytesStart;

use crate::error::XlsxIngestError;

/// 要素の属性値を取得する（名前空間接頭辞は無視）
///
/// # 引数
///
/// * `element` - 開始タグ
/// * `name` - 属性のローカル名（例: `b"id"`は`r:id`にも一致する）
/// * `part` - エラーメッセージ用のパーツ名
pub(crate) fn attribute(
    element: &BytesStart<'_>,
    name: &[u8],
    part: &str,
) -> Result<Option<String>, XlsxIngestError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(part, format!("XML attribute error: {}", e)))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| xml_error(part, format!("XML attribute error: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// ワークブック単位のパーツの解析エラーを生成する
pub(crate) fn xml_error(part: &str, message: impl Into<String>) -> XlsxIngestError {
    XlsxIngestError::Xml {
        part: part.to_string(),
        message: message.into(),
    }
}
