//! Sheet Walker
//!
//! シートXMLをプルパーサーで読み進め、構造イベントを`RowAssembler`に渡す。

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::assembler::RowAssembler;
use super::attribute;
use crate::error::XlsxIngestError;
use crate::sink::RowSink;

/// シートのストリーミング走査
#[derive(Debug, Clone)]
pub struct SheetWalker {
    name: String,
}

/// インライン文字列（`<is>`）の中での位置
#[derive(Debug, Default)]
struct InlineText {
    active: bool,
    in_t: bool,
    phonetic_depth: usize,
}

impl InlineText {
    fn captures(&self) -> bool {
        !self.active || (self.in_t && self.phonetic_depth == 0)
    }
}

impl SheetWalker {
    /// # 引数
    ///
    /// * `name` - シート名（エラーメッセージ用）
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// シートXMLを最後まで走査する
    ///
    /// # 引数
    ///
    /// * `reader` - シートXMLのリーダー
    /// * `assembler` - 行組み立て器
    /// * `sink` - 完成した行の書き出し先
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - シートを最後まで処理した場合
    /// * `Err(XlsxIngestError::MalformedSheet)` - 不正なXML、または途中で切れたストリーム
    /// * `Err(XlsxIngestError::Sink)` - 書き出しに失敗し、方針が`Abort`の場合
    pub fn walk<R, S>(
        &self,
        reader: R,
        assembler: &mut RowAssembler<'_>,
        sink: &mut S,
    ) -> Result<(), XlsxIngestError>
    where
        R: BufRead,
        S: RowSink + ?Sized,
    {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut in_sheet_data = false;
        let mut inline = InlineText::default();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                self.malformed(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = true,
                    _ if !in_sheet_data => {}
                    b"row" => assembler.row_open()?,
                    b"c" => self.cell_open(&e, assembler)?,
                    b"v" => assembler.value_open()?,
                    b"is" => {
                        inline = InlineText {
                            active: true,
                            ..InlineText::default()
                        };
                        assembler.value_open()?;
                    }
                    b"rPh" if inline.active => inline.phonetic_depth += 1,
                    b"t" if inline.active => inline.in_t = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    _ if !in_sheet_data => {}
                    b"row" => {
                        assembler.row_open()?;
                        assembler.row_close(sink)?;
                    }
                    b"c" => {
                        self.cell_open(&e, assembler)?;
                        assembler.cell_close()?;
                    }
                    b"v" | b"is" => {
                        assembler.value_open()?;
                        assembler.value_close()?;
                    }
                    _ => {}
                },
                Event::Text(e) if in_sheet_data && inline.captures() => {
                    let text = e
                        .unescape()
                        .map_err(|e| self.malformed(format!("XML text error: {}", e)))?;
                    assembler.characters(&text);
                }
                Event::CData(e) if in_sheet_data && inline.captures() => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| self.malformed(format!("invalid UTF-8 in CDATA: {}", e)))?;
                    assembler.characters(text);
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = false,
                    _ if !in_sheet_data => {}
                    b"row" => assembler.row_close(sink)?,
                    b"c" => assembler.cell_close()?,
                    b"v" => assembler.value_close()?,
                    b"is" => {
                        inline = InlineText::default();
                        assembler.value_close()?;
                    }
                    b"rPh" if inline.phonetic_depth > 0 => inline.phonetic_depth -= 1,
                    b"t" => inline.in_t = false,
                    _ => {}
                },
                Event::Eof => {
                    if in_sheet_data {
                        return Err(self.malformed(format!(
                            "unexpected end of stream inside sheetData at row {}",
                            assembler.ordinal()
                        )));
                    }
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        assembler.finish()
    }

    fn cell_open(
        &self,
        element: &BytesStart<'_>,
        assembler: &mut RowAssembler<'_>,
    ) -> Result<(), XlsxIngestError> {
        let reference = self.attribute(element, b"r")?;
        let cell_type = self.attribute(element, b"t")?;
        let style = self.attribute(element, b"s")?;
        assembler.cell_open(reference.as_deref(), cell_type.as_deref(), style.as_deref())
    }

    fn attribute(
        &self,
        element: &BytesStart<'_>,
        name: &[u8],
    ) -> Result<Option<String>, XlsxIngestError> {
        attribute(element, name, &self.name).map_err(|e| match e {
            XlsxIngestError::Xml { message, .. } => self.malformed(message),
            other => other,
        })
    }

    fn malformed(&self, message: impl Into<String>) -> XlsxIngestError {
        XlsxIngestError::MalformedSheet {
            sheet: self.name.clone(),
            message: message.into(),
        }
    }
}
