//! Styles Table
//!
//! `xl/styles.xml`の`<numFmts>`と`<cellXfs>`を解析し、
//! スタイルインデックスから数値書式を引けるようにします。

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{attribute, xml_error};
use crate::error::XlsxIngestError;
use crate::format::builtin_format;
use crate::types::StyleFormat;

/// スタイルテーブル
///
/// ワークブック全体で共有され、構築後は読み取り専用です。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesTable {
    /// カスタム書式（numFmtId -> formatCode）
    custom_formats: HashMap<u32, String>,
    /// cellXfsの各要素のnumFmtId（インデックス = スタイルインデックス）
    xf_formats: Vec<u32>,
}

impl StylesTable {
    /// styles.xmlを解析する
    ///
    /// # 引数
    ///
    /// * `reader` - styles.xmlのリーダー
    /// * `part` - エラーメッセージ用のパーツ名
    ///
    /// # 戻り値
    ///
    /// * `Ok(StylesTable)` - 解析に成功した場合
    /// * `Err(XlsxIngestError::Xml)` - XMLが不正な場合
    pub fn parse<R: BufRead>(reader: R, part: &str) -> Result<Self, XlsxIngestError> {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);

        let mut table = Self::default();
        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => {
                        // <numFmt numFmtId="165" formatCode="0.000"/>
                        let id = attribute(&e, b"numFmtId", part)?;
                        let code = attribute(&e, b"formatCode", part)?;
                        if let (Some(id), Some(code)) = (id, code) {
                            table.custom_formats.insert(id.trim().parse()?, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        // <xf numFmtId="165" fontId="0" fillId="0" borderId="0" xfId="0"/>
                        let num_fmt_id = match attribute(&e, b"numFmtId", part)? {
                            Some(id) => id.trim().parse()?,
                            None => 0,
                        };
                        table.xf_formats.push(num_fmt_id);
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(part, format!("XML parse error: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    /// 書式を直接指定してテーブルを構築する
    ///
    /// # 引数
    ///
    /// * `custom_formats` - (numFmtId, formatCode) のリスト
    /// * `xf_formats` - スタイルインデックス順のnumFmtId
    pub fn from_parts<I>(custom_formats: I, xf_formats: Vec<u32>) -> Self
    where
        I: IntoIterator<Item = (u32, String)>,
    {
        Self {
            custom_formats: custom_formats.into_iter().collect(),
            xf_formats,
        }
    }

    /// スタイルインデックスから数値書式を取得する
    ///
    /// # 戻り値
    ///
    /// * `Some(StyleFormat)` - スタイルが存在する場合。書式文字列はカスタム書式、
    ///   次にビルトイン書式の順に解決され、どちらにもなければ`pattern`は`None`
    /// * `None` - スタイルインデックスが範囲外の場合
    pub fn style_at(&self, index: u32) -> Option<StyleFormat> {
        let code = *self.xf_formats.get(index as usize)?;
        let pattern = self
            .custom_formats
            .get(&code)
            .cloned()
            .or_else(|| builtin_format(code).map(str::to_string));
        Some(StyleFormat { code, pattern })
    }

    /// cellXfsの要素数
    pub fn len(&self) -> usize {
        self.xf_formats.len()
    }

    /// スタイルが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.xf_formats.is_empty()
    }
}
