//! Shared Strings Table
//!
//! `xl/sharedStrings.xml`の共有文字列プール。
//!
//! 数百万件のプールでも1件ごとのアロケーションが発生しないよう、
//! すべての文字列を1つの連続した`String`に連結し、境界をオフセット表で保持します。
//! インデックスによるアクセスはO(1)です。

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{attribute, xml_error};
use crate::error::{DecodeError, XlsxIngestError};

/// 事前確保するオフセット数の上限（`uniqueCount`が巨大な値でも過大な確保をしない）
const MAX_PREALLOCATED_ENTRIES: usize = 1 << 20;

/// 共有文字列テーブル
///
/// `offsets[i]..offsets[i + 1]`が`i`番目の文字列の範囲です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedStringTable {
    buffer: String,
    offsets: Vec<usize>,
}

impl Default for SharedStringTable {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            offsets: vec![0],
        }
    }
}

impl SharedStringTable {
    /// sharedStrings.xmlをストリーミングで解析する
    ///
    /// 各`<si>`の`<t>`要素のテキストを連結して1つの文字列にします。
    /// リッチテキストの`<r>`は連結され、ふりがな（`<rPh>`）は除外されます。
    ///
    /// # 引数
    ///
    /// * `reader` - sharedStrings.xmlのリーダー
    /// * `part` - エラーメッセージ用のパーツ名
    pub fn parse<R: BufRead>(reader: R, part: &str) -> Result<Self, XlsxIngestError> {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(false);

        let mut table = Self::default();
        let mut buf = Vec::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut phonetic_depth = 0usize;
        let mut sst_closed = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sst" => {
                        if let Some(count) = attribute(&e, b"uniqueCount", part)? {
                            let count: usize = count.trim().parse()?;
                            table.offsets.reserve(count.min(MAX_PREALLOCATED_ENTRIES));
                        }
                    }
                    b"si" => in_si = true,
                    b"rPh" if in_si => phonetic_depth += 1,
                    b"t" if in_si && phonetic_depth == 0 => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"si" => table.offsets.push(table.buffer.len()),
                    b"sst" => sst_closed = true,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e
                        .unescape()
                        .map_err(|e| xml_error(part, format!("XML text error: {}", e)))?;
                    table.buffer.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    table.buffer.push_str(std::str::from_utf8(&e)?);
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_t = false,
                    b"rPh" if phonetic_depth > 0 => phonetic_depth -= 1,
                    b"si" => {
                        in_si = false;
                        in_t = false;
                        phonetic_depth = 0;
                        table.offsets.push(table.buffer.len());
                    }
                    b"sst" => sst_closed = true,
                    _ => {}
                },
                Ok(Event::Eof) => {
                    if in_si || !sst_closed {
                        return Err(xml_error(
                            part,
                            format!(
                                "Unexpected end of shared strings after {} entries",
                                table.len()
                            ),
                        ));
                    }
                    break;
                }
                Err(e) => return Err(xml_error(part, format!("XML parse error: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        table.buffer.shrink_to_fit();
        table.offsets.shrink_to_fit();
        Ok(table)
    }

    /// 文字列のリストからテーブルを構築する
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for s in strings {
            table.buffer.push_str(s.as_ref());
            table.offsets.push(table.buffer.len());
        }
        table
    }

    /// 文字列の件数
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// プールが空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// インデックスから文字列を取得する
    pub fn get(&self, index: usize) -> Option<&str> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        self.buffer.get(start..end)
    }

    /// セルの値（共有文字列インデックス）を解決する
    ///
    /// # 戻り値
    ///
    /// * `Ok(&str)` - 文字列
    /// * `Err(DecodeError::IndexOutOfRange)` - インデックスが負、またはプールのサイズ以上の場合
    pub fn resolve(&self, index: i64) -> Result<&str, DecodeError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or(DecodeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// 保持している文字列データのバイト数
    pub fn heap_bytes(&self) -> usize {
        self.buffer.capacity() + self.offsets.capacity() * std::mem::size_of::<usize>()
    }
}
