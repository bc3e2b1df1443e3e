//! Workbook Package
//!
//! XLSXコンテナ（ZIPアーカイブ）を開き、シートの一覧と各パーツへのストリームを提供する。

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

use super::shared_strings::SharedStringTable;
use super::styles::StylesTable;
use super::{attribute, xml_error};
use crate::error::XlsxIngestError;
use crate::security::SecurityConfig;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_STYLES_PART: &str = "xl/styles.xml";
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// ワークブック内のシート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// 表示名
    pub name: String,
    /// アーカイブ内のパス（例: `xl/worksheets/sheet1.xml`）
    pub path: String,
}

/// workbook.xml.relsの内容
#[derive(Debug, Default)]
struct Relationships {
    targets: HashMap<String, String>,
    styles: Option<String>,
    shared_strings: Option<String>,
}

/// XLSXパッケージ
///
/// 開いた時点でセキュリティ検査とworkbook.xmlの解析を行います。
/// シートの内容は`open_part`で1エントリずつストリームとして読み出します。
#[derive(Debug)]
pub struct XlsxPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    date_1904: bool,
    styles_path: String,
    shared_strings_path: String,
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// パッケージを開く
    ///
    /// # 引数
    ///
    /// * `reader` - XLSXファイルのリーダー
    /// * `security` - セキュリティ制限
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxIngestError::SecurityViolation)` - エントリがセキュリティ制限に違反した場合
    /// * `Err(XlsxIngestError::MissingPart)` - workbook.xmlが存在しない場合
    pub fn open(reader: R, security: &SecurityConfig) -> Result<Self, XlsxIngestError> {
        let mut archive = ZipArchive::new(reader).map_err(zip_error)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i).map_err(zip_error)?;
            entries.push((file.name().to_string(), file.size()));
        }
        security.check_entries(entries.iter().map(|(name, size)| (name.as_str(), *size)))?;

        let mut package = Self {
            archive,
            sheets: Vec::new(),
            date_1904: false,
            styles_path: DEFAULT_STYLES_PART.to_string(),
            shared_strings_path: DEFAULT_SHARED_STRINGS_PART.to_string(),
        };

        let relationships = package.read_relationships()?;
        let (declared, date_1904) = package.read_workbook()?;

        package.date_1904 = date_1904;
        package.sheets = declared
            .into_iter()
            .enumerate()
            .map(|(i, (name, rel_id))| {
                let path = rel_id
                    .and_then(|id| relationships.targets.get(&id).cloned())
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", i + 1));
                SheetEntry { name, path }
            })
            .collect();
        if let Some(path) = relationships.styles {
            package.styles_path = path;
        }
        if let Some(path) = relationships.shared_strings {
            package.shared_strings_path = path;
        }

        debug!(
            "Opened workbook with {} sheets (date1904: {})",
            package.sheets.len(),
            package.date_1904
        );
        Ok(package)
    }

    /// シートの一覧（コンテナ順）
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    /// 日付が1904年エポックかどうか
    pub fn date_1904(&self) -> bool {
        self.date_1904
    }

    /// アーカイブ内のパーツをストリームとして開く
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxIngestError::MissingPart)` - パーツが存在しない場合
    pub fn open_part(&mut self, path: &str) -> Result<BufReader<ZipFile<'_>>, XlsxIngestError> {
        match self.archive.by_name(path) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(ZipError::FileNotFound) => Err(XlsxIngestError::MissingPart(path.to_string())),
            Err(e) => Err(zip_error(e)),
        }
    }

    /// スタイルテーブルを読み込む（パーツがなければ空）
    pub fn load_styles(&mut self) -> Result<StylesTable, XlsxIngestError> {
        let path = self.styles_path.clone();
        match self.open_part(&path) {
            Ok(reader) => StylesTable::parse(reader, &path),
            Err(XlsxIngestError::MissingPart(_)) => Ok(StylesTable::default()),
            Err(e) => Err(e),
        }
    }

    /// 共有文字列テーブルを読み込む（パーツがなければ空）
    pub fn load_shared_strings(&mut self) -> Result<SharedStringTable, XlsxIngestError> {
        let path = self.shared_strings_path.clone();
        match self.open_part(&path) {
            Ok(reader) => SharedStringTable::parse(reader, &path),
            Err(XlsxIngestError::MissingPart(_)) => Ok(SharedStringTable::default()),
            Err(e) => Err(e),
        }
    }

    fn read_relationships(&mut self) -> Result<Relationships, XlsxIngestError> {
        let reader = match self.open_part(WORKBOOK_RELS_PART) {
            Ok(reader) => reader,
            Err(XlsxIngestError::MissingPart(_)) => return Ok(Relationships::default()),
            Err(e) => return Err(e),
        };

        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);
        let mut relationships = Relationships::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attribute(&e, b"Id", WORKBOOK_RELS_PART)?;
                    let target = attribute(&e, b"Target", WORKBOOK_RELS_PART)?;
                    let kind = attribute(&e, b"Type", WORKBOOK_RELS_PART)?.unwrap_or_default();
                    if let (Some(id), Some(target)) = (id, target) {
                        let target = resolve_target(&target);
                        if kind.ends_with("/styles") {
                            relationships.styles = Some(target.clone());
                        } else if kind.ends_with("/sharedStrings") {
                            relationships.shared_strings = Some(target.clone());
                        }
                        relationships.targets.insert(id, target);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(xml_error(
                        WORKBOOK_RELS_PART,
                        format!("XML parse error: {}", e),
                    ))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(relationships)
    }

    /// workbook.xmlから (シート名, r:id) の一覧とdate1904フラグを読む
    fn read_workbook(&mut self) -> Result<(Vec<(String, Option<String>)>, bool), XlsxIngestError> {
        let reader = self.open_part(WORKBOOK_PART)?;
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);

        let mut sheets = Vec::new();
        let mut date_1904 = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"workbookPr" => {
                        if let Some(flag) = attribute(&e, b"date1904", WORKBOOK_PART)? {
                            date_1904 = matches!(flag.trim(), "1" | "true");
                        }
                    }
                    b"sheet" => {
                        // <sheet name="Data" sheetId="1" r:id="rId1"/>
                        let name = attribute(&e, b"name", WORKBOOK_PART)?.ok_or_else(|| {
                            xml_error(WORKBOOK_PART, "sheet element without a name")
                        })?;
                        let rel_id = attribute(&e, b"id", WORKBOOK_PART)?;
                        sheets.push((name, rel_id));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(WORKBOOK_PART, format!("XML parse error: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_1904))
    }
}

/// リレーションシップのターゲットをアーカイブ内のパスに変換する
///
/// `/xl/worksheets/sheet1.xml`のような絶対パスは先頭の`/`を除き、
/// `worksheets/sheet1.xml`のような相対パスは`xl/`からの相対として扱います。
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = vec!["xl"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn zip_error(e: ZipError) -> XlsxIngestError {
    match e {
        ZipError::Io(e) => XlsxIngestError::Io(e),
        other => XlsxIngestError::Zip(other.to_string()),
    }
}
