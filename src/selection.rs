//! Selection Module
//!
//! どのシートの、どの原点から、どの列を取り込むかを記述する選択記述子。
//!
//! 記述子は3つの並行リスト（シート名、原点行、原点列）と、取り込み先の列名リストで
//! 構成されます。シートと原点の対応は名前ではなく、処理中にシートが
//! マッチした順序で決まります（位置による対応）。

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::XlsxIngestError;
use crate::types::column_index;

/// 原点座標（JSONでは数値・文字列のどちらでも指定可能）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    /// 1始まりの番号
    Number(u32),
    /// 数字または列名（"3", "C"）
    Text(String),
}

impl From<u32> for Coordinate {
    fn from(value: u32) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

impl Coordinate {
    /// 行番号として解釈する（1始まり）
    fn as_row(&self) -> Option<u32> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
        .filter(|n| *n >= 1)
    }

    /// 列番号として解釈する（1始まり、"A" = 1）
    fn as_column(&self) -> Option<u32> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| column_index(s).and_then(|c| c.checked_add(1)))
            }
        }
        .filter(|n| *n >= 1)
    }
}

/// 選択記述子（設定の境界）
///
/// # 使用例
///
/// ```rust
/// use xlsxingest::SelectionDescriptor;
///
/// let descriptor = SelectionDescriptor::from_json(
///     r#"{"sheets":["Data"],"origin_rows":[1],"origin_columns":["A"],"columns":["id","name"]}"#,
/// ).unwrap();
/// assert_eq!(descriptor.sheets, vec!["Data"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SelectionDescriptor {
    /// 対象シート名
    pub sheets: Vec<String>,
    /// 原点行（1始まり）
    pub origin_rows: Vec<Coordinate>,
    /// 原点列（1始まりの番号、または列名）
    pub origin_columns: Vec<Coordinate>,
    /// 取り込み先の列名（ヘッダー行のセル値と照合する）
    pub columns: Vec<String>,
}

impl SelectionDescriptor {
    /// オブジェクト形式のJSONから記述子を読み込む
    pub fn from_json(json: &str) -> Result<Self, XlsxIngestError> {
        serde_json::from_str(json)
            .map_err(|e| XlsxIngestError::Config(format!("Invalid selection descriptor: {}", e)))
    }

    /// 位置配列形式のJSONから記述子を読み込む
    ///
    /// `coordinates`は`[[シート名...],[原点行...],[原点列...]]`、
    /// `columns`は`[列名...]`の形式です。
    pub fn from_legacy_arrays(coordinates: &str, columns: &str) -> Result<Self, XlsxIngestError> {
        let config_err =
            |e: serde_json::Error| XlsxIngestError::Config(format!("Invalid selection arrays: {}", e));

        let (sheets, origin_rows, origin_columns): (Vec<String>, Vec<Coordinate>, Vec<Coordinate>) =
            serde_json::from_str(coordinates).map_err(config_err)?;
        let columns: Vec<String> = serde_json::from_str(columns).map_err(config_err)?;

        Ok(Self {
            sheets,
            origin_rows,
            origin_columns,
            columns,
        })
    }

    /// 記述子を検証し、処理用の`Selection`に変換する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Selection)` - 検証に成功した場合
    /// * `Err(XlsxIngestError::Config)` - リストの長さが一致しない、
    ///   または原点座標が数値として解釈できない場合
    pub fn validate(&self) -> Result<Selection, XlsxIngestError> {
        let expected = self.sheets.len();
        for (name, len) in [
            ("origin_rows", self.origin_rows.len()),
            ("origin_columns", self.origin_columns.len()),
        ] {
            if len != expected {
                return Err(XlsxIngestError::Config(format!(
                    "{} has {} entries, expected {} (one per target sheet)",
                    name, len, expected
                )));
            }
        }

        let mut origins = Vec::with_capacity(expected);
        for (slot, (row, column)) in self.origin_rows.iter().zip(&self.origin_columns).enumerate() {
            let row = row.as_row().ok_or_else(|| {
                XlsxIngestError::Config(format!("Invalid origin row at slot {}: {:?}", slot, row))
            })?;
            let column = column.as_column().ok_or_else(|| {
                XlsxIngestError::Config(format!(
                    "Invalid origin column at slot {}: {:?}",
                    slot, column
                ))
            })?;
            origins.push(SheetOrigin::new(row, column)?);
        }

        Ok(Selection {
            targets: self.sheets.iter().cloned().collect(),
            origins,
            columns: self.columns.clone(),
        })
    }
}

/// 原点座標（1始まり）
///
/// 行・列とも1以上であることが`SheetOrigin::new`で保証されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOrigin {
    row: u32,
    column: u32,
}

impl SheetOrigin {
    /// 原点を生成
    ///
    /// # 引数
    ///
    /// * `row` - ヘッダー行の行番号（1始まり）
    /// * `column` - 取り込みを開始する列番号（1始まり）
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxIngestError::Config)` - 行または列が0の場合
    pub fn new(row: u32, column: u32) -> Result<Self, XlsxIngestError> {
        if row == 0 || column == 0 {
            return Err(XlsxIngestError::Config(format!(
                "Origin must be 1-based, got row {} column {}",
                row, column
            )));
        }
        Ok(Self { row, column })
    }

    /// ヘッダー行の行番号（1始まり）
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 取り込みを開始する列番号（1始まり）
    pub fn column(&self) -> u32 {
        self.column
    }

    /// ヘッダー行の序数（0始まり）
    pub(crate) fn header_ordinal(&self) -> u64 {
        u64::from(self.row) - 1
    }

    /// 最初に取り込む列インデックス（0始まり）
    pub(crate) fn first_column(&self) -> u32 {
        self.column - 1
    }
}

/// 検証済みの選択
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    targets: HashSet<String>,
    origins: Vec<SheetOrigin>,
    columns: Vec<String>,
}

impl Selection {
    /// シートが対象かどうか
    pub fn is_target(&self, sheet_name: &str) -> bool {
        self.targets.contains(sheet_name)
    }

    /// マッチ順のスロットに対応する原点
    pub fn origin_at(&self, slot: usize) -> Option<SheetOrigin> {
        self.origins.get(slot).copied()
    }

    /// 取り込み先の列名
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// ヘッダー行で選択された列の集合
///
/// ヘッダー行の処理中にだけ列を追加でき、ヘッダー行の終了時に凍結されます。
/// 以降のデータ行では読み取り専用です。
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnSelection {
    requested: Vec<String>,
    matched: HashSet<String>,
    order: Vec<u32>,
    members: HashSet<u32>,
    frozen: bool,
}

impl ColumnSelection {
    pub fn new(requested: &[String]) -> Self {
        Self {
            requested: requested.to_vec(),
            ..Self::default()
        }
    }

    /// ヘッダーのセル値が要求された列名に一致すれば列を選択する
    ///
    /// 各列名はヘッダー行で最初に現れた列にだけ対応します。同じ名前の
    /// 2つ目以降のヘッダーや同じ列の再選択は何もしません。
    /// 凍結後は常に`false`を返します。
    pub fn offer(&mut self, column: u32, header: &str) -> bool {
        if self.frozen
            || self.matched.contains(header)
            || self.members.contains(&column)
            || !self.requested.iter().any(|name| name == header)
        {
            return false;
        }
        self.matched.insert(header.to_string());
        self.members.insert(column);
        self.order.push(column);
        true
    }

    /// ヘッダー行の終了時に呼び出す
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn contains(&self, column: u32) -> bool {
        self.members.contains(&column)
    }

    /// 選択された列インデックス（ヘッダーでの出現順）
    pub fn columns(&self) -> &[u32] {
        &self.order
    }

    /// どのヘッダーにも一致しなかった列名
    pub fn unmatched(&self) -> Vec<&str> {
        self.requested
            .iter()
            .filter(|name| !self.matched.contains(name.as_str()))
            .map(String::as_str)
            .collect()
    }
}
