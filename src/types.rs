//! Core Data Types
//!
//! ストリーミングデコーダで使用するデータ型を定義するモジュール。

use serde::Serialize;

use crate::error::DecodeError;

/// セルの型（`<c t="...">`属性）
///
/// 属性が省略された場合は`Number`になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    /// `t="b"`
    Boolean,
    /// `t="e"`
    Error,
    /// `t="str"`（数式の文字列結果）
    FormulaString,
    /// `t="inlineStr"`
    InlineString,
    /// `t="s"`
    SharedStringIndex,
    /// 属性なし、または`t="n"`
    #[default]
    Number,
}

impl CellType {
    /// 型属性の値から`CellType`を決定する
    ///
    /// 未知の値は`Number`として扱います。
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("b") => CellType::Boolean,
            Some("e") => CellType::Error,
            Some("str") => CellType::FormulaString,
            Some("inlineStr") => CellType::InlineString,
            Some("s") => CellType::SharedStringIndex,
            _ => CellType::Number,
        }
    }

    /// 型属性が明示されていたかどうか
    pub(crate) fn is_explicit(value: Option<&str>) -> bool {
        matches!(value, Some("b" | "e" | "str" | "inlineStr" | "s"))
    }
}

/// セル参照（例: "C7"）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// 列インデックス（0始まり、A=0）
    pub column: u32,
    /// 行番号（1始まり）
    pub row: u32,
}

impl CellRef {
    /// "C7"形式の参照を列インデックスと行番号に分解する
    ///
    /// `$`による絶対参照記号は無視します。
    pub fn parse(reference: &str) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidCellRef(reference.to_string());
        let trimmed = reference.replace('$', "");
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);

        let column = column_index(letters).ok_or_else(invalid)?;
        let row = digits.parse::<u32>().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { column, row })
    }
}

/// 列名（例: "AA"）を0始まりの列インデックスに変換する
///
/// アルファベット部分を26進数として扱います（A=0, Z=25, AA=26, ...）。
/// 小文字も受け付けます。空文字列やアルファベット以外を含む場合、
/// または`u32`に収まらない場合は`None`を返します。
pub fn column_index(name: &str) -> Option<u32> {
    if name.is_empty() {
        return None;
    }

    let mut column: u64 = 0;
    for ch in name.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = u64::from(ch.to_ascii_uppercase() as u8 - b'A') + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
        if column > u64::from(u32::MAX) {
            return None;
        }
    }

    u32::try_from(column - 1).ok()
}

/// スタイルから解決された数値書式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleFormat {
    /// 数値書式ID（numFmtId）
    pub code: u32,
    /// 書式文字列（ビルトインIDで未定義の場合は`None`）
    pub pattern: Option<String>,
}

/// デコード済みのセル値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCell {
    /// 引用符を含まない値
    pub value: String,
    /// 表示時にダブルクォートで囲むかどうか（エラー、数式、インライン文字列）
    pub quoted: bool,
}

impl DecodedCell {
    /// 引用符なしの値
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// ダブルクォートで囲んで表示する値
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    /// 表示用の文字列（必要に応じてダブルクォート付き）
    pub fn rendered(&self) -> String {
        if self.quoted {
            format!("\"{}\"", self.value)
        } else {
            self.value.clone()
        }
    }
}

/// 組み立て済みの論理行
///
/// 選択された列の値だけを、ドキュメント順（左から右）に保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledRow {
    /// 行の序数（シート内で0始まり）
    pub ordinal: u64,
    /// (列インデックス, デコード済みの値)
    pub cells: Vec<(u32, DecodedCell)>,
    /// カンマ区切り・シングルクォート囲みの行（例: `'7','Alice'`）
    line: String,
}

impl AssembledRow {
    pub(crate) fn new(ordinal: u64) -> Self {
        Self {
            ordinal,
            cells: Vec::new(),
            line: String::new(),
        }
    }

    /// 値を末尾に追加する
    ///
    /// 値の中のシングルクォートは二重化されます。
    pub(crate) fn push(&mut self, column: u32, cell: DecodedCell) {
        if !self.line.is_empty() {
            self.line.push(',');
        }
        self.line.push('\'');
        self.line.push_str(&cell.rendered().replace('\'', "''"));
        self.line.push('\'');
        self.cells.push((column, cell));
    }

    /// 値が1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 区切り済みの行文字列
    pub fn line(&self) -> &str {
        &self.line
    }

    /// 表示用の値（引用符を含む）を列順に返す
    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(|(_, cell)| cell.rendered()).collect()
    }
}

/// シート単位の処理結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    /// シート名
    pub name: String,
    /// コンテナ内での順序（0始まり）
    pub index: usize,
    /// 選択記述子で対象になったかどうか
    pub selected: bool,
    /// 原点（行, 列）（1始まり、選択されたシートのみ）
    pub origin: Option<(u32, u32)>,
    /// ヘッダー行で解決された列インデックス（出現順）
    pub selected_columns: Vec<u32>,
    /// 行終了イベントの数
    pub rows_seen: u64,
    /// 書き出し先に渡した行の数
    pub rows_forwarded: u64,
    /// デコードエラーで破棄したセルの数
    pub cells_dropped: u64,
    /// 書き出しに失敗した行の数
    pub sink_failures: u64,
    /// 構造エラーで中断した場合のメッセージ
    pub error: Option<String>,
}

/// ワークブック処理全体の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    /// シートごとのプレビュー（JSON配列文字列、コンテナ順）
    pub previews: Vec<String>,
    /// シート名（コンテナ順）
    pub sheet_names: Vec<String>,
    /// シート数
    pub sheet_count: usize,
    /// シートごとの処理結果
    pub reports: Vec<SheetReport>,
}
