//! Row Assembler
//!
//! シートXMLの構造イベント（行開始、セル開始、値開始/終了、セル終了、行終了）から
//! 論理行を組み立てる状態機械。
//!
//! 状態遷移:
//!
//! ```text
//! Idle --row_open--> InRow --cell_open--> InCell --value_open--> InValue
//!   ^                 |  ^                  |  ^                    |
//!   +----row_close----+  +----cell_close----+  +-----value_close----+
//! ```
//!
//! 上記以外の遷移は`XlsxIngestError::MalformedSheet`になります。

use log::{debug, warn};

use super::decoder::CellValueDecoder;
use super::shared_strings::SharedStringTable;
use super::styles::StylesTable;
use crate::api::SinkErrorPolicy;
use crate::error::XlsxIngestError;
use crate::selection::{ColumnSelection, SheetOrigin};
use crate::sink::RowSink;
use crate::types::{AssembledRow, CellRef, CellType, StyleFormat};

/// 組み立て器の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblerState {
    /// 行の外側
    #[default]
    Idle,
    /// 行の中（セルの外側）
    InRow,
    /// セルの中（値の外側）
    InCell,
    /// 値のテキストを蓄積中
    InValue,
}

/// 処理中のセル
#[derive(Debug, Clone)]
struct PendingCell {
    /// 列インデックス（参照が不正な場合は`None`で、値は破棄される）
    column: Option<u32>,
    cell_type: CellType,
    style: Option<StyleFormat>,
}

/// シート単位の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AssemblerStats {
    pub rows_seen: u64,
    pub rows_forwarded: u64,
    pub cells_dropped: u64,
    pub sink_failures: u64,
}

/// 行組み立て器
///
/// 1シートにつき1つ生成します。行の序数は0から始まり、
/// 行終了イベントごとに（書き出しの有無にかかわらず）1ずつ増えます。
#[derive(Debug)]
pub struct RowAssembler<'a> {
    sheet: String,
    decoder: CellValueDecoder<'a>,
    styles: &'a StylesTable,
    origin: SheetOrigin,
    selection: ColumnSelection,
    sink_policy: SinkErrorPolicy,
    preview_limit: usize,

    state: AssemblerState,
    ordinal: u64,
    row: AssembledRow,
    cell: Option<PendingCell>,
    last_column: Option<u32>,
    text: String,

    preview: Vec<Vec<String>>,
    stats: AssemblerStats,
}

impl<'a> RowAssembler<'a> {
    /// 新しい組み立て器を生成
    ///
    /// # 引数
    ///
    /// * `sheet` - シート名（ログとエラーメッセージ用）
    /// * `shared_strings` - ワークブックの共有文字列テーブル
    /// * `styles` - ワークブックのスタイルテーブル
    /// * `date_1904` - 1904年エポックかどうか
    /// * `origin` - ヘッダー行と最初の列（1始まり）
    /// * `columns` - 取り込む列のヘッダー名
    pub fn new(
        sheet: impl Into<String>,
        shared_strings: &'a SharedStringTable,
        styles: &'a StylesTable,
        date_1904: bool,
        origin: SheetOrigin,
        columns: &[String],
    ) -> Self {
        Self {
            sheet: sheet.into(),
            decoder: CellValueDecoder::new(shared_strings, date_1904),
            styles,
            origin,
            selection: ColumnSelection::new(columns),
            sink_policy: SinkErrorPolicy::default(),
            preview_limit: 0,
            state: AssemblerState::Idle,
            ordinal: 0,
            row: AssembledRow::default(),
            cell: None,
            last_column: None,
            text: String::new(),
            preview: Vec::new(),
            stats: AssemblerStats::default(),
        }
    }

    /// 書き出し失敗時の処理方針を設定
    pub fn with_sink_policy(mut self, policy: SinkErrorPolicy) -> Self {
        self.sink_policy = policy;
        self
    }

    /// プレビューに保持する行数を設定
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// 次に開く行の序数（これまでに閉じた行の数）
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// ヘッダー行で選択された列インデックス（出現順）
    pub fn selected_columns(&self) -> &[u32] {
        self.selection.columns()
    }

    /// 書き出した先頭の行の値（引用符なし）
    pub fn preview(&self) -> &[Vec<String>] {
        &self.preview
    }

    pub(crate) fn stats(&self) -> AssemblerStats {
        self.stats
    }

    /// 行開始
    pub fn row_open(&mut self) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::Idle, "row start")?;
        self.row = AssembledRow::new(self.ordinal);
        self.last_column = None;
        self.state = AssemblerState::InRow;
        Ok(())
    }

    /// セル開始
    ///
    /// # 引数
    ///
    /// * `reference` - `r`属性（例: "C7"）。省略時は直前のセルの次の列
    /// * `type_attr` - `t`属性
    /// * `style_attr` - `s`属性。型属性が明示されている場合は参照しない
    pub fn cell_open(
        &mut self,
        reference: Option<&str>,
        type_attr: Option<&str>,
        style_attr: Option<&str>,
    ) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::InRow, "cell start")?;

        let column = match reference {
            Some(reference) => match CellRef::parse(reference) {
                Ok(cell_ref) => Some(cell_ref.column),
                Err(e) => {
                    warn!(
                        "Dropping cell in sheet '{}' row {}: {}",
                        self.sheet, self.ordinal, e
                    );
                    self.stats.cells_dropped += 1;
                    None
                }
            },
            None => Some(self.last_column.map_or(0, |c| c.saturating_add(1))),
        };
        if column.is_some() {
            self.last_column = column;
        }

        let style = if CellType::is_explicit(type_attr) {
            None
        } else {
            style_attr.and_then(|s| self.resolve_style(s))
        };

        self.cell = Some(PendingCell {
            column,
            cell_type: CellType::from_attr(type_attr),
            style,
        });
        self.state = AssemblerState::InCell;
        Ok(())
    }

    /// 値（`<v>`または`<is>`）開始
    pub fn value_open(&mut self) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::InCell, "value start")?;
        self.text.clear();
        self.state = AssemblerState::InValue;
        Ok(())
    }

    /// テキスト。値の蓄積中以外は無視される
    pub fn characters(&mut self, text: &str) {
        if self.state == AssemblerState::InValue {
            self.text.push_str(text);
        }
    }

    /// 値終了
    ///
    /// 値をデコードし、ヘッダー行であれば列の選択を、データ行であれば
    /// 選択された列の値の追加を行います。
    pub fn value_close(&mut self) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::InValue, "value end")?;
        self.state = AssemblerState::InCell;

        let Some(cell) = self.cell.as_ref() else {
            return Err(self.malformed("value end without a cell"));
        };
        let Some(column) = cell.column else {
            return Ok(());
        };

        let decoded = match self
            .decoder
            .decode(cell.cell_type, cell.style.as_ref(), &self.text)
        {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(
                    "Dropping cell in sheet '{}' row {} column {}: {}",
                    self.sheet, self.ordinal, column, e
                );
                self.stats.cells_dropped += 1;
                return Ok(());
            }
        };

        let header_ordinal = self.origin.header_ordinal();
        if column < self.origin.first_column() {
            return Ok(());
        }

        if self.ordinal == header_ordinal {
            if self.selection.offer(column, &decoded.value) {
                debug!(
                    "Sheet '{}': header '{}' selects column {}",
                    self.sheet, decoded.value, column
                );
            }
        } else if self.ordinal > header_ordinal && self.selection.contains(column) {
            self.row.push(column, decoded);
        }

        Ok(())
    }

    /// セル終了
    pub fn cell_close(&mut self) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::InCell, "cell end")?;
        self.cell = None;
        self.state = AssemblerState::InRow;
        Ok(())
    }

    /// 行終了
    ///
    /// 値が1つ以上ある行を書き出し先に渡します。行の序数は常に1増えます。
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxIngestError::Sink)` - 書き出しに失敗し、方針が`Abort`の場合
    pub fn row_close<S: RowSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), XlsxIngestError> {
        self.require_state(AssemblerState::InRow, "row end")?;

        if self.ordinal == self.origin.header_ordinal() {
            self.resolve_header();
        }

        let row = std::mem::take(&mut self.row);
        let mut result = Ok(());
        if !row.is_empty() {
            match sink.accept_row(&self.sheet, &row) {
                Ok(()) => {
                    self.stats.rows_forwarded += 1;
                    if self.preview.len() < self.preview_limit {
                        self.preview
                            .push(row.cells.iter().map(|(_, c)| c.value.clone()).collect());
                    }
                }
                Err(e) => {
                    self.stats.sink_failures += 1;
                    warn!(
                        "Row sink failed for sheet '{}' row {}: {}",
                        self.sheet, row.ordinal, e
                    );
                    if self.sink_policy == SinkErrorPolicy::Abort {
                        result = Err(XlsxIngestError::Sink {
                            sheet: self.sheet.clone(),
                            row: row.ordinal,
                            source: e,
                        });
                    }
                }
            }
        }

        self.ordinal += 1;
        self.stats.rows_seen += 1;
        self.last_column = None;
        self.text.clear();
        self.state = AssemblerState::Idle;
        result
    }

    /// シートの終了
    ///
    /// 行の途中でストリームが終わった場合は構造エラーです。
    pub fn finish(&mut self) -> Result<(), XlsxIngestError> {
        if self.state != AssemblerState::Idle {
            return Err(self.malformed(format!(
                "stream ended in state {:?} at row {}",
                self.state, self.ordinal
            )));
        }
        if !self.selection.is_frozen() {
            warn!(
                "Sheet '{}' ended after {} rows, before header row {}",
                self.sheet, self.ordinal, self.origin.row()
            );
        }
        Ok(())
    }

    fn resolve_header(&mut self) {
        self.selection.freeze();
        let unmatched = self.selection.unmatched();
        if !unmatched.is_empty() {
            warn!(
                "Sheet '{}': no header matches columns {:?}",
                self.sheet, unmatched
            );
        }
        debug!(
            "Sheet '{}': selected columns {:?}",
            self.sheet,
            self.selection.columns()
        );
    }

    fn resolve_style(&self, style_attr: &str) -> Option<StyleFormat> {
        match style_attr.trim().parse::<u32>() {
            Ok(index) => self.styles.style_at(index),
            Err(_) => {
                debug!(
                    "Sheet '{}': ignoring style index '{}'",
                    self.sheet, style_attr
                );
                None
            }
        }
    }

    fn require_state(&self, expected: AssemblerState, event: &str) -> Result<(), XlsxIngestError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "unexpected {} in state {:?} at row {}",
                event, self.state, self.ordinal
            )))
        }
    }

    fn malformed(&self, message: impl Into<String>) -> XlsxIngestError {
        XlsxIngestError::MalformedSheet {
            sheet: self.sheet.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::sink::MemorySink;

    struct RejectingSink;

    impl RowSink for RejectingSink {
        fn accept_row(&mut self, _sheet: &str, _row: &AssembledRow) -> Result<(), SinkError> {
            Err(SinkError::Rejected("read-only".to_string()))
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn origin(row: u32, column: u32) -> SheetOrigin {
        SheetOrigin::new(row, column).unwrap()
    }

    fn push_row<S: RowSink>(assembler: &mut RowAssembler<'_>, sink: &mut S, cells: &[(&str, &str)]) {
        assembler.row_open().unwrap();
        for (reference, value) in cells {
            assembler.cell_open(Some(reference), Some("str"), None).unwrap();
            assembler.value_open().unwrap();
            assembler.characters(value);
            assembler.value_close().unwrap();
            assembler.cell_close().unwrap();
        }
        assembler.row_close(sink).unwrap();
    }

    #[test]
    fn test_header_then_data() {
        let strings = SharedStringTable::from_strings(["id", "name", "skip", "Alice"]);
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["id", "name"]),
        );
        let mut sink = MemorySink::new();

        assembler.row_open().unwrap();
        for (reference, index) in [("A1", "0"), ("B1", "1"), ("C1", "2")] {
            assembler.cell_open(Some(reference), Some("s"), None).unwrap();
            assembler.value_open().unwrap();
            assembler.characters(index);
            assembler.value_close().unwrap();
            assembler.cell_close().unwrap();
        }
        assembler.row_close(&mut sink).unwrap();

        assembler.row_open().unwrap();
        assembler.cell_open(Some("A2"), None, None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("7");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(Some("B2"), Some("s"), None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("3");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(Some("C2"), None, None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("99");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.row_close(&mut sink).unwrap();

        assembler.finish().unwrap();
        assert_eq!(sink.lines("Data"), vec!["'7','Alice'"]);
        assert_eq!(assembler.selected_columns(), &[0, 1]);
        assert_eq!(assembler.preview(), &[vec!["7".to_string(), "Alice".to_string()]]);
        assert_eq!(assembler.stats().rows_seen, 2);
        assert_eq!(assembler.stats().rows_forwarded, 1);
    }

    #[test]
    fn test_selected_order_follows_header() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["name", "id"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "id"), ("B1", "name")]);
        push_row(&mut assembler, &mut sink, &[("A2", "7"), ("B2", "Alice")]);

        assert_eq!(assembler.selected_columns(), &[0, 1]);
        assert_eq!(sink.lines("Data"), vec!["'\"7\"','\"Alice\"'"]);
    }

    #[test]
    fn test_repeated_header_name_keeps_first_column() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["id", "name"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "id"), ("B1", "name"), ("C1", "id")]);
        push_row(&mut assembler, &mut sink, &[("A2", "1"), ("B2", "2"), ("C2", "3")]);

        assert_eq!(assembler.selected_columns(), &[0, 1]);
        assert_eq!(sink.lines("Data"), vec!["'\"1\"','\"2\"'"]);
        assert_eq!(sink.rows()[0].1.values().len(), 2);
    }

    #[test]
    fn test_origin_offsets_header_and_columns() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(3, 2),
            &columns(&["id", "name"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "title")]);
        // 空行でも序数は進む
        assembler.row_open().unwrap();
        assembler.row_close(&mut sink).unwrap();
        // 列Aは原点の左側なのでヘッダーとして扱わない
        push_row(&mut assembler, &mut sink, &[("A3", "id"), ("B3", "id"), ("C3", "name")]);
        push_row(&mut assembler, &mut sink, &[("A4", "x"), ("B4", "1"), ("C4", "Bob")]);

        assert_eq!(assembler.selected_columns(), &[1, 2]);
        assert_eq!(sink.lines("Data"), vec!["'\"1\"','\"Bob\"'"]);
        assert_eq!(assembler.ordinal(), 4);
    }

    #[test]
    fn test_header_is_frozen_after_header_row() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["id"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "other")]);
        push_row(&mut assembler, &mut sink, &[("A2", "id"), ("B2", "id")]);

        assert!(assembler.selected_columns().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_reference_continues_after_last_column() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["c", "d"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("C1", "c"), ("D1", "d")]);

        assembler.row_open().unwrap();
        assembler.cell_open(Some("C2"), None, None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("3");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(None, None, None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("4");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.row_close(&mut sink).unwrap();

        assert_eq!(sink.lines("Data"), vec!["'3','4'"]);
    }

    #[test]
    fn test_decode_failure_drops_only_the_cell() {
        let strings = SharedStringTable::from_strings(["id", "name"]);
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["id", "name"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "id"), ("B1", "name")]);

        assembler.row_open().unwrap();
        assembler.cell_open(Some("A2"), Some("s"), None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("42");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(Some("??"), None, None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("1");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(Some("B2"), Some("b"), None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("0");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.row_close(&mut sink).unwrap();

        assert_eq!(sink.lines("Data"), vec!["'FALSE'"]);
        assert_eq!(assembler.stats().cells_dropped, 2);
    }

    #[test]
    fn test_style_applies_only_without_explicit_type() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::from_parts(Vec::new(), vec![0, 9]);
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["a", "b"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "a"), ("B1", "b")]);

        assembler.row_open().unwrap();
        assembler.cell_open(Some("A2"), None, Some("1")).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("0.5");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.cell_open(Some("B2"), Some("str"), Some("1")).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("0.5");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        assembler.row_close(&mut sink).unwrap();

        assert_eq!(sink.lines("Data"), vec!["'50%','\"0.5\"'"]);
    }

    #[test]
    fn test_characters_outside_value_are_ignored() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["a"]),
        );
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "a")]);
        assembler.row_open().unwrap();
        assembler.characters("\n  ");
        assembler.cell_open(Some("A2"), None, None).unwrap();
        assembler.characters("SUM(B1:B9)");
        assembler.value_open().unwrap();
        assembler.characters("12");
        assembler.value_close().unwrap();
        assembler.characters(" ");
        assembler.cell_close().unwrap();
        assembler.row_close(&mut sink).unwrap();

        assert_eq!(sink.lines("Data"), vec!["'12'"]);
    }

    #[test]
    fn test_illegal_transitions() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler =
            RowAssembler::new("Data", &strings, &styles, false, origin(1, 1), &[]);
        let mut sink = MemorySink::new();

        assert!(matches!(
            assembler.cell_open(Some("A1"), None, None),
            Err(XlsxIngestError::MalformedSheet { .. })
        ));
        assembler.row_open().unwrap();
        assert!(assembler.row_open().is_err());
        assert!(assembler.value_open().is_err());
        assert!(matches!(
            assembler.finish(),
            Err(XlsxIngestError::MalformedSheet { .. })
        ));
        assembler.row_close(&mut sink).unwrap();
        assert_eq!(assembler.state(), AssemblerState::Idle);
        assembler.finish().unwrap();
    }

    #[test]
    fn test_sink_failure_policies() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let names = columns(&["a"]);

        let mut assembler =
            RowAssembler::new("Data", &strings, &styles, false, origin(1, 1), &names);
        let mut sink = RejectingSink;
        push_row(&mut assembler, &mut sink, &[("A1", "a")]);
        push_row(&mut assembler, &mut sink, &[("A2", "x")]);
        push_row(&mut assembler, &mut sink, &[("A3", "y")]);
        assert_eq!(assembler.stats().sink_failures, 2);
        assert_eq!(assembler.ordinal(), 3);

        let mut assembler =
            RowAssembler::new("Data", &strings, &styles, false, origin(1, 1), &names)
                .with_sink_policy(SinkErrorPolicy::Abort);
        push_row(&mut assembler, &mut sink, &[("A1", "a")]);
        assembler.row_open().unwrap();
        assembler.cell_open(Some("A2"), Some("str"), None).unwrap();
        assembler.value_open().unwrap();
        assembler.characters("x");
        assembler.value_close().unwrap();
        assembler.cell_close().unwrap();
        let err = assembler.row_close(&mut sink).unwrap_err();
        assert!(matches!(err, XlsxIngestError::Sink { row: 1, .. }));
    }

    #[test]
    fn test_preview_limit() {
        let strings = SharedStringTable::default();
        let styles = StylesTable::default();
        let mut assembler = RowAssembler::new(
            "Data",
            &strings,
            &styles,
            false,
            origin(1, 1),
            &columns(&["a"]),
        )
        .with_preview_limit(2);
        let mut sink = MemorySink::new();

        push_row(&mut assembler, &mut sink, &[("A1", "a")]);
        for (reference, value) in [("A2", "1"), ("A3", "2"), ("A4", "3")] {
            push_row(&mut assembler, &mut sink, &[(reference, value)]);
        }

        assert_eq!(sink.len(), 3);
        assert_eq!(assembler.preview().len(), 2);
        assert_eq!(assembler.preview()[1], vec!["2".to_string()]);
    }
}
