//! Row Sink Module
//!
//! 組み立て済みの行を受け取って永続化する書き出し先。

use crate::error::SinkError;
use crate::types::AssembledRow;

/// 行の書き出し先
///
/// フィルタ済みの行が1行完成するたびに呼び出されます。
/// エラーを返した場合の扱いは`SinkErrorPolicy`で決まります。
///
/// # 使用例
///
/// ```rust
/// use xlsxingest::{AssembledRow, RowSink, SinkError};
///
/// struct LineCounter(usize);
///
/// impl RowSink for LineCounter {
///     fn accept_row(&mut self, _sheet: &str, _row: &AssembledRow) -> Result<(), SinkError> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait RowSink {
    /// 1行を受け取る
    ///
    /// # 引数
    ///
    /// * `sheet` - シート名
    /// * `row` - 選択された列の値（`row.line()`は`'7','Alice'`形式）
    fn accept_row(&mut self, sheet: &str, row: &AssembledRow) -> Result<(), SinkError>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn accept_row(&mut self, sheet: &str, row: &AssembledRow) -> Result<(), SinkError> {
        (**self).accept_row(sheet, row)
    }
}

/// メモリ上に行を蓄積する書き出し先
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    rows: Vec<(String, AssembledRow)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 受け取った行（シート名, 行）
    pub fn rows(&self) -> &[(String, AssembledRow)] {
        &self.rows
    }

    /// 指定シートの行文字列
    pub fn lines(&self, sheet: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|(name, _)| name == sheet)
            .map(|(_, row)| row.line())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSink for MemorySink {
    fn accept_row(&mut self, sheet: &str, row: &AssembledRow) -> Result<(), SinkError> {
        self.rows.push((sheet.to_string(), row.clone()));
        Ok(())
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRowSink;

#[cfg(feature = "sqlite")]
mod sqlite {
    use log::debug;
    use rusqlite::{params_from_iter, Connection};

    use super::RowSink;
    use crate::error::SinkError;
    use crate::types::AssembledRow;

    /// SQLiteのテーブルに1行ずつ挿入する書き出し先
    ///
    /// 値はすべてバインドパラメータで渡されます。テーブル名は識別子として引用されます。
    #[derive(Debug)]
    pub struct SqliteRowSink {
        conn: Connection,
        table: String,
    }

    impl SqliteRowSink {
        /// 既存のテーブルに挿入する書き出し先を生成
        pub fn new(conn: Connection, table: impl Into<String>) -> Self {
            Self {
                conn,
                table: table.into(),
            }
        }

        /// 列名を指定してテーブルを作成し、書き出し先を生成する
        ///
        /// テーブルが既に存在する場合はそのまま使用します。列の型はすべて`TEXT`です。
        ///
        /// # 引数
        ///
        /// * `conn` - SQLite接続
        /// * `table` - テーブル名
        /// * `columns` - 列名（通常は選択記述子の取り込み先の列名）
        pub fn create(
            conn: Connection,
            table: impl Into<String>,
            columns: &[String],
        ) -> Result<Self, SinkError> {
            let table = table.into();
            if columns.is_empty() {
                return Err(SinkError::Rejected(format!(
                    "table '{}' needs at least one column",
                    table
                )));
            }

            let column_defs = columns
                .iter()
                .map(|c| format!("{} TEXT", quote_identifier(c)))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_identifier(&table),
                column_defs
            );
            debug!("{}", sql);
            conn.execute(&sql, [])?;

            Ok(Self::new(conn, table))
        }

        /// SQLite接続への参照
        pub fn connection(&self) -> &Connection {
            &self.conn
        }

        /// SQLite接続を取り出す
        pub fn into_inner(self) -> Connection {
            self.conn
        }
    }

    impl RowSink for SqliteRowSink {
        fn accept_row(&mut self, _sheet: &str, row: &AssembledRow) -> Result<(), SinkError> {
            let placeholders = (1..=row.cells.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "INSERT INTO {} VALUES ({})",
                quote_identifier(&self.table),
                placeholders
            );

            let mut stmt = self.conn.prepare_cached(&sql)?;
            stmt.execute(params_from_iter(row.values()))?;
            Ok(())
        }
    }

    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecodedCell;

    #[test]
    fn test_memory_sink_collects_rows() {
        let mut sink = MemorySink::new();
        let mut row = AssembledRow::new(1);
        row.push(0, DecodedCell::plain("7"));
        row.push(1, DecodedCell::plain("Alice"));

        sink.accept_row("Data", &row).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.lines("Data"), vec!["'7','Alice'"]);
        assert!(sink.lines("Other").is_empty());
    }

    #[test]
    fn test_sink_through_mutable_reference() {
        fn feed<S: RowSink>(mut sink: S) {
            let row = AssembledRow::new(0);
            sink.accept_row("Data", &row).unwrap();
        }

        let mut sink = MemorySink::new();
        feed(&mut sink);
        assert_eq!(sink.len(), 1);
    }
}
