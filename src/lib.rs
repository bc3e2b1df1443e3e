//! xlsxingest - Streaming XLSX row ingester with bounded memory
//!
//! This crate walks the sheets of an XLSX workbook with a pull parser, decodes
//! cell values (shared strings, inline strings, booleans, errors and numbers
//! rendered through their number format), keeps only the columns whose header
//! matches a requested name, and hands each finished row to a [`RowSink`].
//! Sheet XML is never materialized, so workbooks much larger than the heap can
//! be ingested.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsxingest::{IngestBuilder, MemorySink, SelectionDescriptor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Ingest columns "id" and "name" of sheet "Data", header on row 1 starting at column A
//!     let descriptor = SelectionDescriptor::from_json(
//!         r#"{"sheets":["Data"],"origin_rows":[1],"origin_columns":["A"],"columns":["id","name"]}"#,
//!     )?;
//!     let ingestor = IngestBuilder::new().with_selection(descriptor).build()?;
//!
//!     let mut sink = MemorySink::new();
//!     let outcome = ingestor.process(File::open("huge.xlsx")?, &mut sink)?;
//!
//!     for line in sink.lines("Data") {
//!         println!("{}", line); // '7','Alice'
//!     }
//!     println!("previews: {:?}", outcome.previews);
//!     Ok(())
//! }
//! ```
//!
//! # SQLite
//!
//! With the default `sqlite` feature, rows can be inserted straight into a table:
//!
//! ```rust,no_run
//! # #[cfg(feature = "sqlite")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::fs::File;
//! use xlsxingest::{IngestBuilder, SelectionDescriptor, SqliteRowSink};
//!
//! let descriptor = SelectionDescriptor::from_legacy_arrays(
//!     r#"[["Data"],[1],["A"]]"#,
//!     r#"["id","name"]"#,
//! )?;
//! let ingestor = IngestBuilder::new().with_selection(descriptor.clone()).build()?;
//!
//! let conn = rusqlite::Connection::open("people.db")?;
//! let mut sink = SqliteRowSink::create(conn, "people", &descriptor.columns)?;
//! ingestor.process(File::open("huge.xlsx")?, &mut sink)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "sqlite"))]
//! # fn main() {}
//! ```
//!
//! # Logging
//!
//! Dropped cells, failed sink writes and abandoned sheets are reported through
//! the [`log`] facade; install any logger implementation to see them.

mod api;
mod builder;
mod error;
mod format;
mod formatter;
mod parser;
mod processor;
mod security;
mod selection;
mod sink;
mod types;

// 公開API
pub use api::{SheetErrorPolicy, SinkErrorPolicy};
pub use builder::{IngestBuilder, Ingestor};
pub use error::{DecodeError, SinkError, XlsxIngestError};
pub use formatter::NumberFormatter;
pub use parser::{
    AssemblerState, CellValueDecoder, RowAssembler, SharedStringTable, SheetEntry, SheetWalker,
    StylesTable, XlsxPackage,
};
pub use security::SecurityConfig;
pub use selection::{Coordinate, Selection, SelectionDescriptor, SheetOrigin};
pub use sink::{MemorySink, RowSink};
#[cfg(feature = "sqlite")]
pub use sink::SqliteRowSink;
pub use types::{
    column_index, AssembledRow, CellRef, CellType, DecodedCell, ProcessOutcome, SheetReport,
    StyleFormat,
};
