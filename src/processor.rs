//! Workbook Processor
//!
//! ワークブックの全シートをコンテナ順に走査し、選択されたシートだけを
//! ストリーミング解析するモジュール。

use std::io::{Read, Seek};

use log::{debug, info, warn};

use crate::api::SheetErrorPolicy;
use crate::builder::IngestConfig;
use crate::error::XlsxIngestError;
use crate::parser::{RowAssembler, SheetEntry, SheetWalker, XlsxPackage};
use crate::sink::RowSink;
use crate::types::{ProcessOutcome, SheetReport};

/// 選択されなかったシートのプレビュー
const EMPTY_PREVIEW: &str = "[]";

/// ワークブック単位の処理
///
/// スタイルと共有文字列はワークブックを開いたときに1度だけ読み込み、
/// すべてのシートで共有します。シートは1つずつ順番に処理します。
#[derive(Debug)]
pub(crate) struct WorkbookProcessor<'c> {
    config: &'c IngestConfig,
}

impl<'c> WorkbookProcessor<'c> {
    pub fn new(config: &'c IngestConfig) -> Self {
        Self { config }
    }

    /// ワークブックを処理する
    ///
    /// 選択記述子に含まれるシートは、マッチした順に原点のスロットと対応付けられます
    /// （名前による対応付けではありません）。含まれないシートはデコードしません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(ProcessOutcome)` - プレビュー、シート名、シートごとの処理結果
    /// * `Err(XlsxIngestError)` - ワークブック単位のパーツが壊れている場合、または
    ///   中断方針が設定されたエラーが発生した場合
    pub fn process<R, S>(
        &self,
        package: &mut XlsxPackage<R>,
        sink: &mut S,
    ) -> Result<ProcessOutcome, XlsxIngestError>
    where
        R: Read + Seek,
        S: RowSink + ?Sized,
    {
        let styles = package.load_styles()?;
        let shared_strings = package.load_shared_strings()?;
        let date_1904 = package.date_1904();
        let sheets: Vec<SheetEntry> = package.sheets().to_vec();

        debug!(
            "Loaded {} styles and {} shared strings ({} bytes)",
            styles.len(),
            shared_strings.len(),
            shared_strings.heap_bytes()
        );

        let selection = &self.config.selection;
        let mut outcome = ProcessOutcome {
            sheet_count: sheets.len(),
            ..ProcessOutcome::default()
        };
        let mut next_slot = 0usize;

        for (index, entry) in sheets.iter().enumerate() {
            outcome.sheet_names.push(entry.name.clone());
            let mut report = SheetReport {
                name: entry.name.clone(),
                index,
                ..SheetReport::default()
            };

            if !selection.is_target(&entry.name) {
                debug!("Skipping sheet '{}' (not selected)", entry.name);
                outcome.previews.push(EMPTY_PREVIEW.to_string());
                outcome.reports.push(report);
                continue;
            }

            let origin = selection.origin_at(next_slot).ok_or_else(|| {
                XlsxIngestError::Config(format!(
                    "no origin left for sheet '{}' (slot {})",
                    entry.name, next_slot
                ))
            })?;
            debug!(
                "Sheet '{}' paired with selection slot {} (origin row {}, column {})",
                entry.name, next_slot, origin.row(), origin.column()
            );
            next_slot += 1;

            report.selected = true;
            report.origin = Some((origin.row(), origin.column()));
            info!("Ingesting sheet '{}' ({}/{})", entry.name, index + 1, sheets.len());

            let mut assembler = RowAssembler::new(
                entry.name.as_str(),
                &shared_strings,
                &styles,
                date_1904,
                origin,
                selection.columns(),
            )
            .with_sink_policy(self.config.sink_policy)
            .with_preview_limit(self.config.preview_rows);

            let result = package.open_part(&entry.path).and_then(|reader| {
                SheetWalker::new(entry.name.as_str()).walk(reader, &mut assembler, &mut *sink)
            });

            let stats = assembler.stats();
            report.selected_columns = assembler.selected_columns().to_vec();
            report.rows_seen = stats.rows_seen;
            report.rows_forwarded = stats.rows_forwarded;
            report.cells_dropped = stats.cells_dropped;
            report.sink_failures = stats.sink_failures;
            outcome.previews.push(
                serde_json::to_string(assembler.preview())
                    .unwrap_or_else(|_| EMPTY_PREVIEW.to_string()),
            );

            match result {
                Ok(()) => {
                    info!(
                        "Finished sheet '{}': {} rows seen, {} forwarded, {} cells dropped, {} sink failures",
                        entry.name,
                        report.rows_seen,
                        report.rows_forwarded,
                        report.cells_dropped,
                        report.sink_failures
                    );
                }
                Err(e @ XlsxIngestError::MalformedSheet { .. })
                | Err(e @ XlsxIngestError::MissingPart(_)) => match self.config.sheet_error_policy {
                    SheetErrorPolicy::Skip => {
                        warn!(
                            "Abandoning sheet '{}' after {} rows: {}",
                            entry.name, report.rows_seen, e
                        );
                        report.error = Some(e.to_string());
                    }
                    SheetErrorPolicy::Abort => return Err(e),
                },
                Err(e) => return Err(e),
            }

            outcome.reports.push(report);
        }

        Ok(outcome)
    }
}
