//! パフォーマンスベンチマーク
//!
//! 大きなシートをストリーミングで取り込む速度と、数値書式の適用速度を測定します。
//! フィクスチャは`rust_xlsxwriter`でメモリ上に生成します。
//!
//! メモリ使用量の測定は別途、valgrindやheaptrackなどのツールを使用してください。

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Cursor;
use xlsxingest::{AssembledRow, IngestBuilder, NumberFormatter, RowSink, SelectionDescriptor, SinkError};

/// 行数を数えるだけの書き出し先
struct CountingSink(u64);

impl RowSink for CountingSink {
    fn accept_row(&mut self, _sheet: &str, row: &AssembledRow) -> Result<(), SinkError> {
        self.0 += row.cells.len() as u64;
        Ok(())
    }
}

/// `rows`行 x 6列のワークブックを生成
fn generate_workbook(rows: u32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Data")?;

    let percent = Format::new().set_num_format("0.0%");
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let money = Format::new().set_num_format("#,##0.00");

    for (col, header) in ["id", "name", "ratio", "date", "amount", "note"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for row in 1..=rows {
        let n = f64::from(row);
        sheet.write_number(row, 0, n)?;
        sheet.write_string(row, 1, format!("customer-{}", row % 1000))?;
        sheet.write_number_with_format(row, 2, n / f64::from(rows), &percent)?;
        sheet.write_number_with_format(row, 3, 40_000.0 + n, &date)?;
        sheet.write_number_with_format(row, 4, n * 12.34, &money)?;
        sheet.write_string(row, 5, "unselected")?;
    }

    workbook.save_to_buffer()
}

/// 大きなシートのストリーミング取り込み
fn benchmark_streaming(c: &mut Criterion) {
    const ROWS: u32 = 50_000;

    let data = match generate_workbook(ROWS) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Warning: Failed to generate workbook: {}. Skipping benchmark.", e);
            return;
        }
    };

    let descriptor = SelectionDescriptor::from_json(
        r#"{"sheets":["Data"],"origin_rows":[1],"origin_columns":[1],
            "columns":["id","name","ratio","date","amount"]}"#,
    )
    .expect("valid descriptor");
    let ingestor = IngestBuilder::new()
        .with_selection(descriptor)
        .with_preview_rows(0)
        .build()
        .expect("valid configuration");

    let mut group = c.benchmark_group("streaming");
    group.throughput(Throughput::Elements(u64::from(ROWS)));
    group.sample_size(10);
    group.bench_function("50k_rows", |b| {
        b.iter(|| {
            let mut sink = CountingSink(0);
            let outcome = ingestor
                .process(Cursor::new(black_box(&data)), &mut sink)
                .expect("ingest");
            black_box((outcome, sink.0))
        })
    });
    group.finish();
}

/// 数値書式の適用（書式キャッシュあり）
fn benchmark_number_formats(c: &mut Criterion) {
    let cases = [
        (9, "0%", "0.25"),
        (4, "#,##0.00", "1234567.891"),
        (14, "m/d/yy", "45658"),
        (164, "yyyy-mm-dd hh:mm:ss", "45658.5123"),
        (0, "General", "0.000123456789"),
        (11, "0.00E+00", "123456"),
    ];

    c.bench_function("number_formats", |b| {
        let mut formatter = NumberFormatter::new(false);
        b.iter(|| {
            for (code, pattern, raw) in &cases {
                black_box(formatter.format(raw, *code, Some(*pattern)).ok());
            }
        })
    });
}

criterion_group!(benches, benchmark_streaming, benchmark_number_formats);
criterion_main!(benches);
