//! Integration tests for xlsx-report

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use tempfile::NamedTempFile;
use xlsx_report::{
    assemble, assemble_into, assemble_with, CancellationToken, Column, DataTable, DeclaredType,
    ExportConfig, ExportError, RecordSchema, ReportWriter, ZipPackage,
};
use zip::ZipArchive;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

fn articles() -> DataTable {
    DataTable::new(
        "Articles",
        vec![
            Column::new("Id", DeclaredType::I32),
            Column::new("_unit_price", DeclaredType::Decimal),
            Column::new("Added", DeclaredType::DateTime),
            Column::new("Image", DeclaredType::Uri),
            Column::new("Name", DeclaredType::String),
        ],
    )
    .with_row(["1", "3.5", "2024-03-15", "https://example.com/ball.png", "Ball"])
    .with_row(["abc", "2", "2024-03-15 09:30:00", "", "A\u{1}B"])
    .with_row(["3", "1,250.75", "not a date", "https://example.com/hat.png", "Hat & Co"])
}

#[test]
fn test_package_contains_all_parts() {
    let bytes = assemble(&[articles()], "2A41E4").unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();

    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
        ]
    );
}

#[test]
fn test_rows_and_cells() {
    let bytes = assemble(&[articles()], "2A41E4").unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    // header plus three data rows
    assert_eq!(sheet.matches("<row ").count(), 4);
    // 5 header cells + 5 + 4 (Id "abc" omitted) + 5
    assert_eq!(sheet.matches("<c r=").count(), 19);

    assert!(sheet.contains("<c r=\"A1\" s=\"3\" t=\"str\"><v>Id</v></c>"));
    assert!(sheet.contains("<c r=\"B1\" s=\"3\" t=\"str\"><v>unit price</v></c>"));
    assert!(sheet.contains("<c r=\"B2\" s=\"5\" t=\"n\"><v>3.5</v></c>"));
    assert!(!sheet.contains("<c r=\"A3\""));
    assert!(sheet.contains("<c r=\"B3\" s=\"5\" t=\"n\"><v>2</v></c>"));
    assert!(sheet.contains("<c r=\"B4\" s=\"5\" t=\"n\"><v>1250.75</v></c>"));
}

#[test]
fn test_date_styles() {
    let bytes = assemble(&[articles()], "2A41E4").unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    // midnight gets the date-only format
    assert!(sheet.contains("<c r=\"C2\" s=\"2\" t=\"n\"><v>45366</v></c>"));
    assert!(sheet.contains("<c r=\"C3\" s=\"1\" t=\"n\"><v>45366.39583333"));
    // unparseable dates fall back to text
    assert!(sheet.contains("<c r=\"C4\" t=\"str\"><v>not a date</v></c>"));
}

#[test]
fn test_text_and_links() {
    let bytes = assemble(&[articles()], "2A41E4").unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    assert!(sheet.contains("<c r=\"E3\" t=\"str\"><v>AB</v></c>"));
    assert!(sheet.contains("<v>Hat &amp; Co</v>"));
    assert!(sheet.contains(
        "<c r=\"D2\" s=\"12\" t=\"inlineStr\"><f>HYPERLINK(&quot;https://example.com/ball.png&quot;, &quot;Article Image&quot;)</f></c>"
    ));
    // an empty link still becomes a formula
    assert!(sheet.contains("<c r=\"D3\" s=\"12\" t=\"inlineStr\">"));
}

#[test]
fn test_layout_settings() {
    let config = ExportConfig::new("c00000")
        .unwrap()
        .with_column_width(12.5)
        .with_row_height(18.0)
        .with_hyperlink_label("Open");
    let bytes = assemble_with(&[articles()], &config).unwrap();

    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert_eq!(sheet.matches("width=\"12.5\" customWidth=\"1\"").count(), 5);
    assert_eq!(sheet.matches("ht=\"18\" customHeight=\"1\"").count(), 4);
    assert!(sheet.contains("&quot;Open&quot;)"));

    let styles = read_part(&bytes, "xl/styles.xml");
    assert!(styles.contains("FFC00000"));
}

#[test]
fn test_multiple_sheets() {
    let tables = vec![
        articles(),
        DataTable::new("", vec![Column::new("Id", DeclaredType::I64)]).with_row(["7"]),
        DataTable::new("Articles", vec![]),
    ];
    let bytes = assemble(&tables, "2A41E4").unwrap();

    let workbook = read_part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains("<sheet name=\"Articles\" sheetId=\"1\" r:id=\"rId1\"/>"));
    assert!(workbook.contains("<sheet name=\"Articles Report\" sheetId=\"2\" r:id=\"rId2\"/>"));
    assert!(workbook.contains("<sheet name=\"Articles (2)\" sheetId=\"3\" r:id=\"rId3\"/>"));

    let empty = read_part(&bytes, "xl/worksheets/sheet3.xml");
    assert!(!empty.contains("<cols>"));
    assert!(empty.contains("<row r=\"1\""));
}

#[test]
fn test_export_is_deterministic() {
    let first = assemble(&[articles()], "2A41E4").unwrap();
    let second = assemble(&[articles()], "2A41E4").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_export_to_file() {
    let temp = NamedTempFile::new().unwrap();
    let config = ExportConfig::new("2A41E4").unwrap();

    let file = assemble_into(&[articles()], &config, temp.reopen().unwrap()).unwrap();
    drop(file);

    let mut archive = ZipArchive::new(temp.reopen().unwrap()).unwrap();
    assert!(archive.by_name("xl/worksheets/sheet1.xml").is_ok());
}

#[test]
fn test_streaming_rows_from_iterator() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let package = ZipPackage::new(Cursor::new(Vec::new()));
    let mut writer = ReportWriter::new(package, config).unwrap();

    let columns = [
        Column::new("Sku", DeclaredType::String),
        Column::new("Count", DeclaredType::I64),
    ];
    let rows = (0..1000).map(|i| vec![format!("SKU-{}", i), i.to_string()]);
    let stats = writer.add_sheet("Inventory", &columns, rows).unwrap();
    assert_eq!(stats.rows, 1000);
    assert_eq!(stats.cells, 2002);

    let bytes = writer.close().unwrap().into_inner();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<c r=\"B1001\" s=\"4\" t=\"n\"><v>999</v></c>"));
}

#[test]
fn test_records_export() {
    struct Article {
        id: u32,
        name: String,
        price: Option<f64>,
    }

    let schema = RecordSchema::new()
        .field("Id", DeclaredType::U32, |a: &Article| a.id)
        .field("Name", DeclaredType::String, |a: &Article| a.name.clone())
        .field("_unit_price", DeclaredType::F64, |a: &Article| a.price);
    let records = vec![
        Article {
            id: 1,
            name: "Ball".to_string(),
            price: Some(9.99),
        },
        Article {
            id: 2,
            name: "Hat".to_string(),
            price: None,
        },
    ];

    let bytes = assemble(&[schema.to_table("", &records)], "2A41E4").unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<c r=\"C2\" s=\"5\" t=\"n\"><v>9.99</v></c>"));
    // a missing price is an empty numeric value and is left out
    assert!(!sheet.contains("<c r=\"C3\""));
}

#[test]
fn test_row_length_mismatch() {
    let mut table = DataTable::new("", vec![Column::new("Id", DeclaredType::I32)]);
    table.rows.push(vec!["1".to_string(), "extra".to_string()]);

    let err = assemble(&[table], "2A41E4").unwrap_err();
    assert!(matches!(
        err,
        ExportError::RowLength {
            row: 2,
            expected: 1,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_cancellation_stops_export() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let token = CancellationToken::new();
    let package = ZipPackage::new(Cursor::new(Vec::new()));
    let mut writer = ReportWriter::new(package, config)
        .unwrap()
        .with_cancellation(token.clone());

    let columns = [Column::new("Id", DeclaredType::I32)];
    let canceller = token.clone();
    let rows = (0..100).map(move |i| {
        if i == 10 {
            canceller.cancel();
        }
        vec![i.to_string()]
    });

    let err = writer.add_sheet("", &columns, rows).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Cancelled {
            rows_written: 10,
            ..
        }
    ));
}

/// Sink that refuses writes past a byte limit
#[derive(Debug)]
struct LimitedSink {
    inner: Cursor<Vec<u8>>,
    limit: u64,
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.inner.position() + buf.len() as u64 > self.limit {
            return Err(io::Error::other("disk full"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for LimitedSink {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl LimitedSink {
    fn new(limit: u64) -> Self {
        LimitedSink {
            inner: Cursor::new(Vec::new()),
            limit,
        }
    }
}

fn small_table() -> DataTable {
    DataTable::new("", vec![Column::new("Id", DeclaredType::I32)]).with_row(["1"])
}

#[test]
fn test_sink_failure_while_writing_styles() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let err = assemble_into(&[small_table()], &config, LimitedSink::new(64)).unwrap_err();
    assert!(matches!(err, ExportError::Packaging(_)), "{err:?}");
}

#[test]
fn test_sink_failure_during_rows() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let mut big = DataTable::new("", vec![Column::new("Name", DeclaredType::String)]);
    big.rows = (0..20_000)
        .map(|i| vec![format!("row {} {}", i, i * 7919)])
        .collect();

    let err = assemble_into(&[big], &config, LimitedSink::new(4096)).unwrap_err();
    assert!(matches!(err, ExportError::WriteRowError { .. }), "{err:?}");
}

#[test]
fn test_sink_failure_while_sealing() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let bytes = assemble_with(&[small_table()], &config).unwrap();

    // the workbook part is the first one written by the seal
    let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let seal_start = archive.by_name("xl/workbook.xml").unwrap().header_start();

    let err = assemble_into(&[small_table()], &config, LimitedSink::new(seal_start)).unwrap_err();
    assert!(matches!(err, ExportError::Packaging(_)), "{err:?}");
}

#[test]
fn test_failed_sheet_is_never_sealed() {
    let config = ExportConfig::new("2A41E4").unwrap();
    let package = ZipPackage::new(Cursor::new(Vec::new()));
    let mut writer = ReportWriter::new(package, config).unwrap();

    let mut bad = small_table().with_row(["2"]);
    bad.name = "Bad".to_string();
    bad.rows.push(vec!["3".to_string(), "extra".to_string()]);
    let err = writer.add_table(&bad).unwrap_err();
    assert!(matches!(err, ExportError::RowLength { row: 4, .. }));

    assert!(writer.add_table(&small_table()).is_err());
    assert!(matches!(writer.close(), Err(ExportError::Packaging(_))));
}
