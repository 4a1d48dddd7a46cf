//! Worksheet writer streaming rows in a single forward pass
//!
//! Column letters and categories are worked out once when the sheet starts.
//! Each row is assembled in a reusable buffer and handed to the sink only
//! when complete, so memory stays proportional to the column count and a
//! failed row never leaves half a `<row>` element behind.

use super::cell_ref::push_column_name;
use super::encoder::{encode, encode_header, EncodeOptions, Encoded, Position};
use super::styles::StyleTable;
use super::xml_writer::XmlWriter;
use crate::cancel::CancellationToken;
use crate::column::{Column, ColumnCategory};
use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::types::{Cell, CellValue, DataTable};
use std::io::Write;

/// Per-sheet layout settings
#[derive(Debug, Clone, Copy)]
pub struct SheetLayout<'a> {
    pub column_width: f64,
    pub row_height: f64,
    pub hyperlink_label: &'a str,
}

impl<'a> SheetLayout<'a> {
    pub fn from_config(config: &'a ExportConfig) -> Self {
        SheetLayout {
            column_width: config.column_width,
            row_height: config.row_height,
            hyperlink_label: &config.hyperlink_label,
        }
    }
}

/// Counters reported when a sheet is finished
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetStats {
    /// Data rows written (header not included)
    pub rows: u32,
    /// Cells written, header included
    pub cells: u64,
    /// Numeric values that did not parse and were left out
    pub skipped_cells: u64,
    /// Date values that did not parse and were written as text
    pub fallback_cells: u64,
}

struct ColumnPlan {
    letters: Vec<u8>,
    category: ColumnCategory,
}

/// Streaming writer for one worksheet part
pub struct WorksheetWriter<'a, W: Write> {
    xml: XmlWriter<W>,
    styles: &'a StyleTable,
    options: EncodeOptions<'a>,
    sheet: String,
    columns: Vec<ColumnPlan>,
    row_height: f64,
    current_row: u32,
    stats: SheetStats,
}

impl<'a, W: Write> WorksheetWriter<'a, W> {
    /// Start a worksheet: column widths, `<sheetData>` and the header row
    pub fn begin(
        sink: W,
        sheet: &str,
        styles: &'a StyleTable,
        columns: &[Column],
        layout: &SheetLayout<'a>,
    ) -> Result<Self> {
        let plans: Vec<ColumnPlan> = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut letters = Vec::with_capacity(3);
                push_column_name(&mut letters, idx as u32);
                ColumnPlan {
                    letters,
                    category: column.category(),
                }
            })
            .collect();

        let mut writer = WorksheetWriter {
            xml: XmlWriter::new(sink),
            styles,
            options: EncodeOptions {
                hyperlink_label: layout.hyperlink_label,
            },
            sheet: sheet.to_string(),
            columns: plans,
            row_height: layout.row_height,
            current_row: 0,
            stats: SheetStats::default(),
        };

        let xml = &mut writer.xml;
        xml.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.start_element("worksheet");
        xml.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        );
        xml.attribute(
            "xmlns:r",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
        );
        xml.close_start_tag();

        // <cols> must not be empty
        if !columns.is_empty() {
            xml.start_element("cols");
            xml.close_start_tag();
            for idx in 1..=columns.len() {
                xml.start_element("col");
                xml.attribute_int("min", idx);
                xml.attribute_int("max", idx);
                xml.attribute_number("width", layout.column_width);
                xml.attribute("customWidth", "1");
                xml.close_empty();
            }
            xml.end_element("cols");
        }

        xml.start_element("sheetData");
        xml.close_start_tag();

        writer.write_header(columns)?;
        Ok(writer)
    }

    fn write_header(&mut self, columns: &[Column]) -> Result<()> {
        self.current_row = 1;
        self.start_row();
        for (idx, column) in columns.iter().enumerate() {
            let cell = encode_header(&column.label(), idx as u32, self.styles);
            Self::write_cell(&mut self.xml, &self.columns[idx].letters, &cell);
        }
        self.xml.end_element("row");
        self.stats.cells += columns.len() as u64;
        self.commit_row()
    }

    /// Write the next data row; `values` must hold one entry per column
    pub fn write_row<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        let row = self.current_row + 1;
        if values.len() != self.columns.len() {
            return Err(ExportError::RowLength {
                sheet: self.sheet.clone(),
                row,
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        self.current_row = row;
        self.start_row();
        let mut written = 0u64;
        for (idx, value) in values.iter().enumerate() {
            let plan = &self.columns[idx];
            let position = Position::new(idx as u32, row);
            match encode(
                value.as_ref(),
                plan.category,
                position,
                self.styles,
                &self.options,
            ) {
                Encoded::Cell(cell) => {
                    Self::write_cell(&mut self.xml, &plan.letters, &cell);
                    written += 1;
                }
                Encoded::Fallback(cell) => {
                    log::debug!(
                        "sheet '{}': {}{} is not a date, written as text",
                        self.sheet,
                        String::from_utf8_lossy(&plan.letters),
                        row
                    );
                    Self::write_cell(&mut self.xml, &plan.letters, &cell);
                    self.stats.fallback_cells += 1;
                    written += 1;
                }
                Encoded::Skipped => {
                    log::warn!(
                        "sheet '{}': {}{} ({} column) is not a number: {:?}, cell omitted",
                        self.sheet,
                        String::from_utf8_lossy(&plan.letters),
                        row,
                        plan.category,
                        value.as_ref()
                    );
                    self.stats.skipped_cells += 1;
                }
            }
        }
        self.xml.end_element("row");

        self.commit_row()
            .map_err(|source| ExportError::WriteRowError {
                row,
                sheet: self.sheet.clone(),
                source: Box::new(source),
            })?;
        self.stats.rows += 1;
        self.stats.cells += written;
        Ok(())
    }

    /// Write every row, checking `cancel` before each one
    pub fn write_rows<I, R, S>(&mut self, rows: I, cancel: Option<&CancellationToken>) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for row in rows {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ExportError::Cancelled {
                    sheet: self.sheet.clone(),
                    rows_written: self.rows_written(),
                });
            }
            self.write_row(row.as_ref())?;
        }
        Ok(())
    }

    /// Data rows written so far
    pub fn rows_written(&self) -> u32 {
        self.stats.rows
    }

    /// Close the sheet and return its counters
    pub fn finish(mut self) -> Result<SheetStats> {
        self.xml.end_element("sheetData");
        self.xml.end_element("worksheet");
        self.xml.flush()?;

        log::debug!(
            "sheet '{}' finished: {} rows, {} cells, {} skipped, {} as text",
            self.sheet,
            self.stats.rows,
            self.stats.cells,
            self.stats.skipped_cells,
            self.stats.fallback_cells
        );
        Ok(self.stats)
    }

    fn start_row(&mut self) {
        self.xml.start_element("row");
        self.xml.attribute_int("r", self.current_row);
        self.xml.attribute_number("ht", self.row_height);
        self.xml.attribute("customHeight", "1");
        self.xml.close_start_tag();
    }

    fn commit_row(&mut self) -> Result<()> {
        let result = self.xml.commit();
        if result.is_err() {
            self.xml.discard();
        }
        result
    }

    fn write_cell(xml: &mut XmlWriter<W>, letters: &[u8], cell: &Cell) {
        let mut num = itoa::Buffer::new();
        xml.write_raw(b"<c r=\"");
        xml.write_raw(letters);
        xml.write_str(num.format(cell.row));
        xml.write_raw(b"\"");
        if cell.style != 0 {
            xml.attribute_int("s", cell.style);
        }
        xml.attribute("t", cell.cell_type.as_attr());
        xml.close_start_tag();

        match &cell.value {
            CellValue::String(text) => xml.text_element("v", text),
            CellValue::Number(number) => {
                xml.write_raw(b"<v>");
                xml.write_number(*number);
                xml.write_raw(b"</v>");
            }
            CellValue::Formula(formula) => xml.text_element("f", formula),
        }
        xml.end_element("c");
    }
}

/// Write a whole table as one worksheet part
pub fn write_worksheet<W: Write>(
    sink: W,
    sheet: &str,
    table: &DataTable,
    styles: &StyleTable,
    layout: &SheetLayout<'_>,
    cancel: Option<&CancellationToken>,
) -> Result<SheetStats> {
    let mut writer = WorksheetWriter::begin(sink, sheet, styles, &table.columns, layout)?;
    writer.write_rows(&table.rows, cancel)?;
    writer.finish()
}
