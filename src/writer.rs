//! Report workbook assembly
//!
//! [`ReportWriter`] owns the one [`StyleTable`] of an export and streams each
//! table into its own worksheet part of a [`DocumentPackage`]. The free
//! functions [`assemble`] and [`assemble_with`] cover the common case of
//! turning a list of tables into XLSX bytes in memory.

use crate::cancel::CancellationToken;
use crate::column::Column;
use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::stream::package::{DocumentPackage, PartKind, SheetEntry, ZipPackage};
use crate::stream::styles::StyleTable;
use crate::stream::worksheet::{SheetLayout, SheetStats, WorksheetWriter};
use crate::stream::xml_writer::XmlWriter;
use crate::types::DataTable;
use indexmap::IndexMap;
use std::io::{Cursor, Seek, Write};

/// Longest sheet name spreadsheet applications accept
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Streaming report writer
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use xlsx_report::{Column, DataTable, DeclaredType, ExportConfig, ReportWriter, ZipPackage};
///
/// let table = DataTable::new("", vec![
///     Column::new("Id", DeclaredType::I32),
///     Column::new("Name", DeclaredType::String),
/// ])
/// .with_row(["1", "Ball"])
/// .with_row(["2", "Hat"]);
///
/// let config = ExportConfig::new("2A41E4")?;
/// let package = ZipPackage::new(File::create("report.xlsx")?);
/// let mut writer = ReportWriter::new(package, config)?;
/// writer.add_table(&table)?;
/// writer.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ReportWriter<P: DocumentPackage> {
    package: P,
    config: ExportConfig,
    styles: StyleTable,
    /// lowercase name -> name as written
    sheet_names: IndexMap<String, String>,
    cancel: Option<CancellationToken>,
    /// First failure of this export; once set nothing more is written
    aborted: Option<String>,
}

impl<P: DocumentPackage> ReportWriter<P> {
    /// Build the style table and write the styles part
    pub fn new(mut package: P, config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let styles = StyleTable::build(&config.header_fill);

        package
            .start_part(PartKind::Styles)
            .and_then(|_| {
                let mut xml = XmlWriter::new(&mut package);
                styles.write_xml(&mut xml)?;
                xml.flush()
            })
            .map_err(ExportError::into_packaging)?;

        Ok(ReportWriter {
            package,
            config,
            styles,
            sheet_names: IndexMap::new(),
            cancel: None,
            aborted: None,
        })
    }

    /// Check `token` between rows of every sheet
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The style table shared by all sheets
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Names of the sheets added so far, in order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheet_names.values().map(String::as_str)
    }

    /// Write a table as the next worksheet
    pub fn add_table(&mut self, table: &DataTable) -> Result<SheetStats> {
        self.add_sheet(&table.name, &table.columns, &table.rows)
    }

    /// Write rows from any source as the next worksheet
    ///
    /// An empty `name` falls back to the configured sheet title. The name is
    /// cleaned up and made unique within the workbook.
    ///
    /// Any error aborts the whole export: later calls and [`ReportWriter::close`]
    /// fail as well, and the output must be discarded.
    pub fn add_sheet<I, R, S>(&mut self, name: &str, columns: &[Column], rows: I) -> Result<SheetStats>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        self.check_not_aborted()?;
        let result = self.write_sheet(name, columns, rows);
        if let Err(err) = &result {
            log::warn!("export aborted: {}", err);
            self.aborted = Some(err.to_string());
        }
        result
    }

    fn write_sheet<I, R, S>(&mut self, name: &str, columns: &[Column], rows: I) -> Result<SheetStats>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let requested = if name.trim().is_empty() {
            self.config.sheet_title.as_str()
        } else {
            name
        };
        let sheet_name = self.unique_sheet_name(requested);

        let part = self
            .package
            .start_part(PartKind::Worksheet)
            .map_err(ExportError::into_packaging)?;
        let rel_id = self.package.relationship_id(part)?;

        let layout = SheetLayout::from_config(&self.config);
        let mut sheet = WorksheetWriter::begin(
            &mut self.package,
            &sheet_name,
            &self.styles,
            columns,
            &layout,
        )
        .map_err(ExportError::into_packaging)?;
        sheet.write_rows(rows, self.cancel.as_ref())?;
        let stats = sheet.finish().map_err(ExportError::into_packaging)?;

        let sheet_id = self.sheet_names.len() as u32 + 1;
        self.package.append_sheet(SheetEntry {
            name: sheet_name.clone(),
            sheet_id,
            rel_id,
        });
        self.sheet_names
            .insert(sheet_name.to_lowercase(), sheet_name);
        Ok(stats)
    }

    /// Seal the package
    ///
    /// Fails without sealing when an earlier sheet failed.
    pub fn close(self) -> Result<P::Output> {
        self.check_not_aborted()?;
        log::debug!("sealing workbook with {} sheets", self.sheet_names.len());
        self.package.finish()
    }

    fn check_not_aborted(&self) -> Result<()> {
        match &self.aborted {
            Some(reason) => Err(ExportError::Packaging(format!(
                "export aborted by an earlier error: {}",
                reason
            ))),
            None => Ok(()),
        }
    }

    fn unique_sheet_name(&self, requested: &str) -> String {
        let base = sanitize_sheet_name(requested);
        if !self.sheet_names.contains_key(&base.to_lowercase()) {
            return base;
        }
        (2u32..)
            .map(|n| {
                let suffix = format!(" ({})", n);
                let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
                let head: String = base.chars().take(keep).collect();
                format!("{}{}", head.trim_end(), suffix)
            })
            .find(|candidate| !self.sheet_names.contains_key(&candidate.to_lowercase()))
            .unwrap_or_else(|| base.clone())
    }
}

/// Drop characters not allowed in sheet names and cut to 31 characters
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') && !c.is_control())
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Build an XLSX document from `tables` with the given header colour
///
/// Every other setting takes its default, see [`ExportConfig::new`].
pub fn assemble(tables: &[DataTable], header_fill_rgb: &str) -> Result<Vec<u8>> {
    let config = ExportConfig::new(header_fill_rgb)?;
    assemble_with(tables, &config)
}

/// Build an XLSX document in memory
pub fn assemble_with(tables: &[DataTable], config: &ExportConfig) -> Result<Vec<u8>> {
    Ok(assemble_into(tables, config, Cursor::new(Vec::new()))?.into_inner())
}

/// Build an XLSX document into any seekable sink and hand the sink back
///
/// On error the sink may hold a partial archive and must be discarded.
pub fn assemble_into<W: Write + Seek>(
    tables: &[DataTable],
    config: &ExportConfig,
    sink: W,
) -> Result<W> {
    let package = ZipPackage::new(sink)
        .with_compression_level(config.compression_level)
        .with_author(config.author.as_str());
    let mut writer = ReportWriter::new(package, config.clone())?;
    for table in tables {
        writer.add_table(table)?;
    }
    writer.close()
}
