//! # xlsx-report
//!
//! Streaming export of tabular data to XLSX spreadsheet reports.
//!
//! ## Features
//!
//! - **Streaming Write**: Rows go straight to the compressed worksheet part, memory stays O(columns)
//! - **Typed Cells**: Columns are classified by declared type into integer, float, date, link or text cells
//! - **Fixed Styles**: One style table per workbook with a configurable header colour
//! - **Hyperlinks**: URI columns become `HYPERLINK` formulas with a fixed label
//! - **Cancellation**: Long exports can be stopped between rows
//! - **Deterministic**: The same tables and settings always produce the same bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use xlsx_report::{assemble, Column, DataTable, DeclaredType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = DataTable::new("Articles", vec![
//!     Column::new("Id", DeclaredType::I32),
//!     Column::new("_unit_price", DeclaredType::Decimal),
//!     Column::new("Added", DeclaredType::DateTime),
//!     Column::new("Image", DeclaredType::Uri),
//! ])
//! .with_row(["1", "3.5", "2024-03-15", "https://example.com/ball.png"])
//! .with_row(["2", "12", "2024-03-15 09:30:00", ""]);
//!
//! let bytes = assemble(&[table], "2A41E4")?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok(())
//! # }
//! ```
//!
//! Writing to a file with custom layout:
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsx_report::{Column, DeclaredType, ExportConfig, ReportWriter, ZipPackage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig::new("C00000")?
//!     .with_sheet_title("Inventory")
//!     .with_column_width(20.0);
//!
//! let package = ZipPackage::new(File::create("inventory.xlsx")?);
//! let mut writer = ReportWriter::new(package, config)?;
//!
//! let columns = [Column::new("Sku", DeclaredType::String), Column::new("Count", DeclaredType::I64)];
//! let rows = (0..100_000).map(|i| vec![format!("SKU-{}", i), i.to_string()]);
//! writer.add_sheet("", &columns, rows)?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod column;
pub mod config;
pub mod error;
pub mod records;
pub mod stream;
pub mod types;
pub mod writer;

pub use cancel::CancellationToken;
pub use column::{classify, Column, ColumnCategory, DeclaredType};
pub use config::{ExportConfig, HeaderColor};
pub use error::{ExportError, Result};
pub use records::{RecordSchema, ToCellText};
pub use stream::{
    column_index, column_name, encode, write_worksheet, DocumentPackage, Encoded, NamedStyle,
    SheetStats, StyleTable, WorksheetWriter, ZipPackage,
};
pub use types::{Cell, CellType, CellValue, DataTable};
pub use writer::{assemble, assemble_into, assemble_with, ReportWriter};
