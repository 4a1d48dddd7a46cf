//! Streaming XLSX part writers
//!
//! This module holds the pieces the report writer is built from:
//! - Buffered XML output with row-level commit points
//! - Column naming and cell references
//! - The fixed style table of a report
//! - Encoding of raw values into typed cells
//! - Worksheet streaming
//! - The ZIP package that holds the parts

pub mod cell_ref;
pub mod encoder;
pub mod package;
pub mod styles;
pub mod worksheet;
pub mod xml_writer;

pub use cell_ref::{cell_reference, column_index, column_name};
pub use encoder::{encode, encode_header, EncodeOptions, Encoded, Position};
pub use package::{DocumentPackage, PartId, PartKind, SheetEntry, ZipPackage};
pub use styles::{NamedStyle, StyleTable};
pub use worksheet::{write_worksheet, SheetLayout, SheetStats, WorksheetWriter};
pub use xml_writer::XmlWriter;
