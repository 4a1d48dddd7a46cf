//! Type definitions for tables and encoded cells

use crate::column::Column;
use crate::stream::cell_ref;

/// A named table of string values
///
/// Every row holds exactly one raw value per column; the empty string stands
/// for a null value.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    /// Sheet name; empty means "use the configured report title"
    pub name: String,
    /// Column declarations
    pub columns: Vec<Column>,
    /// Raw values, row by row
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create an empty table with the given columns
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        DataTable {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of raw values
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
    }

    /// Builder-style variant of [`DataTable::push_row`]
    pub fn with_row<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(values);
        self
    }

    /// Number of data rows (header not included)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Cell type tag as written to the `t` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Plain string value (`t="str"`)
    String,
    /// Number value (`t="n"`)
    Number,
    /// Inline string, used for formula cells (`t="inlineStr"`)
    InlineString,
}

impl CellType {
    /// Value of the `t` attribute
    pub fn as_attr(&self) -> &'static str {
        match self {
            CellType::String => "str",
            CellType::Number => "n",
            CellType::InlineString => "inlineStr",
        }
    }
}

/// Payload of an encoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text value
    String(String),
    /// Number value (also serial dates)
    Number(f64),
    /// Formula text without the leading `=`
    Formula(String),
}

/// A cell ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Column index (0-based)
    pub col: u32,
    /// Row number (1-based)
    pub row: u32,
    /// Cell payload
    pub value: CellValue,
    /// Type tag
    pub cell_type: CellType,
    /// Index into the style table's cell formats
    pub style: u32,
}

impl Cell {
    /// Get Excel-style cell reference (e.g., "A1", "B2")
    pub fn reference(&self) -> String {
        cell_ref::cell_reference(self.col, self.row)
    }
}
