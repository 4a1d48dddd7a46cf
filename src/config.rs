//! Export configuration
//!
//! Everything an export needs is carried in an [`ExportConfig`] value that is
//! passed down explicitly. Nothing is stored in process-wide state, so two
//! exports with different header colours can run side by side.

use crate::error::{ExportError, Result};
use std::fmt;

/// Default sheet title used when a table has no name of its own
pub const DEFAULT_SHEET_TITLE: &str = "Articles Report";
/// Default width of every column, in character units
pub const DEFAULT_COLUMN_WIDTH: f64 = 30.0;
/// Default height of every row, in points
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;
/// Default display text of hyperlink cells
pub const DEFAULT_HYPERLINK_LABEL: &str = "Article Image";
/// Default deflate level of the package
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// RGB colour given as exactly six hex digits (e.g. `2A41E4`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct HeaderColor(String);

impl HeaderColor {
    /// Parse a six-digit RGB hex string
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] for anything that is not
    /// exactly six ASCII hex digits.
    pub fn parse(rgb: &str) -> Result<Self> {
        if rgb.len() != 6 || !rgb.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ExportError::Configuration(format!(
                "header fill colour must be 6 hex digits (RRGGBB), got '{}'",
                rgb
            )));
        }
        Ok(HeaderColor(rgb.to_ascii_uppercase()))
    }

    /// The colour as `RRGGBB`
    pub fn rgb(&self) -> &str {
        &self.0
    }

    /// The colour as opaque `AARRGGBB`, the form used in style parts
    pub fn argb(&self) -> String {
        format!("FF{}", self.0)
    }
}

impl fmt::Display for HeaderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HeaderColor {
    type Error = ExportError;

    fn try_from(value: String) -> Result<Self> {
        HeaderColor::parse(&value)
    }
}

impl From<HeaderColor> for String {
    fn from(color: HeaderColor) -> Self {
        color.0
    }
}

/// Options for one export
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportConfig {
    /// Background of the header row
    pub header_fill: HeaderColor,
    /// Sheet name for tables without a name
    pub sheet_title: String,
    /// Width of every column
    pub column_width: f64,
    /// Height of every row
    pub row_height: f64,
    /// Display text of hyperlink cells
    pub hyperlink_label: String,
    /// Deflate level (`None` = library default)
    pub compression_level: Option<i64>,
    /// Creator recorded in the document properties
    pub author: String,
}

impl ExportConfig {
    /// Create a configuration with the given header colour and defaults for
    /// everything else
    pub fn new(header_fill_rgb: &str) -> Result<Self> {
        Ok(ExportConfig {
            header_fill: HeaderColor::parse(header_fill_rgb)?,
            sheet_title: DEFAULT_SHEET_TITLE.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            hyperlink_label: DEFAULT_HYPERLINK_LABEL.to_string(),
            compression_level: Some(DEFAULT_COMPRESSION_LEVEL),
            author: env!("CARGO_PKG_NAME").to_string(),
        })
    }

    pub fn with_sheet_title(mut self, title: impl Into<String>) -> Self {
        self.sheet_title = title.into();
        self
    }

    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn with_hyperlink_label(mut self, label: impl Into<String>) -> Self {
        self.hyperlink_label = label.into();
        self
    }

    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Check values that cannot be checked by construction
    pub fn validate(&self) -> Result<()> {
        if !(self.column_width.is_finite() && self.column_width > 0.0) {
            return Err(ExportError::Configuration(format!(
                "column width must be positive, got {}",
                self.column_width
            )));
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ExportError::Configuration(format!(
                "row height must be positive, got {}",
                self.row_height
            )));
        }
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(ExportError::Configuration(format!(
                    "compression level must be between 0 and 9, got {}",
                    level
                )));
            }
        }
        Ok(())
    }
}
