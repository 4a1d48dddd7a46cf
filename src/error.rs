//! Error types for report export

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for all export operations
///
/// Per-cell parse problems are not errors: a numeric value that does not parse
/// is dropped and a date that does not parse is written as text. Everything in
/// this enum aborts the whole export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Malformed configuration (header colour, layout values)
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The document container could not be sealed
    #[error("Failed to finalize document package: {0}")]
    Packaging(String),

    /// A row does not have one value per column
    #[error("Row {row} of sheet '{sheet}' has {actual} values, expected {expected}")]
    RowLength {
        sheet: String,
        row: u32,
        expected: usize,
        actual: usize,
    },

    /// Error occurred while writing a row
    #[error("Failed to write row {row} to sheet '{sheet}': {source}")]
    WriteRowError {
        row: u32,
        sheet: String,
        #[source]
        source: Box<ExportError>,
    },

    /// The caller cancelled the export between two rows
    #[error("Export cancelled after {rows_written} rows of sheet '{sheet}'")]
    Cancelled { sheet: String, rows_written: u32 },

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ExportError {
    /// Report a sink failure as a packaging failure; other errors pass through
    pub fn into_packaging(self) -> Self {
        match self {
            ExportError::IoError(err) => ExportError::Packaging(err.to_string()),
            other => other,
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Packaging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_row_error_message() {
        let err = ExportError::WriteRowError {
            row: 7,
            sheet: "Articles Report".to_string(),
            source: Box::new(ExportError::IoError(std::io::Error::other("disk full"))),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write row 7 to sheet 'Articles Report': IO error: disk full"
        );
    }

    #[test]
    fn test_into_packaging() {
        let io = ExportError::IoError(std::io::Error::other("disk full"));
        assert!(matches!(io.into_packaging(), ExportError::Packaging(msg) if msg == "disk full"));

        let config = ExportError::Configuration("bad".to_string());
        assert!(matches!(config.into_packaging(), ExportError::Configuration(_)));
    }

    #[test]
    fn test_zip_error_is_packaging() {
        let err: ExportError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, ExportError::Packaging(_)));
    }
}
