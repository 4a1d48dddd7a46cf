//! Column declarations and rendering categories

use std::fmt;

/// Declared type of a column as reported by the data source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclaredType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Decimal,
    F32,
    F64,
    DateTime,
    Date,
    Uri,
    String,
    Bool,
    /// Column whose values are all null
    Null,
    /// Any other source type, kept by name
    Other(String),
}

impl DeclaredType {
    /// Map a source type name to a declared type
    ///
    /// Accepts .NET style names (`System.Int32`), SQL style names (`bigint`,
    /// `timestamp`) and Rust primitive names (`i64`, `f64`). Matching is
    /// case-insensitive. Unknown names become [`DeclaredType::Other`].
    pub fn from_type_name(name: &str) -> Self {
        let trimmed = name.trim();
        let lower = trimmed.to_ascii_lowercase();
        let short = lower.strip_prefix("system.").unwrap_or(&lower);

        match short {
            "sbyte" | "i8" | "tinyint" => DeclaredType::I8,
            "int16" | "short" | "i16" | "smallint" => DeclaredType::I16,
            "int32" | "int" | "integer" | "i32" => DeclaredType::I32,
            "int64" | "long" | "i64" | "bigint" => DeclaredType::I64,
            "byte" | "u8" => DeclaredType::U8,
            "uint16" | "ushort" | "u16" => DeclaredType::U16,
            "uint32" | "uint" | "u32" => DeclaredType::U32,
            "uint64" | "ulong" | "u64" => DeclaredType::U64,
            "decimal" | "numeric" | "money" => DeclaredType::Decimal,
            "single" | "float" | "f32" | "real" => DeclaredType::F32,
            "double" | "f64" | "double precision" => DeclaredType::F64,
            "datetime" | "timestamp" | "datetimeoffset" => DeclaredType::DateTime,
            "date" | "dateonly" => DeclaredType::Date,
            "uri" | "url" => DeclaredType::Uri,
            "string" | "str" | "text" | "varchar" | "nvarchar" | "char" => DeclaredType::String,
            "boolean" | "bool" | "bit" => DeclaredType::Bool,
            "dbnull" | "null" => DeclaredType::Null,
            _ => DeclaredType::Other(trimmed.to_string()),
        }
    }
}

/// Rendering category of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnCategory {
    Integer,
    Float,
    Date,
    Uri,
    Text,
}

impl ColumnCategory {
    /// Category for a declared type, see [`classify`]
    pub fn of(declared: &DeclaredType) -> Self {
        classify(declared)
    }

    /// Whether values in this category are written as number cells
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnCategory::Integer | ColumnCategory::Float)
    }
}

impl fmt::Display for ColumnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnCategory::Integer => "integer",
            ColumnCategory::Float => "float",
            ColumnCategory::Date => "date",
            ColumnCategory::Uri => "uri",
            ColumnCategory::Text => "text",
        };
        f.write_str(name)
    }
}

/// Decide how a column is rendered from its declared type alone.
///
/// Never looks at values: a column is classified once, before any row.
pub fn classify(declared: &DeclaredType) -> ColumnCategory {
    match declared {
        DeclaredType::I8
        | DeclaredType::I16
        | DeclaredType::I32
        | DeclaredType::I64
        | DeclaredType::U8
        | DeclaredType::U16
        | DeclaredType::U32
        | DeclaredType::U64 => ColumnCategory::Integer,
        DeclaredType::Decimal | DeclaredType::F32 | DeclaredType::F64 => ColumnCategory::Float,
        DeclaredType::DateTime | DeclaredType::Date => ColumnCategory::Date,
        DeclaredType::Uri => ColumnCategory::Uri,
        DeclaredType::String | DeclaredType::Bool | DeclaredType::Null | DeclaredType::Other(_) => {
            ColumnCategory::Text
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Source name (e.g. a field name like `_unit_price`)
    pub name: String,
    /// Declared type of the values
    pub declared: DeclaredType,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Column {
            name: name.into(),
            declared,
        }
    }

    /// Rendering category of this column
    pub fn category(&self) -> ColumnCategory {
        classify(&self.declared)
    }

    /// Header text shown in row 1
    pub fn label(&self) -> String {
        header_label(&self.name)
    }
}

/// Header text for a column name: leading underscores dropped, the rest
/// turned into spaces (`_unit_price` -> `unit price`).
pub fn header_label(name: &str) -> String {
    name.trim_start_matches('_').replace('_', " ")
}
