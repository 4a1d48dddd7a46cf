//! Mapping typed records onto tables
//!
//! A [`RecordSchema`] is a static list of `(name, type, extractor)` triples.
//! It turns a slice of records into a [`DataTable`], or into a row iterator
//! for [`ReportWriter::add_sheet`](crate::writer::ReportWriter::add_sheet)
//! when the records should not be copied up front.

use crate::column::{Column, DeclaredType};
use crate::types::DataTable;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Conversion of a field value to the raw text of a cell
pub trait ToCellText {
    fn to_cell_text(&self) -> String;
}

macro_rules! impl_to_cell_text_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToCellText for $ty {
                fn to_cell_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_to_cell_text_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, String, str);

impl ToCellText for NaiveDateTime {
    fn to_cell_text(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

impl ToCellText for NaiveDate {
    fn to_cell_text(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl<Tz: TimeZone> ToCellText for DateTime<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn to_cell_text(&self) -> String {
        self.to_rfc3339()
    }
}

/// `None` is the null value and becomes an empty cell text
impl<T: ToCellText> ToCellText for Option<T> {
    fn to_cell_text(&self) -> String {
        self.as_ref().map(ToCellText::to_cell_text).unwrap_or_default()
    }
}

impl<T: ToCellText + ?Sized> ToCellText for &T {
    fn to_cell_text(&self) -> String {
        (**self).to_cell_text()
    }
}

type Extractor<T> = Box<dyn Fn(&T) -> String>;

struct Field<T> {
    column: Column,
    extract: Extractor<T>,
}

/// Column layout of a record type
///
/// # Examples
///
/// ```
/// use xlsx_report::{DeclaredType, RecordSchema};
///
/// struct Article {
///     id: u32,
///     name: String,
///     price: Option<f64>,
/// }
///
/// let schema = RecordSchema::new()
///     .field("Id", DeclaredType::U32, |a: &Article| a.id)
///     .field("Name", DeclaredType::String, |a: &Article| a.name.clone())
///     .field("_unit_price", DeclaredType::F64, |a: &Article| a.price);
///
/// let table = schema.to_table("", &[Article { id: 1, name: "Ball".into(), price: None }]);
/// assert_eq!(table.rows[0], vec!["1", "Ball", ""]);
/// ```
pub struct RecordSchema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Default for RecordSchema<T> {
    fn default() -> Self {
        RecordSchema { fields: Vec::new() }
    }
}

impl<T> RecordSchema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column whose value is taken from each record by `extract`
    pub fn field<F, V>(mut self, name: impl Into<String>, declared: DeclaredType, extract: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: ToCellText,
    {
        self.fields.push(Field {
            column: Column::new(name, declared),
            extract: Box::new(move |record| extract(record).to_cell_text()),
        });
        self
    }

    /// Column declarations in field order
    pub fn columns(&self) -> Vec<Column> {
        self.fields.iter().map(|f| f.column.clone()).collect()
    }

    /// Raw values of one record
    pub fn row(&self, record: &T) -> Vec<String> {
        self.fields.iter().map(|f| (f.extract)(record)).collect()
    }

    /// Lazily map records to rows
    pub fn rows<'a, I>(&'a self, records: I) -> impl Iterator<Item = Vec<String>> + 'a
    where
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: 'a,
        T: 'a,
    {
        records.into_iter().map(move |record| self.row(record))
    }

    /// Copy records into a table
    pub fn to_table(&self, name: impl Into<String>, records: &[T]) -> DataTable {
        DataTable {
            name: name.into(),
            columns: self.columns(),
            rows: self.rows(records).collect(),
        }
    }
}
