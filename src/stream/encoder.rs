//! Raw value -> typed cell conversion
//!
//! The encoder is a pure function of the raw text, the column category and
//! the cell position. Numbers and dates are parsed the same way on every
//! host: `.` is the only decimal separator and month names are English.

use super::styles::{NamedStyle, StyleTable};
use crate::column::ColumnCategory;
use crate::types::{Cell, CellType, CellValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use std::borrow::Cow;

const MILLIS_PER_DAY: i64 = 86_400_000;
/// Serial number of 1970-01-01 (serial 0 is 1899-12-30)
const UNIX_EPOCH_SERIAL_DAYS: i64 = 25_569;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y"];

/// Position of a cell: zero-based column, one-based row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub col: u32,
    pub row: u32,
}

impl Position {
    pub fn new(col: u32, row: u32) -> Self {
        Position { col, row }
    }
}

/// Settings the encoder needs besides the style table
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions<'a> {
    /// Display text of hyperlink cells
    pub hyperlink_label: &'a str,
}

/// Outcome of encoding one raw value
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    /// Value encoded according to its column category
    Cell(Cell),
    /// Date that did not parse, written as text instead
    Fallback(Cell),
    /// Number that did not parse; no cell is written for this position
    Skipped,
}

impl Encoded {
    /// The cell to write, if any
    pub fn cell(&self) -> Option<&Cell> {
        match self {
            Encoded::Cell(cell) | Encoded::Fallback(cell) => Some(cell),
            Encoded::Skipped => None,
        }
    }
}

/// Encode one raw value of a data row
pub fn encode(
    raw: &str,
    category: ColumnCategory,
    position: Position,
    styles: &StyleTable,
    options: &EncodeOptions<'_>,
) -> Encoded {
    let value = strip_control_chars(raw);

    match category {
        ColumnCategory::Integer | ColumnCategory::Float => match parse_number(&value) {
            Some(number) => {
                let style = if category == ColumnCategory::Float {
                    NamedStyle::DecimalNumber
                } else {
                    NamedStyle::IntegerNumber
                };
                Encoded::Cell(number_cell(position, number, styles.index_of(style)))
            }
            None => Encoded::Skipped,
        },
        ColumnCategory::Date => match parse_date_time(&value) {
            Some(dt) => {
                let style = if is_midnight(&dt) {
                    NamedStyle::DateOnly
                } else {
                    NamedStyle::DateTime
                };
                Encoded::Cell(number_cell(position, to_serial(&dt), styles.index_of(style)))
            }
            None => Encoded::Fallback(text_cell(
                position,
                value.into_owned(),
                styles.index_of(NamedStyle::Default),
            )),
        },
        ColumnCategory::Uri => Encoded::Cell(Cell {
            col: position.col,
            row: position.row,
            value: CellValue::Formula(hyperlink_formula(&value, options.hyperlink_label)),
            cell_type: CellType::InlineString,
            style: styles.index_of(NamedStyle::Hyperlink),
        }),
        ColumnCategory::Text => Encoded::Cell(text_cell(
            position,
            value.into_owned(),
            styles.index_of(NamedStyle::Default),
        )),
    }
}

/// Encode a header label (always row 1, header style)
pub fn encode_header(label: &str, col: u32, styles: &StyleTable) -> Cell {
    text_cell(
        Position::new(col, 1),
        strip_control_chars(label).into_owned(),
        styles.index_of(NamedStyle::Header),
    )
}

fn number_cell(position: Position, number: f64, style: u32) -> Cell {
    Cell {
        col: position.col,
        row: position.row,
        value: CellValue::Number(number),
        cell_type: CellType::Number,
        style,
    }
}

fn text_cell(position: Position, text: String, style: u32) -> Cell {
    Cell {
        col: position.col,
        row: position.row,
        value: CellValue::String(text),
        cell_type: CellType::String,
        style,
    }
}

/// Characters that are not allowed in XML 1.0 text
fn is_forbidden_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}')
}

/// Remove U+0000-U+0008, U+000B, U+000C and U+000E-U+001F
pub fn strip_control_chars(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_forbidden_control) {
        Cow::Owned(text.chars().filter(|c| !is_forbidden_control(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Parse a number written with `.` as decimal separator.
///
/// Surrounding whitespace, a sign, an exponent and `,` group separators in
/// the integer part are accepted. Non-finite results count as failures since
/// number cells cannot hold them.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let normalized: Cow<'_, str> = if text.contains(',') {
        let digits = text.trim_start_matches(['+', '-']);
        let int_end = text.find(['.', 'e', 'E']).unwrap_or(text.len());
        if digits.starts_with(',') || text[int_end..].contains(',') || text.contains(",,") {
            return None;
        }
        Cow::Owned(text.replace(',', ""))
    } else {
        Cow::Borrowed(text)
    };

    let value: f64 = normalized.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a date or date-time in one of the accepted invariant layouts.
///
/// Values carrying a UTC offset keep their wall-clock time.
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0
}

/// Serial day number: days since 1899-12-30, time of day as the fraction.
///
/// Before the epoch the integer part counts backwards while the fraction
/// still counts forward from midnight (-1.25 is 1899-12-29 06:00), matching
/// OLE automation dates.
pub fn to_serial(dt: &NaiveDateTime) -> f64 {
    let mut millis = dt.and_utc().timestamp_millis() + UNIX_EPOCH_SERIAL_DAYS * MILLIS_PER_DAY;
    if millis < 0 {
        let frac = millis % MILLIS_PER_DAY;
        if frac != 0 {
            millis -= (MILLIS_PER_DAY + frac) * 2;
        }
    }
    millis as f64 / MILLIS_PER_DAY as f64
}

/// `HYPERLINK("<target>", "<label>")` with quotes doubled
pub fn hyperlink_formula(target: &str, label: &str) -> String {
    format!(
        "HYPERLINK(\"{}\", \"{}\")",
        target.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}
