// Tabular data materialized from one artifact
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::fmt;

use super::error::RenderError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M%z"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Untyped cell value; delimited text only ever produces `Text`
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Text form used for exact-match filtering and display
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateTime(dt) => Some(dt.date()),
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) if dt.time() == chrono::NaiveTime::MIN => {
                write!(f, "{}", dt.date())
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // Offset-qualified timestamps keep their wall-clock date
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(raw, f).ok())
    {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Rows selected by an exact-match filter, in table order
#[derive(Debug, Clone, PartialEq)]
pub struct Subview<'a> {
    pub column: &'a str,
    pub value: &'a str,
    pub rows: Vec<&'a [Cell]>,
}

impl Subview<'_> {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

impl Table {
    pub fn new(source: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            source: source.into(),
            columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, RenderError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| RenderError::SchemaMismatch {
                artifact: self.source.clone(),
                column: column.to_string(),
            })
    }

    /// Fail on the first expected column the table does not carry
    pub fn require_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<(), RenderError> {
        columns
            .iter()
            .try_for_each(|c| self.column_index(c.as_ref()).map(|_| ()))
    }

    /// Select rows whose `column` equals `value` exactly (case-sensitive)
    pub fn filter_exact<'a>(
        &'a self,
        column: &'a str,
        value: &'a str,
    ) -> Result<Subview<'a>, RenderError> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(idx).is_some_and(|cell| cell.as_text() == value))
            .map(Vec::as_slice)
            .collect();

        Ok(Subview {
            column,
            value,
            rows,
        })
    }

    /// Date held by the first data row; `Ok(None)` for an empty table
    pub fn first_row_date(&self, column: &str) -> Result<Option<NaiveDate>, RenderError> {
        let idx = self.column_index(column)?;
        let Some(row) = self.rows.first() else {
            return Ok(None);
        };
        let date = row.get(idx).and_then(Cell::as_date);
        date.map(Some).ok_or_else(|| {
            let raw = row.get(idx).map(Cell::to_string).unwrap_or_default();
            RenderError::parse_failure(
                self.source.clone(),
                format!("'{}' in column '{}' is not a date", raw, column),
            )
        })
    }
}
