//! Typed column storage.
//!
//! A column is untyped until its first value arrives.  A value that parses as
//! a number makes it numeric, anything else makes it text, and the type is
//! fixed from then on.

use std::fmt;

use tc_core::RowId;

use crate::{SeriesError, SeriesResult};

// ── Value ─────────────────────────────────────────────────────────────────────

/// One cell of a time series.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Clone, Debug, PartialEq)]
enum ColumnData {
    Untyped,
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

/// A named column, indexed by [`RowId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Untyped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` until the first value is stored.
    pub fn kind(&self) -> Option<ColumnKind> {
        match self.data {
            ColumnData::Untyped => None,
            ColumnData::Numeric(_) => Some(ColumnKind::Numeric),
            ColumnData::Text(_) => Some(ColumnKind::Text),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == Some(ColumnKind::Numeric)
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Untyped => 0,
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: RowId) -> Option<Value> {
        match &self.data {
            ColumnData::Untyped => None,
            ColumnData::Numeric(v) => v.get(row.index()).copied().map(Value::Number),
            ColumnData::Text(v) => v.get(row.index()).cloned().map(Value::Text),
        }
    }

    pub fn number(&self, row: RowId) -> Option<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row.index()).copied(),
            _ => None,
        }
    }

    /// Convert `value` to this column's type without storing it.
    pub(crate) fn coerce(&self, value: Value) -> SeriesResult<Value> {
        match (&self.data, value) {
            (ColumnData::Text(_), value) => Ok(Value::Text(value.to_string())),
            (_, Value::Number(x)) => Ok(Value::Number(x)),
            (ColumnData::Untyped, Value::Text(s)) => Ok(match s.trim().parse::<f64>() {
                Ok(x) => Value::Number(x),
                Err(_) => Value::Text(s),
            }),
            (ColumnData::Numeric(_), Value::Text(s)) => {
                s.trim().parse::<f64>().map(Value::Number).map_err(|_| SeriesError::ColumnType {
                    column: self.name.clone(),
                    value:  s,
                })
            }
        }
    }

    /// Append a value already passed through [`coerce`](Self::coerce).
    pub(crate) fn push(&mut self, value: Value) {
        match value {
            Value::Number(x) => match &mut self.data {
                ColumnData::Numeric(v) => v.push(x),
                ColumnData::Text(v) => v.push(x.to_string()),
                ColumnData::Untyped => self.data = ColumnData::Numeric(vec![x]),
            },
            Value::Text(s) => match &mut self.data {
                ColumnData::Text(v) => v.push(s),
                // `coerce` never hands text to a numeric column.
                ColumnData::Numeric(v) => v.push(f64::NAN),
                ColumnData::Untyped => self.data = ColumnData::Text(vec![s]),
            },
        }
    }

    /// Overwrite an existing row with a coerced value.
    pub(crate) fn set(&mut self, row: RowId, value: Value) {
        match (&mut self.data, value) {
            (ColumnData::Numeric(v), Value::Number(x)) => {
                if let Some(slot) = v.get_mut(row.index()) {
                    *slot = x;
                }
            }
            (ColumnData::Text(v), value) => {
                if let Some(slot) = v.get_mut(row.index()) {
                    *slot = value.to_string();
                }
            }
            _ => {}
        }
    }
}
