//! `TimeSeries` — a column table keyed by calendar time.
//!
//! # Storage
//!
//! ```text
//! keys:    BTreeMap<CalendarValue, RowId>   (ordered, unique)
//! columns: Vec<Column>                      (declaration order)
//! ```
//!
//! Every column holds exactly one value per row, so a `RowId` indexes all
//! columns at once.  Re-adding an existing key overwrites that row in place.
//! The first row fixes the series' variant; rows and queries of any other
//! variant are rejected.
//!
//! # Lookup modes
//!
//! | Mode           | Key present | Key absent, both neighbours | One neighbour |
//! |----------------|-------------|-----------------------------|---------------|
//! | `Exact`        | row value   | `NotFound`                  | `NotFound`    |
//! | `Nearest`      | row value   | closer neighbour (tie → later) | that neighbour |
//! | `LinearInterp` | row value   | interpolated by millis      | `OutOfRange`  |

use std::collections::BTreeMap;
use std::ops::Bound;
use std::str::FromStr;

use tc_core::{CalendarTime, CalendarValue, PeriodUnit, RowId, TimeError, Variant};

use crate::{Column, SeriesError, SeriesResult, Value};

/// How [`TimeSeries::get`] resolves a time that is not a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LookupMode {
    Exact,
    Nearest,
    LinearInterp,
}

impl FromStr for LookupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(LookupMode::Exact),
            "NEAREST" => Ok(LookupMode::Nearest),
            "LINEAR_INTERP" | "LINEAR-INTERP" | "LINEAR" => Ok(LookupMode::LinearInterp),
            other => Err(format!("unknown lookup mode '{other}'")),
        }
    }
}

/// Which values [`TimeSeries::get_range`] returns for each key in range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeSelect {
    /// One named column.
    Column(String),
    /// Every column, in declaration order.
    All,
    /// Keys only; each row's `values` is empty.
    Keys,
}

impl RangeSelect {
    pub fn column(name: impl Into<String>) -> Self {
        RangeSelect::Column(name.into())
    }
}

/// A key with the selected values.
#[derive(Clone, Debug)]
pub struct Row {
    pub time:   CalendarTime,
    pub values: Vec<Value>,
}

/// Where a query time falls among the keys.
enum Located {
    Exact(RowId),
    Between {
        lower:  Option<(CalendarValue, RowId)>,
        higher: Option<(CalendarValue, RowId)>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct TimeSeries {
    keys:    BTreeMap<CalendarValue, RowId>,
    columns: Vec<Column>,
    variant: Option<Variant>,
}

impl TimeSeries {
    /// An empty series with the given columns.
    pub fn new<I, S>(names: I) -> SeriesResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<Column> = Vec::new();
        for name in names {
            let name = name.into();
            if columns.iter().any(|c| c.name() == name) {
                return Err(SeriesError::DuplicateColumn(name));
            }
            columns.push(Column::new(name));
        }
        Ok(TimeSeries {
            keys: BTreeMap::new(),
            columns,
            variant: None,
        })
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    /// Number of rows (distinct keys).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub(crate) fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Variant of the keys, fixed by the first row.
    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    /// Keys in ascending order.
    pub fn times(&self) -> impl Iterator<Item = CalendarTime> + '_ {
        self.keys.keys().map(|&k| CalendarTime::from(k))
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&CalendarValue, &RowId)> {
        self.keys.iter()
    }

    fn column_index(&self, name: &str) -> SeriesResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| SeriesError::UnknownColumn(name.to_owned()))
    }

    fn check_variant(&self, value: &CalendarValue) -> SeriesResult<()> {
        match self.variant {
            Some(v) if v != value.variant() => Err(TimeError::VariantMismatch {
                left:  v,
                right: value.variant(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Add a row, or overwrite the row already stored under `time`.
    ///
    /// Every value is checked against its column before anything is stored,
    /// so a rejected row leaves the series unchanged.
    pub fn add_row(&mut self, time: &CalendarTime, values: Vec<Value>) -> SeriesResult<RowId> {
        let key = time.value()?;
        self.check_variant(&key)?;
        if values.len() != self.columns.len() {
            return Err(SeriesError::ColumnCount {
                expected: self.columns.len(),
                got:      values.len(),
            });
        }
        let coerced = self
            .columns
            .iter()
            .zip(values)
            .map(|(column, value)| column.coerce(value))
            .collect::<SeriesResult<Vec<Value>>>()?;

        if let Some(&row) = self.keys.get(&key) {
            for (column, value) in self.columns.iter_mut().zip(coerced) {
                column.set(row, value);
            }
            return Ok(row);
        }

        let row = RowId::try_from(self.keys.len())
            .map_err(|_| SeriesError::OutOfRange(format!("row {} for {key}", self.keys.len())))?;
        for (column, value) in self.columns.iter_mut().zip(coerced) {
            column.push(value);
        }
        self.keys.insert(key, row);
        self.variant = Some(key.variant());
        Ok(row)
    }

    // ── Point lookups ─────────────────────────────────────────────────────

    fn locate(&self, time: &CalendarTime) -> SeriesResult<(CalendarValue, Located)> {
        let at = time.value()?;
        if self.keys.is_empty() {
            return Err(SeriesError::Empty);
        }
        self.check_variant(&at)?;
        if let Some(&row) = self.keys.get(&at) {
            return Ok((at, Located::Exact(row)));
        }
        let lower = self.keys.range(..at).next_back().map(|(&k, &r)| (k, r));
        let higher = self
            .keys
            .range((Bound::Excluded(at), Bound::Unbounded))
            .next()
            .map(|(&k, &r)| (k, r));
        Ok((at, Located::Between { lower, higher }))
    }

    /// Pick the row `Nearest` resolves to.
    fn nearest(
        at: CalendarValue,
        lower: Option<(CalendarValue, RowId)>,
        higher: Option<(CalendarValue, RowId)>,
    ) -> SeriesResult<(CalendarValue, RowId)> {
        match (lower, higher) {
            (Some(lo), Some(hi)) => {
                let here = CalendarTime::from(at);
                let lower_wins =
                    here.is_closer_to_a_than_b(&CalendarTime::from(lo.0), &CalendarTime::from(hi.0))?;
                Ok(if lower_wins { lo } else { hi })
            }
            (Some(only), None) | (None, Some(only)) => Ok(only),
            (None, None) => Err(SeriesError::Empty),
        }
    }

    fn interpolate(
        column: &Column,
        at: CalendarValue,
        (lo, lo_row): (CalendarValue, RowId),
        (hi, hi_row): (CalendarValue, RowId),
    ) -> SeriesResult<f64> {
        let not_numeric = || SeriesError::NotNumeric(column.name().to_owned());
        let low = column.number(lo_row).ok_or_else(not_numeric)?;
        let high = column.number(hi_row).ok_or_else(not_numeric)?;
        let fraction = lo.difference(PeriodUnit::Milli, at)? / lo.difference(PeriodUnit::Milli, hi)?;
        Ok(low + (high - low) * fraction)
    }

    /// The value of `column` at `time`.
    pub fn get(&self, time: &CalendarTime, column: &str, mode: LookupMode) -> SeriesResult<Value> {
        let index = self.column_index(column)?;
        let col = &self.columns[index];
        let missing = || SeriesError::NotFound(time.to_string());

        let (at, located) = self.locate(time)?;
        let (lower, higher) = match located {
            Located::Exact(row) => return col.get(row).ok_or_else(missing),
            Located::Between { lower, higher } => (lower, higher),
        };
        match mode {
            LookupMode::Exact => Err(missing()),
            LookupMode::Nearest => {
                let (_, row) = Self::nearest(at, lower, higher)?;
                col.get(row).ok_or_else(missing)
            }
            LookupMode::LinearInterp => {
                if !col.is_numeric() {
                    return Err(SeriesError::NotNumeric(column.to_owned()));
                }
                match (lower, higher) {
                    (Some(lo), Some(hi)) => Ok(Value::Number(Self::interpolate(col, at, lo, hi)?)),
                    _ => Err(SeriesError::OutOfRange(time.to_string())),
                }
            }
        }
    }

    /// Every column at `time`.  The returned row's `time` is the key that
    /// was used, or the query time itself when interpolating.
    pub fn get_all(&self, time: &CalendarTime, mode: LookupMode) -> SeriesResult<Row> {
        let (at, located) = self.locate(time)?;
        let row_values = |row: RowId| -> SeriesResult<Vec<Value>> {
            self.columns
                .iter()
                .map(|c| c.get(row).ok_or_else(|| SeriesError::NotFound(time.to_string())))
                .collect()
        };
        let (lower, higher) = match located {
            Located::Exact(row) => {
                return Ok(Row { time: CalendarTime::from(at), values: row_values(row)? });
            }
            Located::Between { lower, higher } => (lower, higher),
        };
        match mode {
            LookupMode::Exact => Err(SeriesError::NotFound(time.to_string())),
            LookupMode::Nearest => {
                let (key, row) = Self::nearest(at, lower, higher)?;
                Ok(Row { time: CalendarTime::from(key), values: row_values(row)? })
            }
            LookupMode::LinearInterp => {
                let (Some(lo), Some(hi)) = (lower, higher) else {
                    return Err(SeriesError::OutOfRange(time.to_string()));
                };
                let values = self
                    .columns
                    .iter()
                    .map(|c| Self::interpolate(c, at, lo, hi).map(Value::Number))
                    .collect::<SeriesResult<Vec<Value>>>()?;
                Ok(Row { time: CalendarTime::from(at), values })
            }
        }
    }

    // ── Range lookups ─────────────────────────────────────────────────────

    /// Rows whose keys lie between `low` and `high` inclusive, in key order.
    ///
    /// The bounds may be given in either order and need not be keys
    /// themselves.  No keys in range is an empty result, not an error.
    pub fn get_range(&self, low: &CalendarTime, high: &CalendarTime, select: &RangeSelect) -> SeriesResult<Vec<Row>> {
        let picked: Vec<usize> = match select {
            RangeSelect::Column(name) => vec![self.column_index(name)?],
            RangeSelect::All => (0..self.columns.len()).collect(),
            RangeSelect::Keys => Vec::new(),
        };
        let (mut lo, mut hi) = (low.value()?, high.value()?);
        if lo.variant() != hi.variant() {
            return Err(TimeError::VariantMismatch { left: lo.variant(), right: hi.variant() }.into());
        }
        self.check_variant(&lo)?;
        if hi < lo {
            std::mem::swap(&mut lo, &mut hi);
        }

        self.keys
            .range(lo..=hi)
            .map(|(&key, &row)| {
                let values = picked
                    .iter()
                    .map(|&i| {
                        self.columns[i]
                            .get(row)
                            .ok_or_else(|| SeriesError::NotFound(key.to_string()))
                    })
                    .collect::<SeriesResult<Vec<Value>>>()?;
                Ok(Row { time: CalendarTime::from(key), values })
            })
            .collect()
    }
}
