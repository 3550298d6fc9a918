//! Named period granularities used for arithmetic, differencing, and anchoring.

use std::fmt;
use std::str::FromStr;

use crate::{TimeError, TimeResult};

pub(crate) const MILLIS_PER_SECOND: f64 = 1_000.0;
pub(crate) const MILLIS_PER_MINUTE: f64 = 60.0 * MILLIS_PER_SECOND;
pub(crate) const MILLIS_PER_HOUR: f64 = 60.0 * MILLIS_PER_MINUTE;
pub(crate) const MILLIS_PER_DAY: f64 = 24.0 * MILLIS_PER_HOUR;
pub(crate) const MILLIS_PER_WEEK: f64 = 7.0 * MILLIS_PER_DAY;

/// A period unit, from millisecond up to year.
///
/// `DayOfYear` behaves like `Day` for arithmetic; `DayOfWeek` only makes
/// sense for field extraction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeriodUnit {
    Milli,
    Second,
    Minute,
    Hour,
    Day,
    DayOfYear,
    DayOfWeek,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    /// Fixed width of one unit in milliseconds, or `None` for the
    /// calendar-period units (`Month`, `Year`) and `DayOfWeek`.
    pub fn fixed_millis(self) -> Option<f64> {
        match self {
            PeriodUnit::Milli => Some(1.0),
            PeriodUnit::Second => Some(MILLIS_PER_SECOND),
            PeriodUnit::Minute => Some(MILLIS_PER_MINUTE),
            PeriodUnit::Hour => Some(MILLIS_PER_HOUR),
            PeriodUnit::Day | PeriodUnit::DayOfYear => Some(MILLIS_PER_DAY),
            PeriodUnit::Week => Some(MILLIS_PER_WEEK),
            PeriodUnit::DayOfWeek | PeriodUnit::Month | PeriodUnit::Year => None,
        }
    }

    /// `true` for units whose length varies with the calendar.
    #[inline]
    pub fn is_calendar(self) -> bool {
        matches!(self, PeriodUnit::Month | PeriodUnit::Year)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Milli => "milli",
            PeriodUnit::Second => "second",
            PeriodUnit::Minute => "minute",
            PeriodUnit::Hour => "hour",
            PeriodUnit::Day => "day",
            PeriodUnit::DayOfYear => "dayofyear",
            PeriodUnit::DayOfWeek => "dayofweek",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = TimeError;

    /// Case-insensitive, tolerates a plural `s`, and accepts the usual aliases
    /// (`dom`, `doy`, `jday`, `dow`, `wday`, ...).
    fn from_str(s: &str) -> TimeResult<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let name = lowered.strip_suffix('s').unwrap_or(&lowered);
        match name {
            "milli" | "millisecond" => Ok(PeriodUnit::Milli),
            "second" => Ok(PeriodUnit::Second),
            "minute" => Ok(PeriodUnit::Minute),
            "hour" => Ok(PeriodUnit::Hour),
            "day" | "dayofmonth" | "dom" => Ok(PeriodUnit::Day),
            "doy" | "dayofyear" | "julianday" | "jday" => Ok(PeriodUnit::DayOfYear),
            "dayofweek" | "dow" | "weekday" | "wday" => Ok(PeriodUnit::DayOfWeek),
            "week" => Ok(PeriodUnit::Week),
            "month" => Ok(PeriodUnit::Month),
            "year" => Ok(PeriodUnit::Year),
            _ => Err(TimeError::UnknownUnit(s.to_owned())),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
