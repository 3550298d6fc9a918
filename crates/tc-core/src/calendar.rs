//! Calendar time values and their anchoring to the host tick counter.
//!
//! # Variants
//!
//! A [`CalendarValue`] is exactly one of:
//!
//! | Variant    | Payload                | Default pattern             |
//! |------------|------------------------|-----------------------------|
//! | `DateTime` | `NaiveDateTime` (ms)   | `yyyy-MM-dd HH:mm:ss.SSS`   |
//! | `Date`     | `NaiveDate`            | `yyyy-MM-dd`                |
//! | `MonthDay` | [`MonthDay`]           | `MM-dd`                     |
//!
//! Binary operations (compare, difference, between, distance) require both
//! operands to carry the same variant and fail with
//! [`TimeError::VariantMismatch`] otherwise.  There is no coercion.
//!
//! # Anchoring
//!
//! A [`CalendarTime`] may be anchored to a [`TickSource`]:
//!
//! ```text
//! observed value = anchor_base + (source.ticks() * scale) in anchor_unit
//! ```
//!
//! The observed value is re-derived by [`CalendarTime::value`] on every read
//! and never cached, so an anchored value tracks the host counter without any
//! background work.
//!
//! # Arithmetic
//!
//! Sub-month units convert to a fixed-width duration (week → 7 days → 24 h →
//! 60 min → 60 s → 1000 ms).  `Month` and `Year` are calendar periods that
//! clamp to the last valid day of the target month, so "plus 1 month" and
//! "plus 30 days" are not interchangeable.  Date and month-day values drop
//! any sub-day remainder.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::rc::Rc;
use std::str::FromStr;

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::pattern;
use crate::period::MILLIS_PER_DAY;
use crate::{PeriodUnit, TickSource, TimeError, TimeResult};

/// Leap year used to give month-day values a concrete position.
pub const REFERENCE_YEAR: i32 = 2000;
const DAYS_IN_REFERENCE_YEAR: i64 = 366;

pub const DEFAULT_DATETIME_PATTERN: &str = "yyyy-MM-dd HH:mm:ss.SSS";
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";
pub const DEFAULT_MONTH_DAY_PATTERN: &str = "MM-dd";

const DATETIME_CANONICAL: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_CANONICAL: &str = "%Y-%m-%d";

// ── Variant ───────────────────────────────────────────────────────────────────

/// The shape of a calendar value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    DateTime,
    Date,
    MonthDay,
}

impl Variant {
    pub fn default_pattern(self) -> &'static str {
        match self {
            Variant::DateTime => DEFAULT_DATETIME_PATTERN,
            Variant::Date => DEFAULT_DATE_PATTERN,
            Variant::MonthDay => DEFAULT_MONTH_DAY_PATTERN,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::DateTime => "datetime",
            Variant::Date => "date",
            Variant::MonthDay => "month-day",
        })
    }
}

// ── MonthDay ──────────────────────────────────────────────────────────────────

/// A recurring month and day with no year.
///
/// Stored as a date in [`REFERENCE_YEAR`] so that `02-29` is representable
/// and ordering, distance, and day arithmetic come for free.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthDay(NaiveDate);

impl MonthDay {
    /// `None` if the month/day pair does not exist in a leap year.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(MonthDay)
    }

    /// Project any date onto the reference year.
    fn from_date(date: NaiveDate) -> Option<Self> {
        Self::new(date.month(), date.day())
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// This month-day as a date in the reference year.
    pub fn reference_date(self) -> NaiveDate {
        self.0
    }
}

// ── CalendarValue ─────────────────────────────────────────────────────────────

/// A plain, unanchored calendar value.
///
/// Derived `Ord` compares the variant first; callers that mix variants must
/// go through [`CalendarTime`], which rejects the mismatch instead.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalendarValue {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    MonthDay(MonthDay),
}

impl CalendarValue {
    pub fn variant(&self) -> Variant {
        match self {
            CalendarValue::DateTime(_) => Variant::DateTime,
            CalendarValue::Date(_) => Variant::Date,
            CalendarValue::MonthDay(_) => Variant::MonthDay,
        }
    }

    /// Milliseconds since the Unix epoch, treating the value as UTC.
    /// Dates sit at midnight; month-days sit in the reference year.
    pub fn reference_millis(&self) -> i64 {
        match self {
            CalendarValue::DateTime(dt) => dt.and_utc().timestamp_millis(),
            CalendarValue::Date(d) => midnight(*d).and_utc().timestamp_millis(),
            CalendarValue::MonthDay(md) => midnight(md.0).and_utc().timestamp_millis(),
        }
    }

    /// As a full datetime, for calendar-period decomposition.
    fn as_datetime(&self) -> NaiveDateTime {
        match self {
            CalendarValue::DateTime(dt) => *dt,
            CalendarValue::Date(d) => midnight(*d),
            CalendarValue::MonthDay(md) => midnight(md.0),
        }
    }

    fn date_part(&self) -> NaiveDate {
        match self {
            CalendarValue::DateTime(dt) => dt.date(),
            CalendarValue::Date(d) => *d,
            CalendarValue::MonthDay(md) => md.0,
        }
    }

    /// Add `amount` of `unit`.  See the module docs for the two arithmetic
    /// paths.
    pub fn plus(self, unit: PeriodUnit, amount: f64) -> TimeResult<CalendarValue> {
        match unit {
            PeriodUnit::Month => self.plus_months(round_half_up(amount)),
            PeriodUnit::Year => self.plus_months(round_half_up(amount).saturating_mul(12)),
            _ => {
                let Some(width) = unit.fixed_millis() else {
                    return Err(TimeError::UnsupportedUnit { unit, operation: "plus" });
                };
                self.plus_millis(amount * width)
            }
        }
    }

    fn plus_months(self, months: i64) -> TimeResult<CalendarValue> {
        match self {
            CalendarValue::DateTime(dt) => {
                let date = shift_months(dt.date(), months)?;
                Ok(CalendarValue::DateTime(date.and_time(dt.time())))
            }
            CalendarValue::Date(d) => shift_months(d, months).map(CalendarValue::Date),
            CalendarValue::MonthDay(md) => {
                let shifted = shift_months(md.0, months)?;
                MonthDay::from_date(shifted)
                    .map(CalendarValue::MonthDay)
                    .ok_or_else(|| out_of_range(self, "month shift"))
            }
        }
    }

    fn plus_millis(self, millis: f64) -> TimeResult<CalendarValue> {
        // Fractional tick products land a hair under whole days.
        let millis = millis.round();
        match self {
            CalendarValue::DateTime(dt) => TimeDelta::try_milliseconds(millis as i64)
                .and_then(|delta| dt.checked_add_signed(delta))
                .map(CalendarValue::DateTime)
                .ok_or_else(|| out_of_range(self, "duration")),
            CalendarValue::Date(d) => {
                let days = (millis / MILLIS_PER_DAY) as i64;
                TimeDelta::try_days(days)
                    .and_then(|delta| d.checked_add_signed(delta))
                    .map(CalendarValue::Date)
                    .ok_or_else(|| out_of_range(self, "day shift"))
            }
            CalendarValue::MonthDay(md) => {
                let days = (millis / MILLIS_PER_DAY) as i64;
                let ordinal = (i64::from(md.0.ordinal0()) + days).rem_euclid(DAYS_IN_REFERENCE_YEAR);
                NaiveDate::from_yo_opt(REFERENCE_YEAR, ordinal as u32 + 1)
                    .map(|d| CalendarValue::MonthDay(MonthDay(d)))
                    .ok_or_else(|| out_of_range(self, "day shift"))
            }
        }
    }

    /// Difference from `self` to `end` in `unit` (positive when `end` is
    /// later).  Both values must share a variant.
    pub fn difference(self, unit: PeriodUnit, end: CalendarValue) -> TimeResult<f64> {
        ensure_same_variant(&self, &end)?;
        match unit {
            PeriodUnit::Year => {
                if self.variant() == Variant::MonthDay {
                    return Err(TimeError::UnsupportedUnit {
                        unit,
                        operation: "difference between month-day values",
                    });
                }
                let months = months_between(self.as_datetime(), end.as_datetime())?;
                Ok((months / 12) as f64)
            }
            PeriodUnit::Month => Ok(months_between(self.as_datetime(), end.as_datetime())? as f64),
            _ => {
                let Some(width) = unit.fixed_millis() else {
                    return Err(TimeError::UnsupportedUnit { unit, operation: "difference" });
                };
                let millis = end.reference_millis() - self.reference_millis();
                Ok(millis as f64 / width)
            }
        }
    }

    /// Extract a single field.
    pub fn get(&self, unit: PeriodUnit) -> TimeResult<i32> {
        let unsupported = || TimeError::UnsupportedField { unit, variant: self.variant() };
        let field = match (self, unit) {
            (CalendarValue::DateTime(dt), PeriodUnit::Milli) => dt.nanosecond() / 1_000_000,
            (CalendarValue::DateTime(dt), PeriodUnit::Second) => dt.second(),
            (CalendarValue::DateTime(dt), PeriodUnit::Minute) => dt.minute(),
            (CalendarValue::DateTime(dt), PeriodUnit::Hour) => dt.hour(),
            (_, PeriodUnit::Milli | PeriodUnit::Second | PeriodUnit::Minute | PeriodUnit::Hour) => {
                return Err(unsupported());
            }
            (_, PeriodUnit::Day) => self.date_part().day(),
            (_, PeriodUnit::Month) => self.date_part().month(),
            (CalendarValue::MonthDay(_), _) => return Err(unsupported()),
            (_, PeriodUnit::DayOfYear) => self.date_part().ordinal(),
            (_, PeriodUnit::DayOfWeek) => self.date_part().weekday().number_from_monday(),
            (_, PeriodUnit::Week) => self.date_part().iso_week().week(),
            (_, PeriodUnit::Year) => return Ok(self.date_part().year()),
        };
        Ok(field as i32)
    }

    /// Render with a user pattern.
    pub fn render(&self, pattern: &str) -> TimeResult<String> {
        let format_error = || TimeError::Format {
            pattern: pattern.to_owned(),
            variant: self.variant(),
        };
        let strftime = pattern::to_strftime(pattern).map_err(|_| format_error())?;
        let mut out = String::new();
        let written = match self {
            CalendarValue::DateTime(dt) => write!(out, "{}", dt.format(&strftime)),
            CalendarValue::Date(d) => write!(out, "{}", d.format(&strftime)),
            CalendarValue::MonthDay(md) => write!(out, "{}", md.0.format(&strftime)),
        };
        written.map_err(|_| format_error())?;
        Ok(out)
    }

    pub fn render_default(&self) -> String {
        // The default patterns only use fields every variant carries.
        self.render(self.variant().default_pattern())
            .unwrap_or_else(|_| format!("{self:?}"))
    }
}

impl From<NaiveDateTime> for CalendarValue {
    fn from(dt: NaiveDateTime) -> Self {
        CalendarValue::DateTime(dt)
    }
}

impl From<NaiveDate> for CalendarValue {
    fn from(d: NaiveDate) -> Self {
        CalendarValue::Date(d)
    }
}

impl From<MonthDay> for CalendarValue {
    fn from(md: MonthDay) -> Self {
        CalendarValue::MonthDay(md)
    }
}

impl fmt::Display for CalendarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_default())
    }
}

// ── CalendarTime ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Anchor {
    base:   CalendarValue,
    unit:   PeriodUnit,
    scale:  f64,
    source: Rc<dyn TickSource>,
}

/// A calendar value, optionally anchored to the host tick counter, with an
/// optional display pattern remembered from explicit-format parsing.
#[derive(Clone)]
pub struct CalendarTime {
    value:   CalendarValue,
    pattern: Option<String>,
    anchor:  Option<Anchor>,
}

impl CalendarTime {
    /// The current local instant, truncated to milliseconds.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        let millis_only = now.nanosecond() / 1_000_000 * 1_000_000;
        CalendarTime::from(now.with_nanosecond(millis_only).unwrap_or(now))
    }

    /// Parse with the lenient grammar.
    ///
    /// - `/` and `-` are interchangeable date separators, space and `T`
    ///   interchangeable date/time separators.
    /// - Single-digit month, day, and hour are zero-padded; minutes and
    ///   seconds must have two digits.
    /// - Missing minutes, seconds, or milliseconds default to zero.
    /// - `""` and `"now"` yield the current instant.
    ///
    /// The normalized length picks the variant: `MM-dd` is a month-day,
    /// `yyyy-MM-dd` a date, anything with a time of day a datetime.
    pub fn parse(text: &str) -> TimeResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("now") {
            return Ok(Self::now());
        }
        let illegal = || TimeError::Parse(text.to_owned());
        let normalized = normalize(trimmed).ok_or_else(illegal)?;

        let value = match normalized.len() {
            5 => NaiveDate::parse_from_str(&format!("{REFERENCE_YEAR}-{normalized}"), DATE_CANONICAL)
                .map(|d| CalendarValue::MonthDay(MonthDay(d))),
            10 => NaiveDate::parse_from_str(&normalized, DATE_CANONICAL).map(CalendarValue::Date),
            _ => NaiveDateTime::parse_from_str(&normalized, DATETIME_CANONICAL)
                .map(CalendarValue::DateTime),
        }
        .map_err(|_| illegal())?;

        Ok(CalendarTime::from(value))
    }

    /// Parse with an explicit pattern, bypassing the lenient grammar.
    ///
    /// Hour letters (`H`, `h`, `K`, `k`) make a datetime, year letters
    /// without hours a date, anything else a month-day.  Fields the pattern
    /// omits default to the start of their period: minutes, seconds and
    /// fractions to zero, month and day to 1, a 12-hour clock without `a` to
    /// AM.  The pattern is kept and used by `Display`.
    pub fn parse_with_format(text: &str, pattern: &str) -> TimeResult<Self> {
        let failure = |reason: String| TimeError::ParseWithFormat {
            text:    text.to_owned(),
            pattern: pattern.to_owned(),
            reason,
        };
        let strftime = pattern::to_strftime(pattern).map_err(failure)?;
        let letters = pattern::letters(pattern);
        let variant = pattern::infer_variant(pattern);

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text.trim(), StrftimeItems::new(&strftime))
            .and_then(|()| fill_omitted(&mut parsed, &letters, variant))
            .map_err(|e| failure(e.to_string()))?;

        let value = match variant {
            Variant::DateTime => parsed
                .to_naive_datetime_with_offset(0)
                .map(|dt| CalendarValue::DateTime(truncate_to_millis(dt))),
            Variant::Date => parsed.to_naive_date().map(CalendarValue::Date),
            Variant::MonthDay => parsed.to_naive_date().map(|d| CalendarValue::MonthDay(MonthDay(d))),
        }
        .map_err(|e| failure(e.to_string()))?;

        Ok(CalendarTime {
            value,
            pattern: Some(pattern.to_owned()),
            anchor: None,
        })
    }

    pub fn variant(&self) -> Variant {
        self.value.variant()
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// Materialize the observed value.
    ///
    /// Unanchored values return their stored value.  Anchored values are
    /// recomputed from the anchor base and the source's current tick.
    pub fn value(&self) -> TimeResult<CalendarValue> {
        match &self.anchor {
            None => Ok(self.value),
            Some(anchor) => anchor
                .base
                .plus(anchor.unit, anchor.source.ticks().0 * anchor.scale),
        }
    }

    /// Bind this value to `source`, advancing `tick_amount` units of `unit`
    /// per tick.  The currently observed value becomes the anchor base.
    ///
    /// `DayOfWeek` has no accumulation semantics and is rejected.
    pub fn set_anchor<S>(&mut self, tick_amount: f64, unit: PeriodUnit, source: S) -> TimeResult<()>
    where
        S: TickSource + 'static,
    {
        if unit == PeriodUnit::DayOfWeek {
            return Err(TimeError::UnsupportedUnit { unit, operation: "anchoring" });
        }
        if !tick_amount.is_finite() {
            return Err(TimeError::InvalidAnchor(format!(
                "tick amount must be finite, got {tick_amount}"
            )));
        }
        let base = self.value()?;
        tracing::debug!(base = %base, unit = %unit, tick_amount, "anchoring calendar time");
        self.value = base;
        self.anchor = Some(Anchor {
            base,
            unit,
            scale: tick_amount,
            source: Rc::new(source),
        });
        Ok(())
    }

    /// An unanchored copy holding the currently observed value.
    pub fn snapshot(&self) -> TimeResult<CalendarTime> {
        Ok(CalendarTime {
            value:   self.value()?,
            pattern: self.pattern.clone(),
            anchor:  None,
        })
    }

    /// Render with `pattern`, or with the variant default when `pattern` is
    /// blank.
    pub fn format(&self, pattern: &str) -> TimeResult<String> {
        let value = self.value()?;
        if pattern.trim().is_empty() {
            Ok(value.render_default())
        } else {
            value.render(pattern)
        }
    }

    /// Render with the variant default pattern, ignoring any remembered
    /// parse pattern.
    pub fn format_default(&self) -> TimeResult<String> {
        Ok(self.value()?.render_default())
    }

    pub fn get(&self, unit: PeriodUnit) -> TimeResult<i32> {
        self.value()?.get(unit)
    }

    /// A new, unanchored value `amount` units after this one.
    pub fn plus(&self, unit: PeriodUnit, amount: f64) -> TimeResult<CalendarTime> {
        Ok(CalendarTime::from(self.value()?.plus(unit, amount)?))
    }

    /// Difference from `self` to `other` in `unit`.
    ///
    /// `Year` and `Month` count whole elapsed calendar periods; other units
    /// are the exact millisecond distance scaled to the unit.
    pub fn difference(&self, unit: PeriodUnit, other: &CalendarTime) -> TimeResult<f64> {
        let (a, b) = self.pair(other)?;
        a.difference(unit, b)
    }

    pub fn compare(&self, other: &CalendarTime) -> TimeResult<Ordering> {
        let (a, b) = self.pair(other)?;
        Ok(a.cmp(&b))
    }

    pub fn is_before(&self, other: &CalendarTime) -> TimeResult<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn is_after(&self, other: &CalendarTime) -> TimeResult<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn is_equal(&self, other: &CalendarTime) -> TimeResult<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    /// Inclusive of both bounds; the bounds may be given in either order.
    pub fn is_between(&self, low: &CalendarTime, high: &CalendarTime) -> TimeResult<bool> {
        let (v, lo) = self.pair(low)?;
        let (_, hi) = self.pair(high)?;
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        Ok(lo <= v && v <= hi)
    }

    /// `true` if `self` is strictly closer to `a` than to `b`, by absolute
    /// millisecond distance.  An exact tie answers `false`, i.e. resolves
    /// toward `b`.
    pub fn is_closer_to_a_than_b(&self, a: &CalendarTime, b: &CalendarTime) -> TimeResult<bool> {
        let (v, a) = self.pair(a)?;
        let (_, b) = self.pair(b)?;
        let here = v.reference_millis();
        let to_a = (a.reference_millis() - here).abs();
        let to_b = (b.reference_millis() - here).abs();
        Ok(to_a < to_b)
    }

    fn pair(&self, other: &CalendarTime) -> TimeResult<(CalendarValue, CalendarValue)> {
        let a = self.value()?;
        let b = other.value()?;
        ensure_same_variant(&a, &b)?;
        Ok((a, b))
    }
}

impl From<CalendarValue> for CalendarTime {
    fn from(value: CalendarValue) -> Self {
        CalendarTime {
            value,
            pattern: None,
            anchor: None,
        }
    }
}

impl From<NaiveDateTime> for CalendarTime {
    fn from(dt: NaiveDateTime) -> Self {
        CalendarTime::from(CalendarValue::DateTime(dt))
    }
}

impl From<NaiveDate> for CalendarTime {
    fn from(d: NaiveDate) -> Self {
        CalendarTime::from(CalendarValue::Date(d))
    }
}

impl From<MonthDay> for CalendarTime {
    fn from(md: MonthDay) -> Self {
        CalendarTime::from(CalendarValue::MonthDay(md))
    }
}

impl FromStr for CalendarTime {
    type Err = TimeError;

    fn from_str(s: &str) -> TimeResult<Self> {
        CalendarTime::parse(s)
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value().unwrap_or(self.value);
        let rendered = match &self.pattern {
            Some(pattern) => value.render(pattern).unwrap_or_else(|_| value.render_default()),
            None => value.render_default(),
        };
        f.write_str(&rendered)
    }
}

impl fmt::Debug for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarTime")
            .field("value", &self.value().unwrap_or(self.value))
            .field("pattern", &self.pattern)
            .field("anchored", &self.anchor.is_some())
            .finish()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ensure_same_variant(a: &CalendarValue, b: &CalendarValue) -> TimeResult<()> {
    if a.variant() == b.variant() {
        Ok(())
    } else {
        Err(TimeError::VariantMismatch {
            left:  a.variant(),
            right: b.variant(),
        })
    }
}

/// Default the fields an explicit pattern left out so chrono can resolve a
/// unique value.
fn fill_omitted(parsed: &mut Parsed, letters: &[char], variant: Variant) -> ParseResult<()> {
    let has = |wanted: &[char]| letters.iter().any(|c| wanted.contains(c));
    if variant == Variant::MonthDay {
        parsed.set_year(i64::from(REFERENCE_YEAR))?;
    }
    // Day-of-year and week-date patterns locate the day on their own.
    if !has(&['D', 'w']) {
        if !has(&['M']) {
            parsed.set_month(1)?;
        }
        if !has(&['d']) {
            parsed.set_day(1)?;
        }
    }
    if variant == Variant::DateTime {
        if has(&['h', 'K']) && !has(&['a']) {
            parsed.set_ampm(false)?;
        }
        if !has(&['m']) {
            parsed.set_minute(0)?;
        }
        if !has(&['s']) {
            parsed.set_second(0)?;
        }
        if !has(&['S']) {
            parsed.set_nanosecond(0)?;
        }
    }
    Ok(())
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn truncate_to_millis(dt: NaiveDateTime) -> NaiveDateTime {
    let millis_only = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis_only).unwrap_or(dt)
}

/// `floor(x + 0.5)`: halves round toward positive infinity.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn out_of_range(value: CalendarValue, what: &str) -> TimeError {
    TimeError::OutOfRange(format!("{what} from {value}"))
}

fn shift_months(date: NaiveDate, months: i64) -> TimeResult<NaiveDate> {
    let overflow = || TimeError::OutOfRange(format!("{months} months from {date}"));
    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| overflow())?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or_else(overflow)
}

/// Whole calendar months elapsed from `start` to `end`, truncated toward
/// zero.  Month-end clamping counts as a full month (Jan 31 → Feb 29 is 1).
fn months_between(start: NaiveDateTime, end: NaiveDateTime) -> TimeResult<i64> {
    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    let shifted = |m: i64| -> TimeResult<NaiveDateTime> {
        Ok(shift_months(start.date(), m)?.and_time(start.time()))
    };
    if months > 0 && shifted(months)? > end {
        months -= 1;
    } else if months < 0 && shifted(months)? < end {
        months += 1;
    }
    Ok(months)
}

/// Two-digit zero-padded numeric field; `None` unless 1–2 ASCII digits.
fn pad2(field: &str) -> Option<String> {
    if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{field:0>2}"))
}

fn exactly2(field: &str) -> Option<&str> {
    (field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit())).then_some(field)
}

/// Rewrite lenient input into `MM-dd`, `yyyy-MM-dd`, or
/// `yyyy-MM-ddTHH:mm:ss.SSS`.  Range checks are left to chrono.
fn normalize(text: &str) -> Option<String> {
    let unified = text.replace('/', "-").replace(' ', "T");
    let (date, time) = match unified.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (unified.as_str(), None),
    };

    let parts: Vec<&str> = date.split('-').collect();
    let mut out = match (parts.as_slice(), time) {
        ([month, day], None) => format!("{}-{}", pad2(month)?, pad2(day)?),
        ([year, month, day], _) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{year}-{}-{}", pad2(month)?, pad2(day)?)
        }
        _ => return None,
    };

    if let Some(time) = time {
        let fields: Vec<&str> = time.split(':').collect();
        if fields.len() > 3 {
            return None;
        }
        let hour = pad2(fields[0])?;
        let minute = match fields.get(1) {
            Some(m) => exactly2(m)?,
            None => "00",
        };
        let (second, millis) = match fields.get(2) {
            None => ("00", "000".to_owned()),
            Some(s) => match s.split_once('.') {
                None => (exactly2(s)?, "000".to_owned()),
                Some((sec, frac)) => {
                    if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    (exactly2(sec)?, format!("{frac:0<3}"))
                }
            },
        };
        write!(out, "T{hour}:{minute}:{second}.{millis}").ok()?;
    }
    Some(out)
}
