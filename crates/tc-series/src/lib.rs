//! `tc-series` — time-stamped tabular data keyed by calendar time.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`series`]  | `TimeSeries`, `LookupMode`, `RangeSelect`, `Row`           |
//! | [`column`]  | `Column`, `ColumnKind`, `Value`                            |
//! | [`loader`]  | `load_series`, `load_series_with_format`, `load_series_reader` |
//! | [`writer`]  | `write_series`, `write_series_to`                          |
//! | [`error`]   | `SeriesError`, `SeriesResult<T>`                           |
//!
//! The series is read-only with respect to any schedule; the two only share
//! the [`tc_core::CalendarTime`] type.

pub mod column;
pub mod error;
pub mod loader;
pub mod series;
pub mod writer;


pub use column::{Column, ColumnKind, Value};
pub use error::{SeriesError, SeriesResult};
pub use loader::{load_series, load_series_reader, load_series_with_format};
pub use series::{LookupMode, RangeSelect, Row, TimeSeries};
pub use writer::{write_series, write_series_to};
