//! Framework error type.
//!
//! Sub-crates wrap `TimeError` as one variant of their own error enums via
//! `#[from]`, so calendar failures surface unchanged through the scheduler
//! and the time-series index.

use thiserror::Error;

use crate::{PeriodUnit, Variant};

/// The top-level error type for `tc-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("illegal time string: '{0}'")]
    Parse(String),

    #[error("cannot parse '{text}' with format '{pattern}': {reason}")]
    ParseWithFormat {
        text:    String,
        pattern: String,
        reason:  String,
    },

    #[error("cannot render a {variant} value with pattern '{pattern}'")]
    Format { pattern: String, variant: Variant },

    #[error("time comparisons only work if both values are the same variety, got a {left} and a {right}")]
    VariantMismatch { left: Variant, right: Variant },

    #[error("illegal time period type: '{0}'")]
    UnknownUnit(String),

    #[error("period type {unit} is not supported by {operation}")]
    UnsupportedUnit {
        unit:      PeriodUnit,
        operation: &'static str,
    },

    #[error("period type {unit} is not defined for a {variant} value")]
    UnsupportedField { unit: PeriodUnit, variant: Variant },

    #[error("time arithmetic out of range: {0}")]
    OutOfRange(String),

    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),
}

/// Shorthand result type for all `tc-*` crates.
pub type TimeResult<T> = Result<T, TimeError>;
