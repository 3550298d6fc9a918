use tc_core::TimeError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("attempted to schedule an event for tick {tick} which is before the present moment of {now}")]
    PastTick { tick: f64, now: f64 },

    #[error("{0} requires the schedule to be anchored to a calendar time")]
    NotAnchored(&'static str),

    #[error("the repeat interval must be a positive number, got {0}")]
    InvalidRepeat(f64),

    #[error("tick must be a finite number, got {0}")]
    InvalidTick(f64),

    #[error("schedule configuration error: {0}")]
    Config(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
