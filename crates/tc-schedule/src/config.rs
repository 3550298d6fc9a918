//! Declarative schedule setup.

use tc_core::{CalendarTime, PeriodUnit, TickCounter};

use crate::{Schedule, ScheduleError, ScheduleResult, SimHost};

/// Calendar anchor given as text, as it would appear in a config file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorConfig {
    /// Calendar time of tick 0, in the lenient parse grammar
    /// (e.g. `"2020-01-01 00:00"`).
    pub start: String,

    /// Amount of `unit` one tick represents.
    pub tick_amount: f64,

    /// Period unit name, e.g. `"hours"` or `"day"`.
    pub unit: String,
}

/// Top-level schedule configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleConfig {
    /// Calendar anchor.  `None` builds an unanchored schedule that only
    /// accepts raw ticks.
    pub anchor: Option<AnchorConfig>,

    /// Initial value of the host tick counter.  Default: 0.
    pub start_tick: f64,

    /// Seed for the shuffler of randomized target sets.  The same seed always
    /// visits shuffled targets in the same order.
    pub seed: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            anchor:     None,
            start_tick: 0.0,
            seed:       0,
        }
    }
}

impl ScheduleConfig {
    /// Validate the config and construct a ready schedule plus a host that
    /// owns a fresh tick counter at `start_tick`.
    pub fn build<E>(&self) -> ScheduleResult<(Schedule<E>, SimHost)> {
        if !self.start_tick.is_finite() || self.start_tick < 0.0 {
            return Err(ScheduleError::Config(format!(
                "start_tick must be a non-negative number, got {}",
                self.start_tick
            )));
        }

        let mut schedule = Schedule::new();
        if let Some(anchor) = &self.anchor {
            let start = CalendarTime::parse(&anchor.start)?;
            let unit: PeriodUnit = anchor.unit.parse()?;
            schedule.anchor(&start, anchor.tick_amount, unit)?;
        }

        let host = SimHost::with_counter(TickCounter::starting_at(self.start_tick), self.seed);
        Ok((schedule, host))
    }
}
