//! Scheduled events and the request types used to create and run them.

use std::fmt;

use tc_core::{CalendarTime, EventId, PeriodUnit, Tick};

use crate::Target;

/// A zero-argument host action, invoked once per resolved target member.
pub type Action<E> = Box<dyn FnMut(Option<&E>)>;

// ── Requests ──────────────────────────────────────────────────────────────────

/// When an event should first run.
#[derive(Clone, Debug)]
pub enum When {
    /// A raw host tick.
    Tick(f64),
    /// A calendar instant, converted through the schedule's anchor.
    Time(CalendarTime),
}

impl From<f64> for When {
    fn from(tick: f64) -> Self {
        When::Tick(tick)
    }
}

impl From<Tick> for When {
    fn from(tick: Tick) -> Self {
        When::Tick(tick.0)
    }
}

impl From<CalendarTime> for When {
    fn from(time: CalendarTime) -> Self {
        When::Time(time)
    }
}

/// How often an event repeats.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Repeat {
    /// Every `n` host ticks.
    Ticks(f64),
    /// Every `amount` calendar units.  Requires an anchored schedule.
    Every { amount: f64, unit: PeriodUnit },
}

impl Repeat {
    pub fn every(amount: f64, unit: PeriodUnit) -> Self {
        Repeat::Every { amount, unit }
    }
}

/// The stopping bound for a run.
#[derive(Clone, Debug, Default)]
pub enum Until {
    /// Run until the schedule is empty.
    #[default]
    Unbounded,
    /// Run every event at or before this tick.
    Tick(f64),
    /// Run every event at or before this calendar instant.  Requires an
    /// anchored schedule.
    Time(CalendarTime),
}

impl From<f64> for Until {
    fn from(tick: f64) -> Self {
        Until::Tick(tick)
    }
}

impl From<CalendarTime> for Until {
    fn from(time: CalendarTime) -> Self {
        Until::Time(time)
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// A repeat request after validation against the schedule's anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RepeatSpec {
    /// Raw tick interval.  Sub-month calendar repeats are resolved to this
    /// once, when the event is added.
    Interval(f64),
    /// Month or year repeats, recomputed from the current calendar time on
    /// every reschedule.
    Calendar { amount: f64, unit: PeriodUnit },
}

/// A pending action in a schedule.
pub struct Event<E> {
    pub(crate) id:     EventId,
    pub(crate) tick:   Tick,
    pub(crate) target: Target<E>,
    pub(crate) action: Action<E>,
    pub(crate) repeat: Option<RepeatSpec>,
}

impl<E> Event<E> {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn target(&self) -> &Target<E> {
        &self.target
    }

    pub fn repeats(&self) -> bool {
        self.repeat.is_some()
    }
}

impl<E: fmt::Debug> fmt::Debug for Event<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("tick", &self.tick)
            .field("target", &self.target)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

impl<E: fmt::Debug> fmt::Display for Event<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t", self.tick.0, self.id)?;
        match &self.target {
            Target::Observer => f.write_str("observer")?,
            Target::Entity(e) => write!(f, "{e:?}")?,
            Target::Entities { members, shuffled } => {
                let names: Vec<String> = members.iter().map(|m| format!("{m:?}")).collect();
                f.write_str(&names.join(";"))?;
                if *shuffled {
                    f.write_str(" (shuffled)")?;
                }
            }
        }
        match self.repeat {
            None => Ok(()),
            Some(RepeatSpec::Interval(dt)) => write!(f, "\tevery {dt} ticks"),
            Some(RepeatSpec::Calendar { amount, unit }) => write!(f, "\tevery {amount} {unit}"),
        }
    }
}
