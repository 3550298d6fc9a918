//! `Schedule` — ordered pending events over a host-owned tick counter.
//!
//! # Ordering
//!
//! Events live in a `BTreeMap` keyed by `(Tick, EventId)`.  Ids only ever
//! increase within a schedule, so events sharing a tick run in creation order
//! and the first entry is always the next event to execute.
//!
//! # Anchoring
//!
//! An anchored schedule maps ticks to calendar time:
//!
//! ```text
//! time(tick) = base + tick * scale   (in the anchor unit)
//! tick(time) = base.difference(unit, time) / scale
//! ```
//!
//! Calendar-time `When`s and calendar-unit repeats are only accepted once the
//! schedule is anchored.
//!
//! # Run loop
//!
//! ```text
//! while first event tick <= bound:
//!     advance host counter to event tick (never backward)
//!     invoke action per resolved target, polling host.stopping()
//!     remove event; re-insert at next tick if repeating
//! advance host counter to bound
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use tc_core::{CalendarTime, CalendarValue, EventId, PeriodUnit, Tick, TickSource, TimeError};
use tracing::{debug, trace, warn};

use crate::event::{Action, RepeatSpec};
use crate::{Event, Repeat, ScheduleError, ScheduleResult, SchedulerHost, Target, Until, When};

/// Calendar binding of a schedule.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Anchor {
    base:  CalendarValue,
    unit:  PeriodUnit,
    scale: f64,
}

impl Anchor {
    fn time_at(&self, ticks: f64) -> ScheduleResult<CalendarValue> {
        Ok(self.base.plus(self.unit, ticks * self.scale)?)
    }

    fn tick_of(&self, value: CalendarValue) -> ScheduleResult<f64> {
        Ok(self.base.difference(self.unit, value)? / self.scale)
    }
}

/// Outcome of one [`Schedule::run`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Events removed from the queue and executed (fully or partially).
    pub executed:    usize,
    /// Individual action invocations across all targets.
    pub invocations: usize,
    /// `true` if the host's cancellation signal ended the run early.
    pub cancelled:   bool,
}

/// A discrete-event schedule for host entities of type `E`.
pub struct Schedule<E> {
    queue:   BTreeMap<(Tick, EventId), Event<E>>,
    next_id: EventId,
    anchor:  Option<Anchor>,
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Schedule {
            queue:   BTreeMap::new(),
            next_id: EventId(0),
            anchor:  None,
        }
    }
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Anchoring ─────────────────────────────────────────────────────────

    /// Bind tick 0 to the current value of `base`, with each tick worth
    /// `tick_amount` of `unit`.  Replaces any previous anchor.
    pub fn anchor(&mut self, base: &CalendarTime, tick_amount: f64, unit: PeriodUnit) -> ScheduleResult<()> {
        if unit == PeriodUnit::DayOfWeek {
            return Err(TimeError::UnsupportedUnit { unit, operation: "anchoring" }.into());
        }
        if !tick_amount.is_finite() || tick_amount <= 0.0 {
            return Err(TimeError::InvalidAnchor(format!(
                "tick amount must be a positive number, got {tick_amount}"
            ))
            .into());
        }
        let base = base.value()?;
        debug!(base = %base, unit = %unit, tick_amount, "anchoring schedule");
        self.anchor = Some(Anchor { base, unit, scale: tick_amount });
        Ok(())
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    fn anchored(&self, what: &'static str) -> ScheduleResult<&Anchor> {
        self.anchor.as_ref().ok_or(ScheduleError::NotAnchored(what))
    }

    /// The tick at which `time` occurs under the anchor.  May be fractional
    /// or negative.
    pub fn time_to_tick(&self, time: &CalendarTime) -> ScheduleResult<f64> {
        let anchor = self.anchored("converting a calendar time to a tick")?;
        anchor.tick_of(time.value()?)
    }

    /// The calendar time of an arbitrary tick.
    pub fn time_at(&self, ticks: f64) -> ScheduleResult<CalendarTime> {
        let anchor = self.anchored("converting a tick to a calendar time")?;
        Ok(CalendarTime::from(anchor.time_at(ticks)?))
    }

    /// The calendar time of the host's current tick.
    pub fn current_time<C: TickSource + ?Sized>(&self, clock: &C) -> ScheduleResult<CalendarTime> {
        self.time_at(clock.ticks().0)
    }

    // ── Adding events ─────────────────────────────────────────────────────

    /// Schedule `action` to run for `target` at `when`, optionally
    /// repeating.
    ///
    /// All validation happens before the queue is touched: a failed call
    /// leaves the schedule unchanged.
    pub fn add_event<C, F>(
        &mut self,
        clock:  &C,
        target: Target<E>,
        when:   When,
        repeat: Option<Repeat>,
        action: F,
    ) -> ScheduleResult<EventId>
    where
        C: TickSource + ?Sized,
        F: FnMut(Option<&E>) + 'static,
    {
        let tick = match &when {
            When::Tick(t) => *t,
            When::Time(time) => self
                .anchored("scheduling an event at a calendar time")?
                .tick_of(time.value()?)?,
        };
        if !tick.is_finite() {
            return Err(ScheduleError::InvalidTick(tick));
        }
        let now = clock.ticks();
        if Tick(tick) < now {
            return Err(ScheduleError::PastTick { tick, now: now.0 });
        }
        let repeat = repeat.map(|r| self.resolve_repeat(r)).transpose()?;

        let id = self.next_id;
        self.next_id = id.next();
        let event = Event {
            id,
            tick: Tick(tick),
            target,
            action: Box::new(action) as Action<E>,
            repeat,
        };
        debug!(id = %id, tick, repeat = ?event.repeat, "scheduling event");
        self.queue.insert((event.tick, id), event);
        Ok(id)
    }

    /// One-shot event.
    pub fn add<C, F>(&mut self, clock: &C, target: Target<E>, when: impl Into<When>, action: F) -> ScheduleResult<EventId>
    where
        C: TickSource + ?Sized,
        F: FnMut(Option<&E>) + 'static,
    {
        self.add_event(clock, target, when.into(), None, action)
    }

    /// Event repeating every `interval` ticks.
    pub fn add_repeating<C, F>(
        &mut self,
        clock:    &C,
        target:   Target<E>,
        when:     impl Into<When>,
        interval: f64,
        action:   F,
    ) -> ScheduleResult<EventId>
    where
        C: TickSource + ?Sized,
        F: FnMut(Option<&E>) + 'static,
    {
        self.add_event(clock, target, when.into(), Some(Repeat::Ticks(interval)), action)
    }

    /// Event repeating every `amount` calendar units.
    pub fn add_repeating_every<C, F>(
        &mut self,
        clock:  &C,
        target: Target<E>,
        when:   impl Into<When>,
        amount: f64,
        unit:   PeriodUnit,
        action: F,
    ) -> ScheduleResult<EventId>
    where
        C: TickSource + ?Sized,
        F: FnMut(Option<&E>) + 'static,
    {
        self.add_event(clock, target, when.into(), Some(Repeat::every(amount, unit)), action)
    }

    fn resolve_repeat(&self, repeat: Repeat) -> ScheduleResult<RepeatSpec> {
        match repeat {
            Repeat::Ticks(dt) => {
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(ScheduleError::InvalidRepeat(dt));
                }
                Ok(RepeatSpec::Interval(dt))
            }
            Repeat::Every { amount, unit } => {
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(ScheduleError::InvalidRepeat(amount));
                }
                let anchor = self.anchored("repeating by a calendar period")?;
                // The step must move the tick forward from the anchor base;
                // 0.4 months or one month on a yearly anchor does not.
                let dt = anchor.tick_of(anchor.base.plus(unit, amount)?)?;
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(ScheduleError::InvalidRepeat(dt));
                }
                if unit.is_calendar() {
                    return Ok(RepeatSpec::Calendar { amount, unit });
                }
                debug!(from = %unit, to = %anchor.unit, interval = dt, "resolved repeat interval");
                Ok(RepeatSpec::Interval(dt))
            }
        }
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Execute due events in `(tick, id)` order, advancing the host counter,
    /// until the queue is empty, the next event lies beyond `until`, or the
    /// host signals cancellation.
    ///
    /// With a finite bound and no cancellation the counter finishes exactly
    /// at the bound if it was not already past it.
    pub fn run<H: SchedulerHost>(&mut self, host: &mut H, until: impl Into<Until>) -> ScheduleResult<RunReport> {
        let bound = match until.into() {
            Until::Unbounded => None,
            Until::Tick(t) => Some(t),
            Until::Time(time) => Some(self.time_to_tick(&time)?),
        };
        if let Some(b) = bound.filter(|b| b.is_nan()) {
            return Err(ScheduleError::InvalidTick(b));
        }

        let mut report = RunReport::default();
        if host.stopping() {
            report.cancelled = true;
            return Ok(report);
        }
        while let Some(mut entry) = self.queue.first_entry() {
            if bound.is_some_and(|b| entry.key().0.0 > b) {
                break;
            }
            let tick = entry.key().0;
            let now = host.ticks();
            if tick > now {
                host.advance(tick.since(now));
            }
            debug!(id = %entry.key().1, tick = tick.0, "executing event");

            let completed = fire(entry.get_mut(), host, &mut report.invocations);
            let event = entry.remove();
            report.executed += 1;
            self.reschedule(event)?;

            if !completed {
                warn!(tick = tick.0, executed = report.executed, "run cancelled by host");
                report.cancelled = true;
                return Ok(report);
            }
        }

        if let Some(b) = bound {
            let now = host.ticks();
            if b.is_finite() && b > now.0 {
                host.advance(b - now.0);
            }
        }
        Ok(report)
    }

    fn reschedule(&mut self, mut event: Event<E>) -> ScheduleResult<()> {
        let next = match event.repeat {
            None => return Ok(()),
            Some(RepeatSpec::Interval(dt)) => event.tick + dt,
            Some(RepeatSpec::Calendar { amount, unit }) => {
                let anchor = self.anchored("repeating by a calendar period")?;
                let current = anchor.time_at(event.tick.0)?;
                let delta = current.difference(anchor.unit, current.plus(unit, amount)?)?;
                event.tick + delta / anchor.scale
            }
        };
        if !next.is_finite() || next <= event.tick {
            warn!(id = %event.id, tick = event.tick.0, next = next.0, "repeat does not advance; dropping");
            return Ok(());
        }
        event.tick = next;
        let key = (event.tick, event.id);
        if self.queue.contains_key(&key) {
            warn!(id = %event.id, tick = next.0, "rescheduled event already queued; dropping");
            return Ok(());
        }
        debug!(id = %event.id, tick = next.0, "rescheduled event");
        self.queue.insert(key, event);
        Ok(())
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Number of pending events.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Tick of the next pending event.
    pub fn next_tick(&self) -> Option<Tick> {
        self.queue.keys().next().map(|&(tick, _)| tick)
    }

    /// Pending events in execution order.
    pub fn events(&self) -> impl Iterator<Item = &Event<E>> {
        self.queue.values()
    }

    /// Drop every pending event.  The anchor and id counter are kept.
    pub fn clear(&mut self) {
        debug!(dropped = self.queue.len(), "clearing schedule");
        self.queue.clear();
    }
}

impl<E: fmt::Debug> Schedule<E> {
    /// One line per pending event, in execution order.
    pub fn dump(&self) -> String {
        let mut out = String::from("[\n");
        for event in self.queue.values() {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "  {event}");
        }
        out.push(']');
        out
    }
}

impl<E: fmt::Debug> fmt::Debug for Schedule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("anchor", &self.anchor)
            .field("next_id", &self.next_id)
            .field("events", &self.queue.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Invoke the event's action once per resolved target member.  Returns
/// `false` if the host asked to stop.
fn fire<E, H: SchedulerHost>(event: &mut Event<E>, host: &mut H, invocations: &mut usize) -> bool {
    let Event { id, target, action, .. } = event;
    match target {
        Target::Observer => {
            if host.stopping() {
                return false;
            }
            trace!(id = %id, "invoking observer action");
            action(None);
            *invocations += 1;
        }
        Target::Entity(entity) => {
            if host.stopping() {
                return false;
            }
            trace!(id = %id, "invoking entity action");
            action(Some(&*entity));
            *invocations += 1;
        }
        Target::Entities { members, shuffled } => {
            let mut order: Vec<usize> = (0..members.len()).collect();
            if *shuffled {
                host.shuffle(&mut order);
            }
            for i in order {
                if host.stopping() {
                    return false;
                }
                trace!(id = %id, member = i, "invoking member action");
                action(Some(&members[i]));
                *invocations += 1;
            }
        }
    }
    !host.stopping()
}
