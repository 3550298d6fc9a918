//! Host tick model.
//!
//! # Design
//!
//! The host simulation owns a non-decreasing floating-point tick counter.
//! Nothing in this framework advances it on its own: the scheduler's run loop
//! is the only writer, and anchored calendar values only read it.
//!
//! Two capabilities describe the counter:
//!
//! - [`TickSource`]: read access, enough for anchored `CalendarTime`s.
//! - [`TickClock`]: read access plus "advance by delta", required by the
//!   scheduler.
//!
//! [`TickCounter`] is the stock implementation: a cheaply clonable handle to
//! one shared counter, so a schedule and any number of anchored values can
//! observe the same tick.  It is `!Send`; callers needing concurrency serialize
//! externally.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A logical simulation tick.
///
/// Ordered with `f64::total_cmp` so it can key a `BTreeMap`.  The scheduler
/// rejects non-finite ticks before they are stored.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub f64);

impl Tick {
    /// Ticks elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for Tick {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tick {}

impl PartialOrd for Tick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tick {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: f64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl From<f64> for Tick {
    fn from(t: f64) -> Self {
        Tick(t)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Read access to the host's tick counter.
pub trait TickSource {
    fn ticks(&self) -> Tick;
}

/// A tick counter the scheduler may move forward.
pub trait TickClock: TickSource {
    /// Advance the counter by `delta` ticks.  Callers never pass a negative
    /// delta.
    fn advance(&mut self, delta: f64);
}

// ── TickCounter ───────────────────────────────────────────────────────────────

/// Shared, single-threaded tick counter.
///
/// Clones share the same underlying value.
#[derive(Clone, Default)]
pub struct TickCounter(Rc<Cell<f64>>);

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter starting at `start`.
    pub fn starting_at(start: f64) -> Self {
        TickCounter(Rc::new(Cell::new(start)))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.0.get()
    }
}

impl TickSource for TickCounter {
    #[inline]
    fn ticks(&self) -> Tick {
        Tick(self.0.get())
    }
}

impl TickClock for TickCounter {
    #[inline]
    fn advance(&mut self, delta: f64) {
        self.0.set(self.0.get() + delta);
    }
}

impl fmt::Debug for TickCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TickCounter").field(&self.0.get()).finish()
    }
}

impl fmt::Display for TickCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticks())
    }
}
