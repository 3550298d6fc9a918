//! Host capabilities the scheduler drives.

use std::cell::Cell;
use std::rc::Rc;

use tc_core::{SimRng, Tick, TickClock, TickCounter, TickSource};

/// Everything [`Schedule::run`][crate::Schedule::run] needs from the host
/// simulation.
///
/// The tick counter comes from the [`TickClock`] supertrait.  `stopping` has
/// a default no-op implementation so hosts without cancellation only need to
/// supply a shuffler.
pub trait SchedulerHost: TickClock {
    /// Polled before every action invocation and after every event.  Once it
    /// answers `true` the run returns without touching later events.
    fn stopping(&self) -> bool {
        false
    }

    /// Permute `order` in place.  Called with the member indices of a
    /// shuffled target set.
    fn shuffle(&mut self, order: &mut [usize]);
}

// ── CancelFlag ────────────────────────────────────────────────────────────────

/// Shared cooperative cancellation signal.
///
/// Clones share one flag, so an action can capture a clone and stop the
/// run that invoked it.  The flag stays raised until cleared.
#[derive(Clone, Default, Debug)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn clear(&self) {
        self.0.set(false);
    }

    pub fn is_raised(&self) -> bool {
        self.0.get()
    }
}

// ── SimHost ───────────────────────────────────────────────────────────────────

/// Stock host: a shared [`TickCounter`], a seeded [`SimRng`] shuffler, and a
/// [`CancelFlag`].
pub struct SimHost {
    pub counter: TickCounter,
    pub rng:     SimRng,
    pub cancel:  CancelFlag,
}

impl SimHost {
    pub fn new(seed: u64) -> Self {
        Self::with_counter(TickCounter::new(), seed)
    }

    /// Drive an existing counter, e.g. one already shared with anchored
    /// calendar values.
    pub fn with_counter(counter: TickCounter, seed: u64) -> Self {
        SimHost {
            counter,
            rng: SimRng::new(seed),
            cancel: CancelFlag::new(),
        }
    }
}

impl TickSource for SimHost {
    fn ticks(&self) -> Tick {
        self.counter.ticks()
    }
}

impl TickClock for SimHost {
    fn advance(&mut self, delta: f64) {
        self.counter.advance(delta);
    }
}

impl SchedulerHost for SimHost {
    fn stopping(&self) -> bool {
        self.cancel.is_raised()
    }

    fn shuffle(&mut self, order: &mut [usize]) {
        self.rng.shuffle(order);
    }
}
