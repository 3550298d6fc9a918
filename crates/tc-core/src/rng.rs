//! Deterministic simulation-level RNG.
//!
//! The scheduler never draws random numbers itself; randomized target
//! iteration goes through a host-supplied shuffler.  `SimRng` is the stock
//! shuffler: a seeded `SmallRng`, so the same seed always visits targets in
//! the same order.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Simulation-level RNG for shuffling targets.
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Shuffle a mutable slice in place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
