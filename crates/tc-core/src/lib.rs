//! `tc-core` — foundational types for the tick-calendar framework.
//!
//! This crate is a dependency of every other `tc-*` crate.  It has no `tc-*`
//! dependencies and few external ones (`chrono`, `rand`, `thiserror`,
//! `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`calendar`]    | `CalendarTime`, `CalendarValue`, `MonthDay`, `Variant`     |
//! | [`period`]      | `PeriodUnit` and its name aliases                          |
//! | [`time`]        | `Tick`, `TickSource`, `TickClock`, `TickCounter`           |
//! | [`ids`]         | `EventId`, `RowId`                                         |
//! | [`rng`]         | `SimRng` (seeded shuffler)                                 |
//! | [`error`]       | `TimeError`, `TimeResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the plain value types.   |

pub mod calendar;
pub mod error;
pub mod ids;
pub mod period;
pub mod rng;
pub mod time;

mod pattern;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use calendar::{CalendarTime, CalendarValue, MonthDay, Variant};
pub use error::{TimeError, TimeResult};
pub use ids::{EventId, RowId};
pub use period::PeriodUnit;
pub use rng::SimRng;
pub use time::{Tick, TickClock, TickCounter, TickSource};
