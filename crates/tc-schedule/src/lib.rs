//! `tc-schedule` — discrete-event scheduling over a host tick counter.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`schedule`]  | `Schedule` (`BTreeMap<(Tick, EventId), Event>`), `RunReport` |
//! | [`event`]     | `Event`, `Action`, `When`, `Repeat`, `Until`                |
//! | [`target`]    | `Target` (observer / entity / entity set)                   |
//! | [`host`]      | `SchedulerHost` trait, `SimHost`, `CancelFlag`              |
//! | [`config`]    | `ScheduleConfig`, `AnchorConfig`                            |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                        |
//!
//! # Execution model (summary)
//!
//! The schedule owns no clock.  Adding an event reads the host's current tick
//! (through [`tc_core::TickSource`]) to reject past ticks; running advances
//! the host's counter (through [`SchedulerHost`]) to each event's tick before
//! invoking its action, and finally to the run bound.
//!
//! ```rust,ignore
//! let (mut schedule, mut host) = ScheduleConfig::default().build::<u32>()?;
//! schedule.add(&host, Target::Observer, 5.0, |_| println!("tick 5"))?;
//! schedule.run(&mut host, 10.0)?;
//! assert_eq!(host.counter.get(), 10.0);
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod schedule;
pub mod target;


pub use config::{AnchorConfig, ScheduleConfig};
pub use error::{ScheduleError, ScheduleResult};
pub use event::{Action, Event, Repeat, Until, When};
pub use host::{CancelFlag, SchedulerHost, SimHost};
pub use schedule::{RunReport, Schedule};
pub use target::Target;
