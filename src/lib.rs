//! Tempo - deterministic, parameterized cron matching with per-owner spreading.
//!
//! Tempo decides, for an "extended crontab" specification, whether a given
//! calendar instant should fire and which named parameter values accompany
//! that firing. A hash token (`H`) in any time field resolves to a concrete
//! value derived deterministically from the owner's identity, so many
//! schedules sharing a nominal time (e.g. "every hour") spread their actual
//! firing instants instead of colliding.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Tempo                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver: TimerEngine | ActiveSchedule (atomic snapshots)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Evaluation: ScheduleList | ScheduleLine | ParameterMap     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Parsing: field grammar | hash resolution | parameters      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use tempo::{ScheduleList, TickInstant};
//!
//! # fn main() -> tempo::Result<()> {
//! let schedules = ScheduleList::parse("30 4 * * * TOKEN=abc")?;
//!
//! let line = schedules
//!     .check(&TickInstant::new(30, 4, 15, 6, 1))
//!     .expect("fires at 04:30");
//! assert_eq!(line.params().get("TOKEN"), Some("abc"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod params;
pub mod schedule;
pub mod trigger;
pub mod types;

// Re-exports
pub use error::{Result, TempoError};
pub use params::ParameterMap;
pub use schedule::engine::{ClosureHandler, FireHandler, TimerEngine, TimerEvent};
pub use schedule::{FieldMatcher, FieldPosition, FieldToken, ScheduleLine, ScheduleList, Seed};
pub use trigger::ActiveSchedule;
pub use types::TickInstant;
