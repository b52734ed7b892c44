//! Extended crontab parsing and evaluation.
//!
//! Supports standard 5-field cron expressions extended with hash tokens
//! and trailing parameter assignments:
//!
//! ```text
//! ┌───────────── minute (0-59)
//! │ ┌───────────── hour (0-23)
//! │ │ ┌───────────── day of month (1-31)
//! │ │ │ ┌───────────── month (1-12)
//! │ │ │ │ ┌───────────── day of week (0-7, 0 and 7 = Sunday)
//! │ │ │ │ │
//! H H(0-7) * * *  TOKEN=abc ENV="prod east"
//! ```
//!
//! `H` resolves to one deterministic per-owner value so that schedules
//! sharing a nominal time spread out instead of colliding.

pub mod engine;
mod field;
mod hash;
mod line;
mod list;
mod parse;

pub use field::{FieldMatcher, FieldPosition, FieldToken};
pub use hash::{resolve, Seed};
pub use line::ScheduleLine;
pub use list::ScheduleList;
