//! Ordered collection of schedule lines parsed from a full specification.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::hash::Seed;
use super::line::ScheduleLine;
use crate::error::{Result, TempoError};
use crate::types::TickInstant;

/// All schedule lines of a multi-line specification, in source order.
///
/// Immutable once built; reparsing with a different seed produces a new,
/// independent list with the same token shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleList {
    lines: Vec<ScheduleLine>,
    seed: Seed,
}

impl ScheduleList {
    /// Parse a specification with the default (zero) seed.
    ///
    /// Used before an owner identity is known; hash tokens resolve
    /// against the zero seed.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with_seed(raw, Seed::default())
    }

    /// Parse a specification, resolving hash tokens for one owner.
    ///
    /// Blank lines and lines whose first non-whitespace character is `#`
    /// are skipped; physical line numbers are preserved for diagnostics.
    pub fn parse_with_seed(raw: &str, seed: Seed) -> Result<Self> {
        let mut lines = Vec::new();
        for (idx, text) in raw.lines().enumerate() {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines.push(ScheduleLine::parse(text, idx + 1, seed)?);
        }
        Ok(Self { lines, seed })
    }

    /// Return the first line (in source order) that fires at `at`.
    ///
    /// Source order is the tie-break: when several lines would match the
    /// same instant, only the first fires and its parameters are used.
    pub fn check(&self, at: &TickInstant) -> Option<&ScheduleLine> {
        self.lines.iter().find(|line| line.check(at))
    }

    /// The parsed lines in source order.
    pub fn lines(&self) -> &[ScheduleLine] {
        &self.lines
    }

    /// The seed this list was resolved against.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Number of schedule lines (comments and blanks excluded).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the specification contained no schedule lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromStr for ScheduleList {
    type Err = TempoError;

    fn from_str(s: &str) -> Result<Self> {
        ScheduleList::parse(s)
    }
}
