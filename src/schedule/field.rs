//! Field tokens and matchers for the five cron positions.
//!
//! Parsing yields a [`FieldToken`] AST per field; binding a token to its
//! position and a seed resolves any hash terms and expands the token into
//! a concrete membership set. The AST is kept alongside the set so that
//! reparsing with a different seed preserves token shapes, and so the
//! day-of-month/day-of-week wildcard rule can inspect the original form.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::hash::{self, Seed};

/// One of the five cron positions, each with its own domain bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPosition {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldPosition {
    /// All positions in specification order.
    pub const ALL: [FieldPosition; 5] = [
        FieldPosition::Minute,
        FieldPosition::Hour,
        FieldPosition::DayOfMonth,
        FieldPosition::Month,
        FieldPosition::DayOfWeek,
    ];

    /// Inclusive domain bounds for this position.
    ///
    /// Day-of-week accepts 0-7 in source text, with 7 equivalent to 0
    /// (both Sunday).
    pub fn bounds(self) -> (u32, u32) {
        match self {
            FieldPosition::Minute => (0, 59),
            FieldPosition::Hour => (0, 23),
            FieldPosition::DayOfMonth => (1, 31),
            FieldPosition::Month => (1, 12),
            FieldPosition::DayOfWeek => (0, 7),
        }
    }

    /// Human-readable field name for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            FieldPosition::Minute => "minute",
            FieldPosition::Hour => "hour",
            FieldPosition::DayOfMonth => "day-of-month",
            FieldPosition::Month => "month",
            FieldPosition::DayOfWeek => "day-of-week",
        }
    }

    /// Stable index fed into hash resolution.
    pub(crate) fn index(self) -> u8 {
        match self {
            FieldPosition::Minute => 0,
            FieldPosition::Hour => 1,
            FieldPosition::DayOfMonth => 2,
            FieldPosition::Month => 3,
            FieldPosition::DayOfWeek => 4,
        }
    }
}

/// Parsed representation of one field before domain resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldToken {
    /// `*` — every value in the domain.
    Wildcard,
    /// `n` — a single value.
    Literal(u32),
    /// `a-b` — an inclusive range.
    Range { lo: u32, hi: u32 },
    /// `a-b/s` or `*/s` — every `s`-th value from `lo` through `hi`.
    SteppedRange { lo: u32, hi: u32, step: u32 },
    /// `H` — one hash-resolved value over the full domain.
    Hash,
    /// `H(a-b)` — one hash-resolved value within a sub-range.
    HashRange { lo: u32, hi: u32 },
    /// `H/s` or `H(a-b)/s` — a stepped series whose phase within the step
    /// is hash-resolved.
    HashedStep { lo: u32, hi: u32, step: u32 },
    /// Comma-separated combination of the above.
    List(Vec<FieldToken>),
}

/// A [`FieldToken`] bound to its position, with hash terms resolved
/// against a seed into a concrete membership set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatcher {
    token: FieldToken,
    position: FieldPosition,
    values: BTreeSet<u32>,
}

impl FieldMatcher {
    /// Bind a token to its position, resolving hash terms with `seed`.
    ///
    /// The token is assumed validated by the parser: bounds in-domain,
    /// ranges ordered, steps positive.
    pub(crate) fn bind(token: FieldToken, position: FieldPosition, seed: Seed) -> Self {
        let mut values = BTreeSet::new();
        expand(&token, position, seed, &mut values);
        Self {
            token,
            position,
            values,
        }
    }

    /// Whether `value` is accepted by this field.
    ///
    /// For day-of-week, 0 and 7 are the same weekday; both query values
    /// hit a matcher built from either form.
    pub fn matches(&self, value: u32) -> bool {
        self.values.contains(&normalize(self.position, value))
    }

    /// Whether this field was written as a bare `*`.
    ///
    /// Only a bare wildcard counts as unrestricted for the
    /// day-of-month/day-of-week rule; `*/2` restricts the field even
    /// though it was spelled with a star.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.token, FieldToken::Wildcard)
    }

    /// The parsed token this matcher was built from.
    pub fn token(&self) -> &FieldToken {
        &self.token
    }

    /// The position this matcher is bound to.
    pub fn position(&self) -> FieldPosition {
        self.position
    }

    /// The resolved concrete values, in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.iter().copied()
    }
}

/// Fold day-of-week 7 onto 0; other positions pass through.
fn normalize(position: FieldPosition, value: u32) -> u32 {
    if position == FieldPosition::DayOfWeek && value == 7 {
        0
    } else {
        value
    }
}

fn expand(token: &FieldToken, position: FieldPosition, seed: Seed, out: &mut BTreeSet<u32>) {
    let (min, max) = position.bounds();
    match *token {
        FieldToken::Wildcard => {
            for v in min..=max {
                out.insert(normalize(position, v));
            }
        }
        FieldToken::Literal(n) => {
            out.insert(normalize(position, n));
        }
        FieldToken::Range { lo, hi } => {
            for v in lo..=hi {
                out.insert(normalize(position, v));
            }
        }
        FieldToken::SteppedRange { lo, hi, step } => {
            let mut v = lo;
            while v <= hi {
                out.insert(normalize(position, v));
                v += step;
            }
        }
        FieldToken::Hash => {
            out.insert(normalize(position, hash::resolve(seed, position, min, max)));
        }
        FieldToken::HashRange { lo, hi } => {
            out.insert(normalize(position, hash::resolve(seed, position, lo, hi)));
        }
        FieldToken::HashedStep { lo, hi, step } => {
            // Phase within the step is hash-chosen; a phase past a narrow
            // sub-range leaves the matcher empty.
            let phase = hash::resolve(seed, position, 0, step - 1);
            let mut v = lo + phase;
            while v <= hi {
                out.insert(normalize(position, v));
                v += step;
            }
        }
        FieldToken::List(ref terms) => {
            for term in terms {
                expand(term, position, seed, out);
            }
        }
    }
}
