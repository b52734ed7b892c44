//! One parsed schedule line: five field matchers plus its parameters.

use serde::{Deserialize, Serialize};

use super::field::FieldMatcher;
use super::hash::Seed;
use super::parse;
use crate::error::Result;
use crate::params::ParameterMap;
use crate::types::TickInstant;

/// A parsed specification line.
///
/// Field order follows the source: minute, hour, day-of-month, month,
/// day-of-week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    /// Minute field (0-59).
    pub minute: FieldMatcher,
    /// Hour field (0-23).
    pub hour: FieldMatcher,
    /// Day of month field (1-31).
    pub day_of_month: FieldMatcher,
    /// Month field (1-12).
    pub month: FieldMatcher,
    /// Day of week field (0-7, both 0 and 7 = Sunday).
    pub day_of_week: FieldMatcher,
    /// Parameters attached to this line.
    pub params: ParameterMap,
    /// 1-based line number in the source specification.
    pub source_line: usize,
}

impl ScheduleLine {
    /// Parse one specification line, resolving hash tokens with `seed`.
    ///
    /// `source_line` is the 1-based line number reported in errors.
    pub fn parse(text: &str, source_line: usize, seed: Seed) -> Result<Self> {
        parse::parse_line(text, source_line, seed)
    }

    /// Whether this line fires at the given instant.
    ///
    /// Day-of-month and day-of-week are ORed together when both are
    /// explicitly restricted (standard cron convention); if either is a
    /// bare wildcard the evaluation collapses to a plain AND across all
    /// five fields.
    pub fn check(&self, at: &TickInstant) -> bool {
        if !self.minute.matches(at.minute)
            || !self.hour.matches(at.hour)
            || !self.month.matches(at.month)
        {
            return false;
        }

        let dom_ok = self.day_of_month.matches(at.day_of_month);
        let dow_ok = self.day_of_week.matches(at.day_of_week);
        if !self.day_of_month.is_wildcard() && !self.day_of_week.is_wildcard() {
            dom_ok || dow_ok
        } else {
            dom_ok && dow_ok
        }
    }

    /// This line's parameters, independent of any match outcome.
    pub fn params(&self) -> &ParameterMap {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> ScheduleLine {
        ScheduleLine::parse(text, 1, Seed::default()).unwrap()
    }

    #[test]
    fn test_check_plain_match() {
        let l = line("30 4 * * *");
        assert!(l.check(&TickInstant::new(30, 4, 15, 1, 1)));
        assert!(!l.check(&TickInstant::new(31, 4, 15, 1, 1)));
        assert!(!l.check(&TickInstant::new(30, 5, 15, 1, 1)));
    }

    #[test]
    fn test_day_fields_and_when_dow_unrestricted() {
        // Only day-of-month restricted: fires only on the 1st.
        let l = line("0 0 1 * *");
        assert!(l.check(&TickInstant::new(0, 0, 1, 6, 3)));
        assert!(!l.check(&TickInstant::new(0, 0, 2, 6, 1)));
    }

    #[test]
    fn test_day_fields_or_when_both_restricted() {
        // Both restricted: 1st of the month OR any Monday.
        let l = line("0 0 1 * 1");
        assert!(l.check(&TickInstant::new(0, 0, 1, 6, 3)));
        assert!(l.check(&TickInstant::new(0, 0, 15, 6, 1)));
        assert!(!l.check(&TickInstant::new(0, 0, 15, 6, 2)));
    }

    #[test]
    fn test_day_fields_and_when_dom_unrestricted() {
        // Only day-of-week restricted: Mondays only.
        let l = line("0 0 * * 1");
        assert!(l.check(&TickInstant::new(0, 0, 15, 6, 1)));
        assert!(!l.check(&TickInstant::new(0, 0, 1, 6, 3)));
    }

    #[test]
    fn test_sunday_as_seven_matches_sunday_instant() {
        let l = line("0 0 * * 7");
        assert!(l.check(&TickInstant::new(0, 0, 14, 1, 0)));

        let l = line("0 0 * * 0");
        assert!(l.check(&TickInstant::new(0, 0, 14, 1, 0)));
    }

    #[test]
    fn test_month_restriction() {
        let l = line("0 0 * 6 *");
        assert!(l.check(&TickInstant::new(0, 0, 15, 6, 1)));
        assert!(!l.check(&TickInstant::new(0, 0, 15, 7, 1)));
    }

    #[test]
    fn test_params_readable_without_match() {
        let l = line("0 0 * * * TOKEN=abc");
        assert_eq!(l.params().get("TOKEN"), Some("abc"));
        assert!(!l.check(&TickInstant::new(30, 12, 1, 1, 1)));
        // Still readable after a failed check.
        assert_eq!(l.params().get("TOKEN"), Some("abc"));
    }
}
