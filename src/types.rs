//! Core types shared across tempo.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A calendar instant reduced to the five cron fields.
///
/// Instants arrive already normalized to a single fixed calendar; tempo
/// performs no timezone arithmetic of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickInstant {
    /// Minute of the hour (0-59).
    pub minute: u32,
    /// Hour of the day (0-23).
    pub hour: u32,
    /// Day of the month (1-31).
    pub day_of_month: u32,
    /// Month of the year (1-12).
    pub month: u32,
    /// Day of the week (0-6, 0 = Sunday).
    pub day_of_week: u32,
}

impl TickInstant {
    /// Create an instant from raw field values.
    pub fn new(minute: u32, hour: u32, day_of_month: u32, month: u32, day_of_week: u32) -> Self {
        Self {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        }
    }

    /// Extract the five fields from a UTC datetime.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            minute: dt.minute(),
            hour: dt.hour(),
            day_of_month: dt.day(),
            month: dt.month(),
            day_of_week: dt.weekday().num_days_from_sunday(),
        }
    }
}

impl From<DateTime<Utc>> for TickInstant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(&dt)
    }
}

impl From<&DateTime<Utc>> for TickInstant {
    fn from(dt: &DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_datetime() {
        // 2024-01-15 was a Monday.
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 4, 30, 0).unwrap();
        let at = TickInstant::from(dt);

        assert_eq!(at.minute, 30);
        assert_eq!(at.hour, 4);
        assert_eq!(at.day_of_month, 15);
        assert_eq!(at.month, 1);
        assert_eq!(at.day_of_week, 1);
    }

    #[test]
    fn test_sunday_is_zero() {
        // 2024-01-14 was a Sunday.
        let dt = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
        assert_eq!(TickInstant::from(dt).day_of_week, 0);
    }
}
