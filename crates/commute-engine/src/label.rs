//! Clock labels in the fixed Hawaii offset ("6:53 AM").

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};

use crate::calendar::hawaii_offset;

/// Placeholder label for slots the provider could not price.
pub const UNKNOWN_LABEL: &str = "--";

/// Format a unix timestamp as a 12-hour clock label in UTC−10:00.
///
/// Out-of-range timestamps render as [`UNKNOWN_LABEL`].
pub fn format_clock_label(unix_seconds: i64) -> String {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(utc) => format_local_label(&utc.with_timezone(&hawaii_offset())),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Format a wall-clock time of day (e.g. a goal arrival) the same way.
pub fn format_time_of_day(time: NaiveTime) -> String {
    clock_label(time.hour(), time.minute())
}

fn format_local_label(local: &DateTime<FixedOffset>) -> String {
    clock_label(local.hour(), local.minute())
}

fn clock_label(hour: u32, minute: u32) -> String {
    let display_hour = ((hour + 11) % 12) + 1;
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    format!("{display_hour}:{minute:02} {meridiem}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_morning() {
        // 2026-03-16 16:53 UTC = 06:53 HST
        assert_eq!(format_clock_label(1_773_679_980), "6:53 AM");
    }

    #[test]
    fn test_label_midnight_is_twelve_am() {
        // 2026-03-16 10:00 UTC = 00:00 HST
        assert_eq!(format_clock_label(1_773_655_200), "12:00 AM");
    }

    #[test]
    fn test_label_noon_hour_is_pm() {
        // 2026-03-16 22:05 UTC = 12:05 HST
        assert_eq!(format_clock_label(1_773_698_700), "12:05 PM");
    }

    #[test]
    fn test_label_uses_local_date_not_utc() {
        // 2026-03-17 09:59 UTC is still 23:59 on the 16th in Hawaii
        assert_eq!(format_clock_label(1_773_741_540), "11:59 PM");
    }

    #[test]
    fn test_time_of_day_label() {
        let t = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_time_of_day(t), "7:05 AM");
        let t = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
        assert_eq!(format_time_of_day(t), "5:30 PM");
    }
}
