//! Hawaii DOE school-day lookup.
//!
//! School days carry noticeably heavier morning traffic, so a window's target
//! date is reported alongside whether school is in session. Weekends are never
//! school days; weekdays are school days unless they fall in a listed break.

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::calendar::hawaii_offset;

type Ymd = (i32, u32, u32);

struct NonSchoolRange {
    start: Ymd,
    end: Ymd,
    label: &'static str,
}

const fn range(start: Ymd, end: Ymd, label: &'static str) -> NonSchoolRange {
    NonSchoolRange { start, end, label }
}

/// Inclusive break ranges for SY 2024–25 and 2025–26, checked in order.
const NON_SCHOOL_RANGES: &[NonSchoolRange] = &[
    range((2024, 5, 24), (2024, 7, 28), "Summer Break"),
    // SY 2024-2025
    range((2024, 8, 5), (2024, 8, 5), "Holiday (Statehood Day)"),
    range((2024, 9, 2), (2024, 9, 2), "Holiday (Labor Day)"),
    range((2024, 10, 14), (2024, 10, 14), "Holiday (Columbus Day)"),
    range((2024, 11, 5), (2024, 11, 5), "Holiday (Election Day)"),
    range((2024, 11, 11), (2024, 11, 11), "Holiday (Veterans Day)"),
    range((2024, 11, 27), (2024, 11, 29), "Thanksgiving Break"),
    range((2024, 12, 23), (2025, 1, 3), "Winter Break"),
    range((2025, 1, 20), (2025, 1, 20), "Holiday (MLK Day)"),
    range((2025, 2, 17), (2025, 2, 17), "Holiday (Presidents Day)"),
    range((2025, 3, 17), (2025, 3, 21), "Spring Break"),
    range((2025, 3, 26), (2025, 3, 26), "Holiday (Prince Kuhio Day)"),
    range((2025, 4, 18), (2025, 4, 18), "Holiday (Good Friday)"),
    range((2025, 5, 26), (2025, 5, 26), "Holiday (Memorial Day)"),
    range((2025, 5, 23), (2025, 7, 27), "Summer Break"),
    // SY 2025-2026
    range((2025, 8, 15), (2025, 8, 15), "Holiday (Statehood Day)"),
    range((2025, 9, 1), (2025, 9, 1), "Holiday (Labor Day)"),
    range((2025, 10, 13), (2025, 10, 13), "Holiday (Columbus Day)"),
    range((2025, 11, 11), (2025, 11, 11), "Holiday (Veterans Day)"),
    range((2025, 11, 26), (2025, 11, 28), "Thanksgiving Break"),
    range((2025, 12, 22), (2026, 1, 2), "Winter Break"),
    range((2026, 1, 19), (2026, 1, 19), "Holiday (MLK Day)"),
    range((2026, 2, 16), (2026, 2, 16), "Holiday (Presidents Day)"),
    range((2026, 3, 26), (2026, 3, 26), "Holiday (Prince Kuhio Day)"),
    range((2026, 3, 30), (2026, 4, 3), "Spring Break"),
    range((2026, 4, 3), (2026, 4, 3), "Holiday (Good Friday)"),
    range((2026, 5, 25), (2026, 5, 25), "Holiday (Memorial Day)"),
    range((2026, 5, 22), (2026, 7, 26), "Summer Break"),
];

pub const SCHOOL_DAY: &str = "School day";
pub const WEEKEND: &str = "Weekend";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDayInfo {
    pub is_school_day: bool,
    /// "School day", "Weekend", or the break's label.
    pub reason: String,
}

/// Whether `date` (a Hawaii civil date) is a school day.
pub fn school_day_info(date: NaiveDate) -> SchoolDayInfo {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return SchoolDayInfo {
            is_school_day: false,
            reason: WEEKEND.to_string(),
        };
    }

    let ymd = (date.year(), date.month(), date.day());
    match NON_SCHOOL_RANGES
        .iter()
        .find(|r| r.start <= ymd && ymd <= r.end)
    {
        Some(r) => SchoolDayInfo {
            is_school_day: false,
            reason: r.label.to_string(),
        },
        None => SchoolDayInfo {
            is_school_day: true,
            reason: SCHOOL_DAY.to_string(),
        },
    }
}

/// School-day status of the Hawaii civil date containing a unix instant.
pub fn school_day_at(unix_seconds: i64) -> Option<SchoolDayInfo> {
    let utc = DateTime::from_timestamp(unix_seconds, 0)?;
    Some(school_day_info(utc.with_timezone(&hawaii_offset()).date_naive()))
}
