//! Departure-window resolution in a fixed UTC−10:00 civil calendar.
//!
//! Turns a commuter's "weekday + HH:MM window" intent into absolute departure
//! instants. All functions take an explicit `now` anchor (no system clock
//! access), so callers and tests can pin arbitrary instants and check the
//! rollover behaviour deterministically.
//!
//! # Fixed offset
//!
//! Hawaii does not observe daylight saving time, and the calendar here is a
//! constant −10 hour shift from UTC ([`HAWAII_UTC_OFFSET_SECONDS`]). There is
//! no timezone database lookup anywhere in this module.
//!
//! # Rollover
//!
//! When the requested weekday is today and the window's start has already
//! passed, the whole window moves forward by exactly seven days. That decision
//! is made once, in [`resolve_window`], and recorded on the returned
//! [`ResolvedWindow`]. Both the departure sequence and any goal-arrival
//! instant are derived from that same value, so they can never disagree about
//! which calendar day they refer to.
//!
//! # Functions
//!
//! - [`resolve_window`]: resolve the target day, rollover and window bounds
//! - [`generate_departure_times`]: string-level convenience returning unix seconds
//! - [`parse_clock_time`] / [`weekday_from_index`]: boundary parsing

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc, Weekday};

use crate::error::{EngineError, Result};

/// Hawaii Standard Time, UTC−10:00, as seconds east of UTC.
pub const HAWAII_UTC_OFFSET_SECONDS: i32 = -10 * 3600;

/// Upper bound on departure slots per window (one provider call each).
pub const MAX_DEPARTURE_SLOTS: usize = 8;

/// Shift applied when today's window has already started.
pub const ROLLOVER_DAYS: i64 = 7;

const HAWAII: FixedOffset = match FixedOffset::east_opt(HAWAII_UTC_OFFSET_SECONDS) {
    Some(offset) => offset,
    None => panic!("UTC offset out of range"),
};

/// The fixed UTC−10:00 offset used for every civil-calendar computation.
pub fn hawaii_offset() -> FixedOffset {
    HAWAII
}

// ── Boundary parsing ────────────────────────────────────────────────────────

/// Parse a 24-hour `"HH:MM"` wall-clock time.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTime`] if the string is not a valid time of day.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| EngineError::InvalidTime(format!("'{}': {}", s, e)))
}

/// Map a day index (0 = Sunday … 6 = Saturday) to a [`Weekday`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidWeekday`] for indices above 6.
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(EngineError::InvalidWeekday(format!(
            "{index} (expected 0=Sunday through 6=Saturday)"
        ))),
    }
}

// ── resolve_window ──────────────────────────────────────────────────────────

/// A departure window pinned to a concrete civil date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    /// Civil midnight (UTC−10:00) of the day the window falls on, after rollover.
    pub midnight: DateTime<FixedOffset>,
    /// Days from today's civil date to the requested weekday, before rollover (0..=6).
    pub days_ahead: i64,
    /// Whether the window was pushed forward [`ROLLOVER_DAYS`] because it had started.
    pub rolled_over: bool,
    /// First departure instant.
    pub start: DateTime<FixedOffset>,
    /// Last admissible departure instant (inclusive).
    pub end: DateTime<FixedOffset>,
}

impl ResolvedWindow {
    /// The civil date the window falls on.
    pub fn target_date(&self) -> NaiveDate {
        self.midnight.date_naive()
    }

    /// True when the end does not come after the start.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Unix timestamp of `time` on the window's day.
    ///
    /// Goal-arrival instants must come from here so they share the window's
    /// rollover decision.
    pub fn instant_at(&self, time: NaiveTime) -> i64 {
        (self.midnight + since_midnight(time)).timestamp()
    }

    /// Departure instants from start to end inclusive, `interval_minutes`
    /// apart, capped at [`MAX_DEPARTURE_SLOTS`].
    ///
    /// An empty window yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInterval`] if `interval_minutes` is zero.
    pub fn departure_times(&self, interval_minutes: u32) -> Result<Vec<i64>> {
        if interval_minutes == 0 {
            return Err(EngineError::InvalidInterval(
                "interval must be at least one minute".to_string(),
            ));
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let step = i64::from(interval_minutes) * 60;
        let start = self.start.timestamp();
        let end = self.end.timestamp();

        let times = std::iter::successors(Some(start), |t| Some(t + step))
            .take_while(|t| *t <= end)
            .take(MAX_DEPARTURE_SLOTS)
            .collect();
        Ok(times)
    }
}

/// Resolve a weekday + time window against the `now` anchor.
///
/// # Arguments
///
/// * `now`: The reference "now" instant (typically `Utc::now()`)
/// * `start` / `end`: Wall-clock bounds of the window, in UTC−10:00
/// * `target`: The weekday the commuter wants to travel on
///
/// # Behaviour
///
/// 1. Today's weekday is taken from the civil date of `now` in UTC−10:00.
/// 2. `days_ahead = (target − today + 7) mod 7`, so today's weekday means today.
/// 3. The target midnight is today's civil midnight plus `days_ahead` days.
/// 4. If the start instant is strictly before `now`, everything moves 7 days on.
pub fn resolve_window(
    now: DateTime<Utc>,
    start: NaiveTime,
    end: NaiveTime,
    target: Weekday,
) -> ResolvedWindow {
    let local_now = now.with_timezone(&HAWAII);
    let today = local_now.weekday();

    let days_ahead = (i64::from(target.num_days_from_sunday())
        - i64::from(today.num_days_from_sunday())
        + 7)
        % 7;

    let mut midnight = civil_midnight(&local_now) + Duration::days(days_ahead);
    let mut start_instant = midnight + since_midnight(start);
    let mut end_instant = midnight + since_midnight(end);

    let rolled_over = start_instant.with_timezone(&Utc) < now;
    if rolled_over {
        let shift = Duration::days(ROLLOVER_DAYS);
        midnight += shift;
        start_instant += shift;
        end_instant += shift;
    }

    log::debug!(
        "resolved window on {} (days_ahead={}, rolled_over={}): {} .. {}",
        midnight.date_naive(),
        days_ahead,
        rolled_over,
        start_instant.to_rfc3339(),
        end_instant.to_rfc3339()
    );

    ResolvedWindow {
        midnight,
        days_ahead,
        rolled_over,
        start: start_instant,
        end: end_instant,
    }
}

/// Generate departure timestamps for a `"HH:MM"` window on the next
/// occurrence of `target_day` (0 = Sunday … 6 = Saturday).
///
/// Returns an empty sequence when the end does not come after the start;
/// callers should report that as "start time must be before end time".
///
/// # Errors
///
/// Returns [`EngineError::InvalidTime`] for malformed times,
/// [`EngineError::InvalidWeekday`] for a day index above 6, or
/// [`EngineError::InvalidInterval`] for a zero interval.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use commute_engine::calendar::generate_departure_times;
///
/// // Monday 2026-03-16 05:00 HST
/// let now = Utc.with_ymd_and_hms(2026, 3, 16, 15, 0, 0).unwrap();
/// let times = generate_departure_times(now, "06:30", "07:30", 10, 1).unwrap();
/// assert_eq!(times.len(), 7);
/// assert_eq!(times[1] - times[0], 600);
/// ```
pub fn generate_departure_times(
    now: DateTime<Utc>,
    start_time: &str,
    end_time: &str,
    interval_minutes: u32,
    target_day: u8,
) -> Result<Vec<i64>> {
    let start = parse_clock_time(start_time)?;
    let end = parse_clock_time(end_time)?;
    let target = weekday_from_index(target_day)?;
    resolve_window(now, start, end, target).departure_times(interval_minutes)
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Midnight of the civil day containing `local`, by subtracting its time of day.
fn civil_midnight(local: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    *local
        - Duration::seconds(i64::from(local.num_seconds_from_midnight()))
        - Duration::nanoseconds(i64::from(local.nanosecond()))
}

fn since_midnight(time: NaiveTime) -> Duration {
    Duration::seconds(i64::from(time.num_seconds_from_midnight()))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// 2026-03-16 06:30 HST, a Monday.
    const MON_0630_HST: i64 = 1_773_678_600;
    const DAY: i64 = 86_400;
    const WEEK: i64 = 7 * DAY;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("06:30").unwrap(), hm(6, 30));
        assert_eq!(parse_clock_time(" 17:05 ").unwrap(), hm(17, 5));
    }

    #[test]
    fn test_parse_clock_time_rejects_garbage() {
        let err = parse_clock_time("25:00").unwrap_err().to_string();
        assert!(err.contains("Invalid time"), "got: {err}");
        assert!(parse_clock_time("soon").is_err());
    }

    #[test]
    fn test_weekday_from_index_sunday_first() {
        assert_eq!(weekday_from_index(0).unwrap(), Weekday::Sun);
        assert_eq!(weekday_from_index(1).unwrap(), Weekday::Mon);
        assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sat);
        let err = weekday_from_index(7).unwrap_err().to_string();
        assert!(err.contains("Invalid weekday"), "got: {err}");
    }

    // ── resolve_window ──────────────────────────────────────────────────

    #[test]
    fn test_same_day_future_window_stays_today() {
        // Monday 05:00 HST
        let now = utc(2026, 3, 16, 15, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Mon);
        assert_eq!(w.days_ahead, 0);
        assert!(!w.rolled_over);
        assert_eq!(w.start.timestamp(), MON_0630_HST);
        assert_eq!(w.target_date(), NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
    }

    #[test]
    fn test_same_day_past_window_rolls_one_week() {
        // Monday 08:00 HST, window already started
        let now = utc(2026, 3, 16, 18, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Mon);
        assert_eq!(w.days_ahead, 0);
        assert!(w.rolled_over);
        assert_eq!(w.start.timestamp(), MON_0630_HST + WEEK);
        assert_eq!(w.end.timestamp(), MON_0630_HST + WEEK + 3600);
        assert_eq!(w.target_date(), NaiveDate::from_ymd_opt(2026, 3, 23).unwrap());
    }

    #[test]
    fn test_start_exactly_now_is_not_past() {
        let now = DateTime::from_timestamp(MON_0630_HST, 0).unwrap();
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Mon);
        assert!(!w.rolled_over);
        assert_eq!(w.start.timestamp(), MON_0630_HST);
    }

    #[test]
    fn test_next_day_target() {
        let now = utc(2026, 3, 16, 15, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Tue);
        assert_eq!(w.days_ahead, 1);
        assert_eq!(w.start.timestamp(), MON_0630_HST + DAY);
    }

    #[test]
    fn test_previous_weekday_wraps_to_six_days() {
        // Monday → Sunday is six days ahead, never backwards
        let now = utc(2026, 3, 16, 15, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Sun);
        assert_eq!(w.days_ahead, 6);
        assert!(!w.rolled_over);
        assert_eq!(w.start.timestamp(), MON_0630_HST + 6 * DAY);
    }

    #[test]
    fn test_late_evening_uses_local_calendar_date() {
        // Monday 20:00 HST is already Tuesday 06:00 in UTC.
        let now = utc(2026, 3, 17, 6, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Tue);
        assert_eq!(w.days_ahead, 1);
        assert!(!w.rolled_over);
        assert_eq!(w.target_date(), NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
        assert_eq!(w.start.timestamp(), MON_0630_HST + DAY);
    }

    #[test]
    fn test_instant_at_follows_rollover() {
        let now = utc(2026, 3, 16, 18, 0);
        let w = resolve_window(now, hm(6, 30), hm(7, 30), Weekday::Mon);
        let goal = w.instant_at(hm(8, 0));
        assert_eq!(goal, MON_0630_HST + WEEK + 90 * 60);
        assert!(goal > w.start.timestamp());
    }

    // ── departure_times ─────────────────────────────────────────────────

    #[test]
    fn test_departure_times_inclusive_end() {
        let now = utc(2026, 3, 16, 15, 0);
        let times = generate_departure_times(now, "06:30", "07:30", 10, 1).unwrap();
        assert_eq!(times.len(), 7);
        assert_eq!(times[0], MON_0630_HST);
        assert_eq!(*times.last().unwrap(), MON_0630_HST + 3600);
    }

    #[test]
    fn test_departure_times_capped_at_eight() {
        let now = utc(2026, 3, 16, 15, 0);
        let times = generate_departure_times(now, "06:00", "09:00", 10, 1).unwrap();
        assert_eq!(times.len(), MAX_DEPARTURE_SLOTS);
        assert!(times.windows(2).all(|p| p[1] - p[0] == 600));
    }

    #[test]
    fn test_departure_times_uneven_interval_stops_before_end() {
        let now = utc(2026, 3, 16, 15, 0);
        let times = generate_departure_times(now, "06:30", "07:00", 20, 1).unwrap();
        assert_eq!(times, vec![MON_0630_HST, MON_0630_HST + 1200]);
    }

    #[test]
    fn test_reversed_window_is_empty() {
        let now = utc(2026, 3, 16, 15, 0);
        assert!(generate_departure_times(now, "07:30", "06:30", 10, 1)
            .unwrap()
            .is_empty());
        assert!(generate_departure_times(now, "07:30", "07:30", 10, 1)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let now = utc(2026, 3, 16, 15, 0);
        let err = generate_departure_times(now, "06:30", "07:30", 0, 1)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid interval"), "got: {err}");
    }

    #[test]
    fn test_rolled_window_every_slot_a_week_later() {
        let before = utc(2026, 3, 16, 15, 0);
        let after = utc(2026, 3, 16, 18, 0);
        let naive = generate_departure_times(before, "06:30", "07:30", 10, 1).unwrap();
        let rolled = generate_departure_times(after, "06:30", "07:30", 10, 1).unwrap();
        assert_eq!(naive.len(), rolled.len());
        for (n, r) in naive.iter().zip(&rolled) {
            assert_eq!(r - n, WEEK);
        }
    }
}
