//! Window-level entry points: plan a window, then analyze its samples.
//!
//! [`plan_window`] resolves the window once and derives both the departure
//! instants and the goal-arrival instant from that single resolution, so a
//! rolled-over window and its goal always land on the same day.
//! [`analyze_window`] turns the provider's ordered samples into per-slot
//! output plus a summary.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_clock_time, resolve_window, weekday_from_index, ResolvedWindow};
use crate::error::{EngineError, Result};
use crate::label::{format_clock_label, UNKNOWN_LABEL};
use crate::ranking::{summarize, WindowSummary};
use crate::report::{SlotOutcome, StressData, UnavailableSlot};
use crate::sample::{to_departure_samples, DepartureSample, ProviderSample};
use crate::stress::{analyze_samples, StressResult};

/// Window parameters with an absolute goal arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRequest {
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: u32,
    /// 0 = Sunday … 6 = Saturday.
    pub target_day_of_week: u8,
    /// Unix seconds.
    pub desired_arrival_time: i64,
}

impl WindowRequest {
    /// Departure instants for this request.
    ///
    /// # Errors
    ///
    /// Parsing errors from the calendar module, or
    /// [`EngineError::EmptyWindow`] when the start does not precede the end.
    pub fn departure_times(&self, now: DateTime<Utc>) -> Result<Vec<i64>> {
        let start = parse_clock_time(&self.start_time)?;
        let end = parse_clock_time(&self.end_time)?;
        let target = weekday_from_index(self.target_day_of_week)?;
        non_empty_departures(&resolve_window(now, start, end, target), self.interval_minutes)
    }
}

/// A resolved window with its departures and goal arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    pub window: ResolvedWindow,
    pub departure_times: Vec<i64>,
    pub desired_arrival_time: i64,
    pub arrive_by: NaiveTime,
}

/// Resolve a window and its goal arrival in one step.
///
/// # Errors
///
/// Returns [`EngineError::EmptyWindow`] when `start` does not precede `end`,
/// or [`EngineError::InvalidInterval`] for a zero interval.
pub fn plan_window(
    now: DateTime<Utc>,
    start: NaiveTime,
    end: NaiveTime,
    interval_minutes: u32,
    target: Weekday,
    arrive_by: NaiveTime,
) -> Result<WindowPlan> {
    let window = resolve_window(now, start, end, target);
    let departure_times = non_empty_departures(&window, interval_minutes)?;
    let desired_arrival_time = window.instant_at(arrive_by);
    Ok(WindowPlan {
        window,
        departure_times,
        desired_arrival_time,
        arrive_by,
    })
}

fn non_empty_departures(window: &ResolvedWindow, interval_minutes: u32) -> Result<Vec<i64>> {
    let times = window.departure_times(interval_minutes)?;
    if times.is_empty() {
        return Err(EngineError::EmptyWindow(
            "start time must be before end time".to_string(),
        ));
    }
    Ok(times)
}

/// Analyzed window, in departure order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalysis {
    pub desired_arrival_time: i64,
    /// Smallest free-flow duration among priced slots (0 when none).
    pub free_flow_duration: i64,
    pub slots: Vec<SlotOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WindowSummary>,
}

impl WindowAnalysis {
    /// The priced slots only, in departure order.
    pub fn analyzed(&self) -> Vec<StressData> {
        self.slots
            .iter()
            .filter_map(SlotOutcome::as_analyzed)
            .cloned()
            .collect()
    }
}

/// Analyze the provider samples of one window against a goal arrival.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSamples`] if the samples are not in strictly
/// increasing departure order.
pub fn analyze_window(
    samples: &[ProviderSample],
    desired_arrival_time: i64,
) -> Result<WindowAnalysis> {
    let departures = to_departure_samples(samples)?;
    let results = analyze_samples(&departures, desired_arrival_time);

    let slots: Vec<SlotOutcome> = departures
        .iter()
        .zip(samples)
        .zip(&results)
        .map(|((sample, raw), result)| match result {
            Some(r) => SlotOutcome::Analyzed(stress_data(sample, r)),
            None => SlotOutcome::Unavailable(UnavailableSlot {
                departure_label: format_clock_label(sample.departure_time),
                arrival_label: UNKNOWN_LABEL.to_string(),
                status: raw.status.clone(),
            }),
        })
        .collect();

    let analyzed: Vec<StressData> = slots
        .iter()
        .filter_map(SlotOutcome::as_analyzed)
        .cloned()
        .collect();

    Ok(WindowAnalysis {
        desired_arrival_time,
        free_flow_duration: departures
            .iter()
            .filter(|s| s.is_valid())
            .map(|s| s.free_flow_seconds)
            .min()
            .unwrap_or(0),
        summary: summarize(&analyzed),
        slots,
    })
}

fn stress_data(sample: &DepartureSample, result: &StressResult) -> StressData {
    StressData {
        departure_label: format_clock_label(sample.departure_time),
        arrival_label: format_clock_label(sample.arrival_time()),
        duration_minutes: sample.free_flow_minutes(),
        duration_in_traffic_minutes: sample.traffic_minutes(),
        stress_index: result.stress_index,
        stress_level: result.stress_level,
        lateness_risk: result.lateness_risk,
        minutes_buffer: result.minutes_buffer,
    }
}
