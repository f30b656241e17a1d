//! Best/worst slot, time saved and trend over the analyzed slots of a window.
//!
//! Selection is a left fold that only replaces the running pick on a strict
//! improvement, so ties always go to the earliest departure.

use serde::{Deserialize, Serialize};

use crate::report::StressData;
use crate::stress::LatenessRisk;

/// Direction of travel time across the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Worsening,
    Improving,
}

/// Slot with the shortest traffic duration (earliest on ties).
pub fn best_slot(slots: &[StressData]) -> Option<&StressData> {
    slots.iter().fold(None, |best: Option<&StressData>, s| match best {
        Some(b) if b.duration_in_traffic_minutes <= s.duration_in_traffic_minutes => Some(b),
        _ => Some(s),
    })
}

/// Slot with the longest traffic duration (earliest on ties).
pub fn worst_slot(slots: &[StressData]) -> Option<&StressData> {
    slots.iter().fold(None, |worst: Option<&StressData>, s| match worst {
        Some(w) if w.duration_in_traffic_minutes >= s.duration_in_traffic_minutes => Some(w),
        _ => Some(s),
    })
}

/// Minutes gained by leaving at the best slot instead of the worst.
pub fn time_saved_minutes(slots: &[StressData]) -> i64 {
    match (best_slot(slots), worst_slot(slots)) {
        (Some(b), Some(w)) => w.duration_in_traffic_minutes - b.duration_in_traffic_minutes,
        _ => 0,
    }
}

/// Compare mean traffic minutes of the first `ceil(n/2)` slots with the rest.
///
/// `Worsening` only when the second half is strictly slower. A window with a
/// single slot has nothing to compare against and reads as `Improving`.
pub fn trend(slots: &[StressData]) -> Option<Trend> {
    if slots.is_empty() {
        return None;
    }
    let (first, second) = slots.split_at(slots.len().div_ceil(2));
    let worsening = match (mean_traffic(first), mean_traffic(second)) {
        (Some(a), Some(b)) => b > a,
        _ => false,
    };
    Some(if worsening {
        Trend::Worsening
    } else {
        Trend::Improving
    })
}

fn mean_traffic(slots: &[StressData]) -> Option<f64> {
    if slots.is_empty() {
        return None;
    }
    let total: i64 = slots.iter().map(|s| s.duration_in_traffic_minutes).sum();
    Some(total as f64 / slots.len() as f64)
}

/// Window-level figures for narrative and impact estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub best_departure_label: String,
    pub best_minutes: i64,
    pub worst_departure_label: String,
    pub worst_minutes: i64,
    pub time_saved_minutes: i64,
    pub trend: Trend,
    /// Smallest per-slot free-flow time.
    pub free_flow_minutes: i64,
    /// Worst traffic time above the free-flow time.
    pub peak_delay_minutes: i64,
    pub all_late: bool,
    pub any_on_time: bool,
}

/// Summarize the analyzed slots; `None` when there are none.
pub fn summarize(slots: &[StressData]) -> Option<WindowSummary> {
    let best = best_slot(slots)?;
    let worst = worst_slot(slots)?;
    let trend = trend(slots)?;
    let free_flow_minutes = slots.iter().map(|s| s.duration_minutes).min()?;

    Some(WindowSummary {
        best_departure_label: best.departure_label.clone(),
        best_minutes: best.duration_in_traffic_minutes,
        worst_departure_label: worst.departure_label.clone(),
        worst_minutes: worst.duration_in_traffic_minutes,
        time_saved_minutes: worst.duration_in_traffic_minutes - best.duration_in_traffic_minutes,
        trend,
        free_flow_minutes,
        peak_delay_minutes: worst.duration_in_traffic_minutes - free_flow_minutes,
        all_late: slots.iter().all(|s| s.lateness_risk == LatenessRisk::Late),
        any_on_time: slots.iter().any(|s| s.lateness_risk == LatenessRisk::OnTime),
    })
}
