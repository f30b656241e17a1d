//! Stress index and lateness risk for the slots of one departure window.
//!
//! Everything here is a pure function of its arguments. A slot's result
//! depends only on its own sample, its immediate valid neighbours, the
//! window's free-flow baseline and the goal arrival instant.
//!
//! # Stress index
//!
//! ```text
//! congestion_ratio   = ((travel − free_flow) / free_flow) · 100   (0 when free_flow ≤ 0)
//! lateness_penalty   = lateness_minutes · 2
//! volatility_penalty = |local_slope| · 8
//! stress_index       = clamp(round(sum), 0, 200)
//! ```
//!
//! Levels use fixed thresholds (not percentiles), so a "stable 20" means the
//! same thing in every window.

use serde::{Deserialize, Serialize};

use crate::sample::{round_half_up, DepartureSample};

/// Upper bound of the stress index.
pub const MAX_STRESS_INDEX: u32 = 200;

/// Highest index still classified [`StressLevel::Stable`].
pub const STABLE_MAX: u32 = 35;

/// Highest index still classified [`StressLevel::Moderate`].
pub const MODERATE_MAX: u32 = 70;

/// A buffer at or below this many minutes is [`LatenessRisk::Tight`].
pub const TIGHT_BUFFER_MINUTES: i64 = 5;

const LATENESS_WEIGHT: f64 = 2.0;
const VOLATILITY_WEIGHT: f64 = 8.0;

/// Bucketed stress index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Stable,
    Moderate,
    Volatile,
}

impl StressLevel {
    pub fn from_index(index: u32) -> Self {
        if index <= STABLE_MAX {
            StressLevel::Stable
        } else if index <= MODERATE_MAX {
            StressLevel::Moderate
        } else {
            StressLevel::Volatile
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Stable => "stable",
            StressLevel::Moderate => "moderate",
            StressLevel::Volatile => "volatile",
        }
    }
}

/// Whether a slot's predicted arrival meets the goal.
///
/// Serialized with the traffic-light names the UI consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatenessRisk {
    #[serde(rename = "green")]
    OnTime,
    #[serde(rename = "yellow")]
    Tight,
    #[serde(rename = "red")]
    Late,
}

impl LatenessRisk {
    /// Late iff arrival is strictly after the goal; otherwise Tight when the
    /// rounded buffer is at most [`TIGHT_BUFFER_MINUTES`].
    pub fn classify(arrival_time: i64, desired_arrival_time: i64) -> Self {
        if arrival_time > desired_arrival_time {
            LatenessRisk::Late
        } else if minutes_buffer(arrival_time, desired_arrival_time) <= TIGHT_BUFFER_MINUTES {
            LatenessRisk::Tight
        } else {
            LatenessRisk::OnTime
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatenessRisk::OnTime => "green",
            LatenessRisk::Tight => "yellow",
            LatenessRisk::Late => "red",
        }
    }
}

/// Derived figures for one valid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressResult {
    pub stress_index: u32,
    pub stress_level: StressLevel,
    pub lateness_risk: LatenessRisk,
    /// Minutes between arrival and goal; positive means early.
    pub minutes_buffer: i64,
}

/// Combine congestion, lateness and volatility into a bounded index.
///
/// A non-positive `free_flow_minutes` zeroes the congestion term instead of
/// dividing by it.
pub fn compute_stress_index(
    travel_minutes: f64,
    free_flow_minutes: f64,
    lateness_minutes: f64,
    local_slope: f64,
) -> u32 {
    let congestion_ratio = if free_flow_minutes > 0.0 {
        (travel_minutes - free_flow_minutes) / free_flow_minutes * 100.0
    } else {
        0.0
    };
    let raw = congestion_ratio
        + lateness_minutes * LATENESS_WEIGHT
        + local_slope.abs() * VOLATILITY_WEIGHT;
    round_half_up(raw).clamp(0.0, f64::from(MAX_STRESS_INDEX)) as u32
}

/// Signed minutes between arrival and goal, rounded half up.
pub fn minutes_buffer(arrival_time: i64, desired_arrival_time: i64) -> i64 {
    round_half_up(desired_arrival_time.saturating_sub(arrival_time) as f64 / 60.0) as i64
}

/// Minutes past the goal; zero when on or before it.
pub fn lateness_minutes(arrival_time: i64, desired_arrival_time: i64) -> f64 {
    if arrival_time > desired_arrival_time {
        arrival_time.saturating_sub(desired_arrival_time) as f64 / 60.0
    } else {
        0.0
    }
}

/// Smallest free-flow duration among valid samples, in (fractional) minutes.
///
/// Zero when no sample is valid.
pub fn free_flow_baseline_minutes(samples: &[DepartureSample]) -> f64 {
    samples
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| s.free_flow_seconds)
        .min()
        .map_or(0.0, |secs| secs as f64 / 60.0)
}

/// Half the travel-minute difference between the neighbours of `index`.
///
/// A missing neighbour is replaced by the value at `index`, so the slope at
/// either end only sees one side (and a single-element series has slope 0).
pub fn local_slope(travel_minutes: &[i64], index: usize) -> f64 {
    let Some(&own) = travel_minutes.get(index) else {
        return 0.0;
    };
    let prev = index
        .checked_sub(1)
        .and_then(|i| travel_minutes.get(i))
        .copied()
        .unwrap_or(own);
    let next = travel_minutes.get(index + 1).copied().unwrap_or(own);
    (next - prev) as f64 / 2.0
}

/// Stress results aligned with `samples`: `None` where the sample is not valid.
///
/// Invalid samples keep their position but take no part in the baseline,
/// the neighbour slopes or classification.
pub fn analyze_samples(
    samples: &[DepartureSample],
    desired_arrival_time: i64,
) -> Vec<Option<StressResult>> {
    let baseline = free_flow_baseline_minutes(samples);
    log::debug!("free-flow baseline {:.2} min over {} samples", baseline, samples.len());

    // Positions of valid samples, and their travel minutes in the same order.
    let valid: Vec<usize> = samples
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_valid())
        .map(|(i, _)| i)
        .collect();
    let travel: Vec<i64> = valid.iter().map(|&i| samples[i].traffic_minutes()).collect();

    let mut results = vec![None; samples.len()];
    for (rank, &pos) in valid.iter().enumerate() {
        let sample = &samples[pos];
        let arrival = sample.arrival_time();
        let stress_index = compute_stress_index(
            travel[rank] as f64,
            baseline,
            lateness_minutes(arrival, desired_arrival_time),
            local_slope(&travel, rank),
        );
        results[pos] = Some(StressResult {
            stress_index,
            stress_level: StressLevel::from_index(stress_index),
            lateness_risk: LatenessRisk::classify(arrival, desired_arrival_time),
            minutes_buffer: minutes_buffer(arrival, desired_arrival_time),
        });
    }

    for s in samples.iter().filter(|s| !s.is_valid()) {
        log::warn!(
            "sample at {} excluded from analysis ({:?})",
            s.departure_time,
            s.status
        );
    }

    results
}
