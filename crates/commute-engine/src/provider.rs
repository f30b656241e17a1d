//! Traffic providers: the external collaborator that prices each departure.
//!
//! Real providers are network calls and live outside this crate. The two
//! implementations here cover development and replay:
//!
//! - [`SyntheticProvider`]: deterministic Honolulu-shaped traffic curve
//! - [`FixtureProvider`]: recorded samples loaded from JSON
//!
//! [`collect_samples`] fans the calls out in parallel and returns them in
//! departure order, ready for [`crate::analysis::analyze_window`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Timelike};
use rayon::prelude::*;

use crate::calendar::hawaii_offset;
use crate::config::ProviderConfig;
use crate::error::{EngineError, Result};
use crate::sample::{round_half_up, ProviderSample};

/// Status reported by [`FixtureProvider`] for instants it has no record of.
pub const STATUS_NO_DATA: &str = "NO_DATA";

/// Prices one departure instant.
pub trait TrafficProvider {
    fn fetch(&self, departure_time: i64) -> ProviderSample;
}

/// Fetch every departure in parallel; output order matches `departure_times`.
pub fn collect_samples<P>(provider: &P, departure_times: &[i64]) -> Vec<ProviderSample>
where
    P: TrafficProvider + Sync + ?Sized,
{
    departure_times
        .par_iter()
        .map(|&t| provider.fetch(t))
        .collect()
}

/// Build the provider named by configuration.
///
/// # Errors
///
/// Propagates fixture loading errors.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn TrafficProvider + Send + Sync>> {
    match config {
        ProviderConfig::Synthetic { free_flow_seconds } => {
            Ok(Box::new(SyntheticProvider::new(*free_flow_seconds)))
        }
        ProviderConfig::Fixture { path } => Ok(Box::new(FixtureProvider::load(path)?)),
    }
}

// ── SyntheticProvider ───────────────────────────────────────────────────────

/// Traffic-over-free-flow multipliers by local hour.
const HOURLY_PROFILE: [(u32, f64); 16] = [
    (5, 1.05),
    (6, 1.15),
    (7, 1.45),
    (8, 1.65),
    (9, 1.35),
    (10, 1.15),
    (11, 1.1),
    (12, 1.2),
    (13, 1.2),
    (14, 1.15),
    (15, 1.3),
    (16, 1.55),
    (17, 1.7),
    (18, 1.5),
    (19, 1.2),
    (20, 1.1),
];

const PROFILE_DEFAULT: f64 = 1.1;

/// Deterministic stand-in for the traffic provider.
///
/// Multipliers are interpolated linearly between whole local hours and never
/// drop below free flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProvider {
    free_flow_seconds: i64,
}

impl SyntheticProvider {
    pub fn new(free_flow_seconds: i64) -> Self {
        SyntheticProvider { free_flow_seconds }
    }

    fn multiplier_at(departure_time: i64) -> f64 {
        let Some(utc) = DateTime::from_timestamp(departure_time, 0) else {
            return PROFILE_DEFAULT;
        };
        let local = utc.with_timezone(&hawaii_offset());
        let hour = local.hour();
        let fraction = f64::from(local.minute()) / 60.0;
        let upper_hour = if local.minute() == 0 { hour } else { hour + 1 };

        let lower = hourly_multiplier(hour);
        let upper = hourly_multiplier(upper_hour);
        (lower + (upper - lower) * fraction).max(1.0)
    }
}

fn hourly_multiplier(hour: u32) -> f64 {
    HOURLY_PROFILE
        .iter()
        .find(|(h, _)| *h == hour)
        .map_or(PROFILE_DEFAULT, |(_, m)| *m)
}

impl TrafficProvider for SyntheticProvider {
    fn fetch(&self, departure_time: i64) -> ProviderSample {
        let traffic = round_half_up(self.free_flow_seconds as f64 * Self::multiplier_at(departure_time));
        ProviderSample::ok(departure_time, self.free_flow_seconds, traffic as i64)
    }
}

// ── FixtureProvider ─────────────────────────────────────────────────────────

/// Replays recorded provider samples keyed by departure time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureProvider {
    samples: BTreeMap<i64, ProviderSample>,
}

impl FixtureProvider {
    pub fn new(samples: impl IntoIterator<Item = ProviderSample>) -> Self {
        FixtureProvider {
            samples: samples.into_iter().map(|s| (s.departure_time, s)).collect(),
        }
    }

    /// Parse a JSON array of provider samples.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSamples`] if the document does not parse.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let samples: Vec<ProviderSample> = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidSamples(format!("fixture: {e}")))?;
        Ok(Self::new(samples))
    }

    /// Load a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSamples`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidSamples(format!("'{}': {}", path.display(), e))
        })?;
        log::debug!("loaded fixture {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl TrafficProvider for FixtureProvider {
    fn fetch(&self, departure_time: i64) -> ProviderSample {
        self.samples
            .get(&departure_time)
            .cloned()
            .unwrap_or_else(|| ProviderSample::failed(departure_time, STATUS_NO_DATA))
    }
}
