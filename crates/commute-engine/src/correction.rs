//! Pre-processing of provider traffic durations before analysis.
//!
//! The provider's `durationInTrafficSeconds` tends to run short on Oahu peak
//! hours. A [`TrafficCorrection`] rewrites that one field per sample and is
//! applied ahead of the stress engine, which never knows whether a correction
//! ran. Swapping models does not touch the engine.

use chrono::{DateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::hawaii_offset;
use crate::sample::{round_half_up, ProviderSample, SampleStatus};

/// Adjusts a predicted traffic duration for a given departure instant.
pub trait TrafficCorrection {
    /// Corrected traffic duration in seconds.
    fn correct(&self, departure_time: i64, traffic_seconds: i64) -> i64;
}

/// Leaves provider durations untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl TrafficCorrection for Passthrough {
    fn correct(&self, _departure_time: i64, traffic_seconds: i64) -> i64 {
        traffic_seconds
    }
}

/// A multiplier applied to departures in `[start_minute, end_minute)` of the
/// local (UTC−10:00) day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierBand {
    pub start_minute: u32,
    pub end_minute: u32,
    pub multiplier: f64,
}

const fn band(start_minute: u32, end_minute: u32, multiplier: f64) -> MultiplierBand {
    MultiplierBand {
        start_minute,
        end_minute,
        multiplier,
    }
}

/// Honolulu peak profile, checked in order.
pub const HONOLULU_BANDS: [MultiplierBand; 5] = [
    band(6 * 60 + 30, 9 * 60, 1.9), // AM peak
    band(16 * 60 + 30, 19 * 60, 1.7), // PM peak
    band(9 * 60, 11 * 60, 1.4), // after AM peak
    band(15 * 60, 16 * 60 + 30, 1.3), // before PM peak
    band(5 * 60, 6 * 60 + 30, 1.3), // early AM
];

/// Multiplier outside every band (midday, evening, overnight).
pub const OFF_PEAK_MULTIPLIER: f64 = 1.1;

/// Time-of-day multiplier on the traffic duration.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDayMultiplier {
    bands: Vec<MultiplierBand>,
    fallback: f64,
}

impl Default for TimeOfDayMultiplier {
    fn default() -> Self {
        TimeOfDayMultiplier {
            bands: HONOLULU_BANDS.to_vec(),
            fallback: OFF_PEAK_MULTIPLIER,
        }
    }
}

impl TimeOfDayMultiplier {
    pub fn new(bands: Vec<MultiplierBand>, fallback: f64) -> Self {
        TimeOfDayMultiplier { bands, fallback }
    }

    /// The multiplier for a departure instant. Seconds are ignored.
    pub fn multiplier_at(&self, departure_time: i64) -> f64 {
        let Some(utc) = DateTime::from_timestamp(departure_time, 0) else {
            return self.fallback;
        };
        let local = utc.with_timezone(&hawaii_offset());
        let minute_of_day = local.hour() * 60 + local.minute();
        self.bands
            .iter()
            .find(|b| minute_of_day >= b.start_minute && minute_of_day < b.end_minute)
            .map_or(self.fallback, |b| b.multiplier)
    }
}

impl TrafficCorrection for TimeOfDayMultiplier {
    fn correct(&self, departure_time: i64, traffic_seconds: i64) -> i64 {
        round_half_up(traffic_seconds as f64 * self.multiplier_at(departure_time)) as i64
    }
}

/// Correction models selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionModel {
    #[default]
    None,
    TimeOfDay,
}

impl CorrectionModel {
    pub fn build(self) -> Box<dyn TrafficCorrection + Send + Sync> {
        match self {
            CorrectionModel::None => Box::new(Passthrough),
            CorrectionModel::TimeOfDay => Box::new(TimeOfDayMultiplier::default()),
        }
    }
}

/// Apply `correction` to every priced sample; failed samples pass through.
pub fn apply_correction(
    correction: &dyn TrafficCorrection,
    samples: &[ProviderSample],
) -> Vec<ProviderSample> {
    samples
        .iter()
        .map(|s| {
            if !SampleStatus::from_provider(&s.status).is_ok() {
                return s.clone();
            }
            ProviderSample {
                duration_in_traffic_seconds: correction
                    .correct(s.departure_time, s.duration_in_traffic_seconds),
                ..s.clone()
            }
        })
        .collect()
}
