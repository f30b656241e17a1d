//! Traffic samples: the provider's wire shape and the engine's view of it.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Provider status string for a priced sample.
pub const STATUS_OK: &str = "OK";

/// Outcome of one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleStatus {
    Ok,
    /// The provider answered but had no route or prediction for this instant.
    NoData,
    /// The call failed or the provider reported an error.
    ProviderError,
}

impl SampleStatus {
    /// Map a raw provider status. Anything that is not `"OK"` is excluded
    /// from numeric work; a few well-known "nothing found" codes are kept
    /// apart from hard failures.
    pub fn from_provider(status: &str) -> Self {
        match status {
            STATUS_OK => SampleStatus::Ok,
            "NO_DATA" | "ZERO_RESULTS" | "NOT_FOUND" => SampleStatus::NoData,
            _ => SampleStatus::ProviderError,
        }
    }

    pub fn is_ok(self) -> bool {
        self == SampleStatus::Ok
    }
}

/// A decoded provider response for one departure timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSample {
    pub departure_time: i64,
    /// Free-flow duration.
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default)]
    pub duration_in_traffic_seconds: i64,
    pub status: String,
}

impl ProviderSample {
    pub fn ok(departure_time: i64, duration_seconds: i64, duration_in_traffic_seconds: i64) -> Self {
        ProviderSample {
            departure_time,
            duration_seconds,
            duration_in_traffic_seconds,
            status: STATUS_OK.to_string(),
        }
    }

    pub fn failed(departure_time: i64, status: impl Into<String>) -> Self {
        ProviderSample {
            departure_time,
            duration_seconds: 0,
            duration_in_traffic_seconds: 0,
            status: status.into(),
        }
    }
}

/// One slot of a departure window as the engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartureSample {
    pub departure_time: i64,
    pub free_flow_seconds: i64,
    pub traffic_seconds: i64,
    pub status: SampleStatus,
}

impl DepartureSample {
    pub fn arrival_time(&self) -> i64 {
        self.departure_time.saturating_add(self.traffic_seconds)
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_ok()
    }

    /// Traffic duration in whole minutes, rounded half up.
    pub fn traffic_minutes(&self) -> i64 {
        round_half_up(self.traffic_seconds as f64 / 60.0) as i64
    }

    /// Free-flow duration in whole minutes, rounded half up.
    pub fn free_flow_minutes(&self) -> i64 {
        round_half_up(self.free_flow_seconds as f64 / 60.0) as i64
    }
}

impl From<&ProviderSample> for DepartureSample {
    fn from(raw: &ProviderSample) -> Self {
        DepartureSample {
            departure_time: raw.departure_time,
            free_flow_seconds: raw.duration_seconds,
            traffic_seconds: raw.duration_in_traffic_seconds,
            status: SampleStatus::from_provider(&raw.status),
        }
    }
}

/// Convert provider output into engine samples, checking departure order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSamples`] if departure times are not
/// strictly increasing, or a departure or its arrival is not a representable
/// instant.
pub fn to_departure_samples(raw: &[ProviderSample]) -> Result<Vec<DepartureSample>> {
    if let Some(s) = raw.iter().find(|s| !instants_in_range(s)) {
        return Err(EngineError::InvalidSamples(format!(
            "departure {} with {} s in traffic is out of range",
            s.departure_time, s.duration_in_traffic_seconds
        )));
    }
    if let Some(pair) = raw
        .windows(2)
        .find(|p| p[1].departure_time <= p[0].departure_time)
    {
        return Err(EngineError::InvalidSamples(format!(
            "departure times must be strictly increasing ({} then {})",
            pair[0].departure_time, pair[1].departure_time
        )));
    }
    Ok(raw.iter().map(DepartureSample::from).collect())
}

fn instants_in_range(sample: &ProviderSample) -> bool {
    let representable = |t: i64| DateTime::from_timestamp(t, 0).is_some();
    representable(sample.departure_time)
        && sample
            .departure_time
            .checked_add(sample.duration_in_traffic_seconds)
            .is_some_and(representable)
}

/// Round to the nearest integer with halves going toward +∞ (`-1.5 → -1`).
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SampleStatus::from_provider("OK"), SampleStatus::Ok);
        assert_eq!(SampleStatus::from_provider("ZERO_RESULTS"), SampleStatus::NoData);
        assert_eq!(SampleStatus::from_provider("API_ERROR"), SampleStatus::ProviderError);
        assert_eq!(SampleStatus::from_provider("ok"), SampleStatus::ProviderError);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = r#"{"departureTime":100,"durationSeconds":1200,"durationInTrafficSeconds":1800,"status":"OK"}"#;
        let raw: ProviderSample = serde_json::from_str(json).unwrap();
        assert_eq!(raw, ProviderSample::ok(100, 1200, 1800));
    }

    #[test]
    fn test_failed_sample_may_omit_durations() {
        let json = r#"{"departureTime":100,"status":"API_ERROR"}"#;
        let raw: ProviderSample = serde_json::from_str(json).unwrap();
        let sample = DepartureSample::from(&raw);
        assert!(!sample.is_valid());
        assert_eq!(sample.status, SampleStatus::ProviderError);
    }

    #[test]
    fn test_arrival_and_minutes() {
        let sample = DepartureSample::from(&ProviderSample::ok(1000, 1230, 1770));
        assert_eq!(sample.arrival_time(), 2770);
        assert_eq!(sample.traffic_minutes(), 30); // 29.5 rounds up
        assert_eq!(sample.free_flow_minutes(), 21); // 20.5 rounds up
    }

    #[test]
    fn test_round_half_up_negative() {
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
        assert_eq!(round_half_up(2.5), 3.0);
    }

    #[test]
    fn test_out_of_order_samples_rejected() {
        let raw = vec![ProviderSample::ok(200, 60, 60), ProviderSample::ok(100, 60, 60)];
        let err = to_departure_samples(&raw).unwrap_err().to_string();
        assert!(err.contains("strictly increasing"), "got: {err}");
    }

    #[test]
    fn test_out_of_range_instants_rejected() {
        let err = to_departure_samples(&[ProviderSample::ok(i64::MAX - 10, 1200, 1800)])
            .unwrap_err()
            .to_string();
        assert!(err.contains("out of range"), "got: {err}");
        assert!(to_departure_samples(&[ProviderSample::ok(i64::MIN, 1200, 1800)]).is_err());
    }

    #[test]
    fn test_arrival_saturates() {
        let sample = DepartureSample::from(&ProviderSample::ok(i64::MAX - 10, 1200, 1800));
        assert_eq!(sample.arrival_time(), i64::MAX);
    }
}
