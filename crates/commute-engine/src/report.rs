//! Per-slot output documents consumed by the UI.

use serde::{Deserialize, Serialize};

use crate::stress::{LatenessRisk, StressLevel};

/// Analysis of one priced departure slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressData {
    pub departure_label: String,
    pub arrival_label: String,
    /// Free-flow minutes for this slot.
    pub duration_minutes: i64,
    pub duration_in_traffic_minutes: i64,
    pub stress_index: u32,
    pub stress_level: StressLevel,
    pub lateness_risk: LatenessRisk,
    pub minutes_buffer: i64,
}

impl StressData {
    /// Traffic minutes above this slot's own free-flow time.
    pub fn delay_minutes(&self) -> i64 {
        self.duration_in_traffic_minutes - self.duration_minutes
    }
}

/// A slot the provider could not price. Shown as unknown, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableSlot {
    pub departure_label: String,
    pub arrival_label: String,
    pub status: String,
}

/// One position of the window, in departure order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotOutcome {
    Analyzed(StressData),
    Unavailable(UnavailableSlot),
}

impl SlotOutcome {
    pub fn departure_label(&self) -> &str {
        match self {
            SlotOutcome::Analyzed(d) => &d.departure_label,
            SlotOutcome::Unavailable(u) => &u.departure_label,
        }
    }

    pub fn as_analyzed(&self) -> Option<&StressData> {
        match self {
            SlotOutcome::Analyzed(d) => Some(d),
            SlotOutcome::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed() -> StressData {
        StressData {
            departure_label: "6:53 AM".to_string(),
            arrival_label: "7:23 AM".to_string(),
            duration_minutes: 20,
            duration_in_traffic_minutes: 30,
            stress_index: 50,
            stress_level: StressLevel::Moderate,
            lateness_risk: LatenessRisk::OnTime,
            minutes_buffer: 37,
        }
    }

    #[test]
    fn test_stress_data_wire_shape() {
        let value = serde_json::to_value(analyzed()).unwrap();
        assert_eq!(value["departureLabel"], "6:53 AM");
        assert_eq!(value["durationInTrafficMinutes"], 30);
        assert_eq!(value["stressLevel"], "moderate");
        assert_eq!(value["latenessRisk"], "green");
        assert_eq!(value["minutesBuffer"], 37);
    }

    #[test]
    fn test_untagged_slots_round_trip_by_shape() {
        let slots = vec![
            SlotOutcome::Analyzed(analyzed()),
            SlotOutcome::Unavailable(UnavailableSlot {
                departure_label: "7:03 AM".to_string(),
                arrival_label: "--".to_string(),
                status: "API_ERROR".to_string(),
            }),
        ];
        let json = serde_json::to_string(&slots).unwrap();
        let back: Vec<SlotOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slots);
        assert!(back[1].as_analyzed().is_none());
        assert_eq!(back[1].departure_label(), "7:03 AM");
    }

    #[test]
    fn test_delay_minutes() {
        assert_eq!(analyzed().delay_minutes(), 10);
    }
}
