//! Rule-based commentary on an analyzed window.
//!
//! Three short strings (headline, detail, tip) chosen from the window
//! summary. Wording only; no figures are computed here that
//! [`crate::ranking::summarize`] does not already provide.

use serde::Serialize;

use crate::ranking::{summarize, Trend, WindowSummary};
use crate::report::StressData;

/// Savings at or above this many minutes get the emphatic headline.
const BIG_SAVING_MINUTES: i64 = 15;
const NOTABLE_SAVING_MINUTES: i64 = 5;
const YEARLY_TIP_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commentary {
    pub headline: String,
    pub detail: String,
    pub tip: String,
}

/// Commentary for the analyzed slots of a window, in departure order.
pub fn commentary(slots: &[StressData]) -> Commentary {
    match summarize(slots) {
        Some(summary) => commentary_for(&summary),
        None => Commentary {
            headline: "Hmm, no data came back.".to_string(),
            detail: "Check the origin and destination; the traffic service sometimes needs a moment."
                .to_string(),
            tip: String::new(),
        },
    }
}

fn commentary_for(s: &WindowSummary) -> Commentary {
    let best = &s.best_departure_label;
    let worst = &s.worst_departure_label;
    let saved = s.time_saved_minutes;

    let headline = if s.all_late {
        "Every slot in this window runs late. The whole window may need to move earlier.".to_string()
    } else if s.any_on_time && saved >= BIG_SAVING_MINUTES {
        format!("Leaving at {best} instead of {worst} saves {saved} minutes. That's a big one.")
    } else if s.any_on_time && saved >= NOTABLE_SAVING_MINUTES {
        format!("Leaving at {best} saves about {saved} minutes compared to {worst}.")
    } else {
        "Traffic is fairly consistent across this window; timing doesn't change much here."
            .to_string()
    };

    let detail = match s.trend {
        Trend::Worsening => format!(
            "Traffic gets heavier as the window goes on. The earlier you leave the smoother it is, and {best} looks like the sweet spot."
        ),
        Trend::Improving => format!(
            "Traffic actually eases later in this window. {best} is worth trying if your schedule allows."
        ),
    };

    let tip = if s.all_late {
        "Try moving the departure window 15 to 30 minutes earlier, or relax the arrival goal."
            .to_string()
    } else if saved >= YEARLY_TIP_MINUTES {
        format!("{saved} minutes of timing difference adds up quickly over a year of commuting.")
    } else {
        "Not a big gap here, but other days or routes can differ a lot. Worth checking again."
            .to_string()
    };

    Commentary {
        headline,
        detail,
        tip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::{LatenessRisk, StressLevel};

    fn slot(label: &str, traffic: i64, risk: LatenessRisk) -> StressData {
        StressData {
            departure_label: label.to_string(),
            arrival_label: "--".to_string(),
            duration_minutes: 20,
            duration_in_traffic_minutes: traffic,
            stress_index: 0,
            stress_level: StressLevel::Stable,
            lateness_risk: risk,
            minutes_buffer: 0,
        }
    }

    #[test]
    fn test_empty_window() {
        let c = commentary(&[]);
        assert_eq!(c.headline, "Hmm, no data came back.");
        assert!(c.tip.is_empty());
    }

    #[test]
    fn test_all_late() {
        let c = commentary(&[
            slot("7:00 AM", 40, LatenessRisk::Late),
            slot("7:10 AM", 45, LatenessRisk::Late),
        ]);
        assert!(c.headline.starts_with("Every slot"), "got: {}", c.headline);
        assert!(c.tip.contains("15 to 30 minutes earlier"), "got: {}", c.tip);
    }

    #[test]
    fn test_big_saving_worsening() {
        let c = commentary(&[
            slot("6:30 AM", 25, LatenessRisk::OnTime),
            slot("6:40 AM", 30, LatenessRisk::OnTime),
            slot("6:50 AM", 42, LatenessRisk::Tight),
            slot("7:00 AM", 45, LatenessRisk::Late),
        ]);
        assert!(c.headline.contains("6:30 AM instead of 7:00 AM saves 20 minutes"), "got: {}", c.headline);
        assert!(c.detail.contains("heavier"), "got: {}", c.detail);
        assert!(c.tip.starts_with("20 minutes"), "got: {}", c.tip);
    }

    #[test]
    fn test_notable_saving_improving() {
        let c = commentary(&[
            slot("7:00 AM", 38, LatenessRisk::OnTime),
            slot("7:10 AM", 32, LatenessRisk::OnTime),
        ]);
        assert_eq!(c.headline, "Leaving at 7:10 AM saves about 6 minutes compared to 7:00 AM.");
        assert!(c.detail.contains("eases"), "got: {}", c.detail);
        assert!(c.tip.starts_with("Not a big gap"), "got: {}", c.tip);
    }

    #[test]
    fn test_saving_without_on_time_slot_is_consistent() {
        let c = commentary(&[
            slot("7:00 AM", 30, LatenessRisk::Tight),
            slot("7:10 AM", 50, LatenessRisk::Late),
        ]);
        assert!(c.headline.starts_with("Traffic is fairly consistent"), "got: {}", c.headline);
        assert!(c.tip.starts_with("20 minutes"), "got: {}", c.tip);
    }
}
