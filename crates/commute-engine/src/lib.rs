//! # commute-engine
//!
//! Departure-time analysis for Oahu commutes.
//!
//! Given a weekly departure window and an arrival goal, the engine resolves
//! the window to concrete instants in Hawaii time (UTC−10:00, no daylight
//! saving), scores each provider-priced departure with a bounded stress index
//! and lateness risk, and ranks the window's slots. All computation is pure
//! and takes "now" as an explicit input.
//!
//! ## Modules
//!
//! - [`calendar`]: fixed-offset window resolution, rollover and departure instants
//! - [`label`]: 12-hour clock labels in Hawaii time
//! - [`sample`]: provider samples and their validity
//! - [`correction`]: optional time-of-day correction of traffic durations
//! - [`provider`]: traffic provider seam with synthetic and fixture implementations
//! - [`stress`]: stress index, stress level and lateness risk
//! - [`report`]: per-slot output documents
//! - [`ranking`]: best/worst slot, time saved and trend
//! - [`analysis`]: window planning and analysis entry points
//! - [`narrative`]: rule-based commentary
//! - [`impact`]: CO₂, fuel and time estimates
//! - [`school`]: Hawaii DOE school-day lookup
//! - [`config`]: TOML analyzer configuration
//! - [`error`]: error types

pub mod analysis;
pub mod calendar;
pub mod config;
pub mod correction;
pub mod error;
pub mod impact;
pub mod label;
pub mod narrative;
pub mod provider;
pub mod ranking;
pub mod report;
pub mod sample;
pub mod school;
pub mod stress;

pub use analysis::{analyze_window, plan_window, WindowAnalysis, WindowPlan, WindowRequest};
pub use calendar::{
    generate_departure_times, hawaii_offset, parse_clock_time, resolve_window, weekday_from_index,
    ResolvedWindow, HAWAII_UTC_OFFSET_SECONDS, MAX_DEPARTURE_SLOTS,
};
pub use config::{AnalyzerConfig, ProviderConfig};
pub use correction::{apply_correction, CorrectionModel, TimeOfDayMultiplier, TrafficCorrection};
pub use error::EngineError;
pub use impact::{
    city_impact, compare_slot_emissions, estimate_co2_savings, personal_impact, CityImpact,
    Co2Comparison, Co2Savings, PersonalImpact,
};
pub use label::format_clock_label;
pub use narrative::{commentary, Commentary};
pub use provider::{build_provider, collect_samples, FixtureProvider, SyntheticProvider, TrafficProvider};
pub use ranking::{best_slot, summarize, time_saved_minutes, trend, worst_slot, Trend, WindowSummary};
pub use report::{SlotOutcome, StressData, UnavailableSlot};
pub use sample::{DepartureSample, ProviderSample, SampleStatus};
pub use school::{school_day_at, school_day_info, SchoolDayInfo};
pub use stress::{
    analyze_samples, compute_stress_index, LatenessRisk, StressLevel, StressResult,
};
