//! Rough CO₂, fuel and time estimates for shifting a departure.
//!
//! All rates are flat per minute of congestion. They size the benefit of
//! leaving at a better slot; they are not an emissions model.

use serde::Serialize;

use crate::report::StressData;
use crate::sample::round_half_up;

pub const CO2_KG_PER_CONGESTION_MINUTE: f64 = 0.02;
pub const FUEL_GALLONS_PER_CONGESTION_MINUTE: f64 = 0.034;
pub const GAS_PRICE_PER_GALLON: f64 = 4.50;
pub const COMMUTE_DAYS_PER_YEAR: f64 = 240.0;
/// Peak-hour commuters on the corridors covered.
pub const PEAK_COMMUTERS: f64 = 10_857.0;

const CO2_KG_PER_TREE_YEAR: f64 = 21.0;
const CO2_KG_PER_PHONE_CHARGE: f64 = 0.005;
const CO2_GRAMS_PER_PHONE_CHARGE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Co2Savings {
    /// Rounded to two decimals.
    pub savings_kg: f64,
    pub savings_grams: i64,
    pub equivalent: String,
}

/// CO₂ saved by taking the slot with `best_delay_minutes` of congestion
/// instead of the one with `worst_delay_minutes`.
pub fn estimate_co2_savings(worst_delay_minutes: i64, best_delay_minutes: i64) -> Co2Savings {
    let saved_minutes = (worst_delay_minutes - best_delay_minutes).max(0);
    let savings_kg = saved_minutes as f64 * CO2_KG_PER_CONGESTION_MINUTE;
    let savings_grams = round_half_up(savings_kg * 1000.0) as i64;

    let equivalent = if savings_grams >= 500 {
        format!("about {:.2} km of driving avoided", savings_grams as f64 / 1000.0)
    } else if savings_grams >= 100 {
        format!(
            "about {} phone charges",
            round_half_up(savings_grams as f64 / CO2_GRAMS_PER_PHONE_CHARGE) as i64
        )
    } else if savings_grams > 0 {
        format!("{savings_grams} g, small but it adds up")
    } else {
        "Similar across all departure times".to_string()
    };

    Co2Savings {
        savings_kg: round_half_up(savings_kg * 100.0) / 100.0,
        savings_grams,
        equivalent,
    }
}

/// CO₂ comparison between the most and least congested slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Co2Comparison {
    #[serde(flatten)]
    pub savings: Co2Savings,
    pub worst_label: String,
    pub best_label: String,
}

/// Compare slots by their own delay over free flow; ties go to the earliest.
pub fn compare_slot_emissions(slots: &[StressData]) -> Option<Co2Comparison> {
    let worst = slots.iter().reduce(|a, b| if b.delay_minutes() > a.delay_minutes() { b } else { a })?;
    let best = slots.iter().reduce(|a, b| if b.delay_minutes() < a.delay_minutes() { b } else { a })?;
    Some(Co2Comparison {
        savings: estimate_co2_savings(worst.delay_minutes(), best.delay_minutes()),
        worst_label: worst.departure_label.clone(),
        best_label: best.departure_label.clone(),
    })
}

/// Yearly effect of one commuter shifting their departure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalImpact {
    pub saved_minutes: i64,
    pub annual_hours: f64,
    pub annual_fuel_cost: f64,
    pub annual_co2_kg: f64,
    pub equivalent: String,
}

/// A shift of `shift_minutes` can save at most the window's peak delay.
pub fn personal_impact(shift_minutes: i64, peak_delay_minutes: i64) -> PersonalImpact {
    let saved_minutes = shift_minutes.min(peak_delay_minutes).max(0);
    let yearly_minutes = saved_minutes as f64 * COMMUTE_DAYS_PER_YEAR;
    let annual_co2_kg = yearly_minutes * CO2_KG_PER_CONGESTION_MINUTE;
    PersonalImpact {
        saved_minutes,
        annual_hours: yearly_minutes / 60.0,
        annual_fuel_cost: yearly_minutes * FUEL_GALLONS_PER_CONGESTION_MINUTE * GAS_PRICE_PER_GALLON,
        annual_co2_kg,
        equivalent: annual_equivalent(annual_co2_kg),
    }
}

fn annual_equivalent(co2_kg: f64) -> String {
    let trees = round_half_up(co2_kg / CO2_KG_PER_TREE_YEAR) as i64;
    if trees >= 1 {
        let plural = if trees > 1 { "s" } else { "" };
        return format!("about {trees} tree{plural} planted");
    }
    let charges = round_half_up(co2_kg / CO2_KG_PER_PHONE_CHARGE) as i64;
    format!("about {charges} phone charges")
}

/// Island-wide effect if a share of peak commuters shifted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityImpact {
    pub shifters: i64,
    pub delay_reduced_minutes: f64,
    pub annual_hours: i64,
    pub annual_co2_tonnes: f64,
    pub congestion_reduction_pct: i64,
}

/// `participation_pct` is 0–100.
pub fn city_impact(
    participation_pct: f64,
    peak_delay_minutes: i64,
    personal_saved_minutes: i64,
) -> CityImpact {
    let rate = participation_pct / 100.0;
    let reduction_factor = 0.6 * rate * (personal_saved_minutes.max(5) as f64 / 10.0);
    let shifters = round_half_up(PEAK_COMMUTERS * rate);
    let delay_reduced_minutes = peak_delay_minutes as f64 * reduction_factor;
    let yearly_minutes = shifters * delay_reduced_minutes * 365.0;

    CityImpact {
        shifters: shifters as i64,
        delay_reduced_minutes,
        annual_hours: round_half_up(yearly_minutes / 60.0) as i64,
        annual_co2_tonnes: round_half_up(yearly_minutes * CO2_KG_PER_CONGESTION_MINUTE / 1000.0 * 10.0)
            / 10.0,
        congestion_reduction_pct: round_half_up(reduction_factor * 100.0) as i64,
    }
}
