//! Safety stock, reorder level and reorder quantity

use serde::{Deserialize, Serialize};

use super::config::{PlanningConfig, ServiceLevelTable};
use super::lead_time::LeadTimeStats;
use super::stats::non_negative;
use crate::models::LeadTimeBasis;

/// Service-level Z-factor for an ABC tier and coarse class
pub fn z_factor(tier: Option<&str>, coarse_class: Option<&str>, table: &ServiceLevelTable) -> f64 {
    let tier = tier.map(|s| s.trim().to_uppercase()).unwrap_or_default();
    let class = coarse_class
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_default();

    if tier == "A1" {
        table.tier_a1
    } else if class == "A" || tier.starts_with('A') {
        table.class_a
    } else {
        table.default
    }
}

/// Lead time fed into the formulas.
///
/// A1/A2 items use P80, the rest P50; either falls back to the mean, then to
/// the configured constant. A candidate is only taken when positive.
pub fn choose_lead_time(
    tier: Option<&str>,
    stats: &LeadTimeStats,
    config: &PlanningConfig,
) -> (f64, LeadTimeBasis) {
    let tier = tier.map(|s| s.trim().to_uppercase()).unwrap_or_default();
    let (percentile, basis) = if tier == "A1" || tier == "A2" {
        (stats.p80, LeadTimeBasis::P80)
    } else {
        (stats.p50, LeadTimeBasis::P50)
    };

    if percentile.is_finite() && percentile > 0.0 {
        (percentile, basis)
    } else if stats.mean.is_finite() && stats.mean > 0.0 {
        (stats.mean, LeadTimeBasis::Avg)
    } else {
        (config.fallback_lead_days, LeadTimeBasis::Fallback45)
    }
}

/// Inputs of the reorder formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderInputs {
    pub daily_demand_mean: f64,
    pub daily_demand_stddev: f64,
    pub lead_time_used: f64,
    pub z_factor: f64,
    pub coverage_days: u32,
}

/// Reorder formula results, all clamped at zero
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ReorderFigures {
    pub safety_stock_units: f64,
    pub safety_days: f64,
    pub reorder_level: f64,
    pub reorder_qty: f64,
}

/// Apply the reorder formulas:
///
/// - `SS = Z × σ × sqrt(L)`
/// - `safety days = SS / mean`
/// - `ROL = mean × L + SS`
/// - `ROQ = coverage days × mean`
pub fn calculate(inputs: &ReorderInputs) -> ReorderFigures {
    let mean = non_negative(inputs.daily_demand_mean);
    let sigma = non_negative(inputs.daily_demand_stddev);
    let lead = non_negative(inputs.lead_time_used);
    let z = non_negative(inputs.z_factor);

    if mean <= 0.0 || lead <= 0.0 {
        return ReorderFigures::default();
    }

    let safety_stock_units = if sigma > 0.0 && z > 0.0 {
        non_negative(z * sigma * lead.sqrt())
    } else {
        0.0
    };
    let safety_days = non_negative(safety_stock_units / mean);
    let reorder_level = non_negative(mean * lead + safety_stock_units);
    let reorder_qty = non_negative(f64::from(inputs.coverage_days) * mean);

    ReorderFigures {
        safety_stock_units,
        safety_days,
        reorder_level,
        reorder_qty,
    }
}
