//! WebAssembly module for the Reorder Planning service
//!
//! Provides client-side computation for:
//! - Stocking policy previews
//! - Safety stock and reorder level arithmetic
//! - Lead time percentiles
//! - Input validation before a request is sent

use wasm_bindgen::prelude::*;

use shared::planning::policy::{select_policy, PolicyFacts};
use shared::planning::reorder::{calculate, z_factor, ReorderInputs};
use shared::planning::stats::nearest_rank;
use shared::planning::PlanningConfig;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn policy_preview(
    tier: &str,
    xyz: &str,
    fsn: &str,
    customers: u32,
    cv: Option<f64>,
    active_months: u32,
) -> Result<(StockingPolicy, u32), String> {
    let facts = PolicyFacts {
        abc_tier: Some(tier),
        xyz_class: xyz.parse::<XyzClass>()?,
        fsn_class: fsn.parse::<FsnClass>()?,
        customer_count: customers,
        cv,
        active_months,
    };
    Ok(select_policy(&facts, &PlanningConfig::default()))
}

/// Stocking policy for the given classification, e.g. "MTS"
#[wasm_bindgen]
pub fn preview_stocking_policy(
    tier: &str,
    xyz: &str,
    fsn: &str,
    customers: u32,
    cv: Option<f64>,
    active_months: u32,
) -> Result<String, JsValue> {
    policy_preview(tier, xyz, fsn, customers, cv, active_months)
        .map(|(policy, _)| policy.to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Coverage days of the policy the classification selects
#[wasm_bindgen]
pub fn preview_coverage_days(
    tier: &str,
    xyz: &str,
    fsn: &str,
    customers: u32,
    cv: Option<f64>,
    active_months: u32,
) -> Result<u32, JsValue> {
    policy_preview(tier, xyz, fsn, customers, cv, active_months)
        .map(|(_, days)| days)
        .map_err(|e| JsValue::from_str(&e))
}

/// Service-level Z-factor for a tier and coarse class
#[wasm_bindgen]
pub fn service_level_z(tier: &str, coarse_class: &str) -> f64 {
    z_factor(
        Some(tier),
        Some(coarse_class),
        &PlanningConfig::default().service_level,
    )
}

/// Nearest-rank percentile of a list of lead times in days
#[wasm_bindgen]
pub fn lead_time_percentile(samples: Vec<f64>, q: f64) -> f64 {
    let mut sorted: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    nearest_rank(&sorted, q)
}

fn reorder_json(
    daily_mean: f64,
    daily_stddev: f64,
    lead_days: f64,
    z: f64,
    coverage_days: u32,
) -> Result<String, String> {
    let figures = calculate(&ReorderInputs {
        daily_demand_mean: daily_mean,
        daily_demand_stddev: daily_stddev,
        lead_time_used: lead_days,
        z_factor: z,
        coverage_days,
    });
    serde_json::to_string(&figures).map_err(|e| format!("Serialization error: {}", e))
}

/// Safety stock, safety days, ROL and ROQ as a JSON object
#[wasm_bindgen]
pub fn calculate_reorder_figures(
    daily_mean: f64,
    daily_stddev: f64,
    lead_days: f64,
    z: f64,
    coverage_days: u32,
) -> Result<String, JsValue> {
    reorder_json(daily_mean, daily_stddev, lead_days, z, coverage_days)
        .map_err(|e| JsValue::from_str(&e))
}

/// Manual policy reorder level: (safety days + lead days) x daily requirement
#[wasm_bindgen]
pub fn manual_reorder_level(safety_days: f64, lead_days: f64, daily_requirement: f64) -> f64 {
    let value = (safety_days.max(0.0) + lead_days.max(0.0)) * daily_requirement.max(0.0);
    round_to(value, 3)
}

/// Whether a document name is acceptable as an item / cost center / warehouse
#[wasm_bindgen]
pub fn is_valid_identifier(value: &str) -> bool {
    validate_identifier(value).is_ok()
}
