//! Validation utilities for planning inputs and configuration

use crate::planning::{PlanningConfig, PlanningError, PlanningResult};

/// Longest document name accepted for items, cost centers and warehouses
pub const MAX_IDENTIFIER_LEN: usize = 140;

// ============================================================================
// Identifier Validations
// ============================================================================

/// Validate an item / cost center / warehouse / company name
pub fn validate_identifier(value: &str) -> Result<(), &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Identifier cannot be blank");
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err("Identifier is too long");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Identifier cannot contain control characters");
    }
    Ok(())
}

// ============================================================================
// Quantity Validations
// ============================================================================

/// Validate a day count supplied by a planner (safety or coverage days)
pub fn validate_days(days: f64) -> Result<(), &'static str> {
    if !days.is_finite() {
        return Err("Days must be a finite number");
    }
    if days < 0.0 {
        return Err("Days cannot be negative");
    }
    if days > 3650.0 {
        return Err("Days cannot exceed ten years");
    }
    Ok(())
}

/// Validate a reorder level or quantity
pub fn validate_quantity(qty: f64) -> Result<(), &'static str> {
    if !qty.is_finite() || qty < 0.0 {
        return Err("Quantity must be a non-negative number");
    }
    Ok(())
}

// ============================================================================
// Configuration Validations
// ============================================================================

/// Weekly demand window must be a half or full year
pub fn validate_weeks_back(weeks: u32) -> Result<(), &'static str> {
    match weeks {
        26 | 52 => Ok(()),
        _ => Err("weeks_back must be 26 or 52"),
    }
}

/// Check a planning configuration before it is used
pub fn validate_planning_config(config: &PlanningConfig) -> PlanningResult<()> {
    let invalid = |msg: &str| PlanningError::InvalidConfig(msg.to_string());

    validate_weeks_back(config.weeks_back).map_err(invalid)?;

    if config.lt_window_days <= 0 {
        return Err(invalid("lt_window_days must be positive"));
    }
    if config.classification_months == 0 {
        return Err(invalid("classification_months must be positive"));
    }
    if config.manual_sales_months == 0 {
        return Err(invalid("manual_sales_months must be positive"));
    }
    if !config.fallback_lead_days.is_finite() || config.fallback_lead_days <= 0.0 {
        return Err(invalid("fallback_lead_days must be positive"));
    }

    let z = &config.service_level;
    if [z.tier_a1, z.class_a, z.default]
        .iter()
        .any(|v| !v.is_finite() || *v <= 0.0)
    {
        return Err(invalid("service level Z-factors must be positive"));
    }

    let t = &config.thresholds;
    if t.xyz_x_max_cv < 0.0 || t.xyz_y_max_cv < t.xyz_x_max_cv {
        return Err(invalid("xyz thresholds must satisfy 0 <= x <= y"));
    }
    if t.fsn_slow_min_months > t.fsn_fast_min_months {
        return Err(invalid("fsn slow threshold cannot exceed the fast threshold"));
    }

    let c = &config.coverage;
    if c.mto > c.mts_lite || c.mts_lite > c.mts {
        return Err(invalid("coverage days must satisfy MTO <= MTS-Lite <= MTS"));
    }

    Ok(())
}
