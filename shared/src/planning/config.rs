//! Planning parameters passed explicitly into every component

use serde::{Deserialize, Serialize};

/// Lookback windows, thresholds and service levels of the planning engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanningConfig {
    /// Weekly demand window, 26 or 52 weeks
    pub weeks_back: u32,
    /// Receipt window for lead time statistics
    pub lt_window_days: i64,
    /// Window of the monthly (T12) demand profile
    pub classification_months: u32,
    /// Window of the manual policy's sales requirement
    pub manual_sales_months: u32,
    /// Lead time used when no history exists
    pub fallback_lead_days: f64,
    pub service_level: ServiceLevelTable,
    pub thresholds: ClassificationThresholds,
    pub coverage: CoverageDays,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            weeks_back: 52,
            lt_window_days: 730,
            classification_months: 12,
            manual_sales_months: 3,
            fallback_lead_days: 45.0,
            service_level: ServiceLevelTable::default(),
            thresholds: ClassificationThresholds::default(),
            coverage: CoverageDays::default(),
        }
    }
}

/// Z-factors by ABC tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceLevelTable {
    /// Tier A1, ~99% service level
    pub tier_a1: f64,
    /// Coarse class A or any other A tier, ~98%
    pub class_a: f64,
    /// Everything else including unclassified items, ~97.5%
    pub default: f64,
}

impl Default for ServiceLevelTable {
    fn default() -> Self {
        Self {
            tier_a1: 2.32634787404084,
            class_a: 2.05374891063182,
            default: 1.95996398454005,
        }
    }
}

/// XYZ / FSN thresholds and the policy table gates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub xyz_x_max_cv: f64,
    pub xyz_y_max_cv: f64,
    pub fsn_fast_min_months: u32,
    pub fsn_slow_min_months: u32,
    pub min_customers: u32,
    pub override_max_cv: f64,
    pub override_min_customers: u32,
    pub override_min_active_months: u32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            xyz_x_max_cv: 0.75,
            xyz_y_max_cv: 1.25,
            fsn_fast_min_months: 9,
            fsn_slow_min_months: 4,
            min_customers: 2,
            override_max_cv: 1.75,
            override_min_customers: 5,
            override_min_active_months: 6,
        }
    }
}

/// Coverage days per stocking policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoverageDays {
    pub mts: u32,
    pub mts_lite: u32,
    pub mto: u32,
}

impl Default for CoverageDays {
    fn default() -> Self {
        Self {
            mts: 40,
            mts_lite: 20,
            mto: 0,
        }
    }
}
