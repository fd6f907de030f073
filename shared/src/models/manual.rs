//! Manual (user-parameterised) planning policy models

use serde::{Deserialize, Serialize};

/// Inputs of a manual planning policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualPolicyInput {
    pub item: String,
    pub company: Option<String>,
    pub cost_center: Option<String>,
    pub warehouse: Option<String>,
    /// Buffer the planner wants to hold, in days of demand
    #[serde(default)]
    pub safety_days: f64,
    /// Days of demand each replenishment should cover
    #[serde(default)]
    pub coverage_days: f64,
}

/// Computed fields of a manual planning policy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManualPolicyOutput {
    pub last_3_month_sales_qty: f64,
    pub monthly_requirement: f64,
    pub daily_requirement: f64,
    pub lead_days: f64,
    pub minimum_inventory_qty: f64,
    pub rol: f64,
    pub roq: f64,
}
