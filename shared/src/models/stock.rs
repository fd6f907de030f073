//! Stock snapshot and coverage models

use serde::{Deserialize, Serialize};

/// Bin quantities summed over the warehouses of a cost center
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StockSnapshot {
    pub on_hand_qty: f64,
    pub projected_qty: f64,
    pub reserved_qty: f64,
    pub ordered_qty: f64,
}

/// Informational coverage metrics derived from a stock snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StockCoverage {
    pub on_hand_qty: f64,
    pub projected_qty: f64,
    pub reserved_qty: f64,
    pub ordered_qty: f64,
    /// Days of average demand covered by on-hand stock
    pub on_hand_coverage_days: f64,
    /// Days of average demand covered by projected stock
    pub projected_coverage_days: f64,
    /// Surplus (positive) or shortage (negative) of projected stock against the ROL
    pub projected_minus_rol: f64,
}
