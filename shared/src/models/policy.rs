//! Reorder policy input and output models

use serde::{Deserialize, Serialize};

use super::{DemandProfile, FsnClass, StockCoverage, XyzClass};

/// The only true input of a policy computation; everything else is derived
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyInput {
    pub item: String,
    pub cost_center: String,
    pub company: String,
    pub warehouse: Option<String>,
}

impl PolicyInput {
    pub fn new(item: &str, cost_center: &str, company: &str) -> Self {
        Self {
            item: item.to_string(),
            cost_center: cost_center.to_string(),
            company: company.to_string(),
            warehouse: None,
        }
    }

    pub fn with_warehouse(mut self, warehouse: &str) -> Self {
        self.warehouse = Some(warehouse.to_string());
        self
    }

    /// Item and cost center are both required; anything else degrades to zeros
    pub fn is_complete(&self) -> bool {
        !self.item.trim().is_empty() && !self.cost_center.trim().is_empty()
    }
}

/// Stocking policy recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StockingPolicy {
    /// Make-to-Stock, full buffer
    #[serde(rename = "MTS")]
    Mts,
    /// Make-to-Stock-Lite, reduced buffer
    #[serde(rename = "MTS-Lite")]
    MtsLite,
    /// Make-to-Order, no buffer
    #[serde(rename = "MTO")]
    Mto,
}

impl StockingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockingPolicy::Mts => "MTS",
            StockingPolicy::MtsLite => "MTS-Lite",
            StockingPolicy::Mto => "MTO",
        }
    }
}

impl std::fmt::Display for StockingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which lead time estimate ended up in the reorder formulas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LeadTimeBasis {
    #[serde(rename = "P80")]
    P80,
    #[serde(rename = "P50")]
    P50,
    #[serde(rename = "AVG")]
    Avg,
    #[serde(rename = "FALLBACK_45")]
    Fallback45,
}

impl LeadTimeBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadTimeBasis::P80 => "P80",
            LeadTimeBasis::P50 => "P50",
            LeadTimeBasis::Avg => "AVG",
            LeadTimeBasis::Fallback45 => "FALLBACK_45",
        }
    }
}

impl std::fmt::Display for LeadTimeBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the numbers can be trusted
///
/// A zero ROL with `None` confidence means "no data", not "no reorder needed".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::High => "high",
        }
    }
}

/// Complete result of one policy computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyOutput {
    pub daily_demand_mean: f64,
    pub daily_demand_stddev: f64,
    pub lead_time_p50: f64,
    pub lead_time_p80: f64,
    pub lead_time_mean: f64,
    pub lead_time_used: f64,
    /// `None` only when the input was incomplete
    pub lead_time_basis: Option<LeadTimeBasis>,
    pub abc_class: Option<String>,
    pub xyz_class: XyzClass,
    pub fsn_class: FsnClass,
    pub policy: StockingPolicy,
    pub coverage_days: u32,
    pub z_factor: f64,
    pub safety_stock_units: f64,
    pub safety_days: f64,
    pub reorder_level: f64,
    pub reorder_qty: f64,
    pub confidence: Confidence,
}

impl PolicyOutput {
    /// Output for an incomplete input: every metric zero, most conservative classes
    pub fn zeroed() -> Self {
        Self {
            daily_demand_mean: 0.0,
            daily_demand_stddev: 0.0,
            lead_time_p50: 0.0,
            lead_time_p80: 0.0,
            lead_time_mean: 0.0,
            lead_time_used: 0.0,
            lead_time_basis: None,
            abc_class: None,
            xyz_class: XyzClass::Z,
            fsn_class: FsnClass::N,
            policy: StockingPolicy::Mto,
            coverage_days: 0,
            z_factor: 0.0,
            safety_stock_units: 0.0,
            safety_days: 0.0,
            reorder_level: 0.0,
            reorder_qty: 0.0,
            confidence: Confidence::None,
        }
    }
}

/// Policy output plus the classifier detail and stock coverage for one item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemPlan {
    pub item: String,
    pub cost_center: String,
    pub policy: PolicyOutput,
    pub profile: DemandProfile,
    pub stock: StockCoverage,
}

impl ItemPlan {
    pub fn cleared(item: &str, cost_center: &str) -> Self {
        Self {
            item: item.to_string(),
            cost_center: cost_center.to_string(),
            policy: PolicyOutput::zeroed(),
            profile: DemandProfile::default(),
            stock: StockCoverage::default(),
        }
    }
}
