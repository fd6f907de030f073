//! Item classification models (ABC / XYZ / FSN)

use serde::{Deserialize, Serialize};

/// ABC record for an (item, cost center) pair, maintained outside the engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationRecord {
    pub item: String,
    pub cost_center: String,
    /// Fine tier such as "A1", "A2", "B1"
    pub tier: String,
    /// Coarse class such as "A", "B", "C"
    pub coarse_class: String,
}

impl ClassificationRecord {
    /// Tier trimmed and upper-cased, as used by the decision table
    pub fn normalized_tier(&self) -> String {
        self.tier.trim().to_uppercase()
    }

    pub fn normalized_class(&self) -> String {
        self.coarse_class.trim().to_uppercase()
    }
}

/// Demand variability class derived from the coefficient of variation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum XyzClass {
    /// Stable demand
    X,
    /// Variable demand
    Y,
    /// Erratic demand, or not enough history to tell
    Z,
}

impl XyzClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            XyzClass::X => "X",
            XyzClass::Y => "Y",
            XyzClass::Z => "Z",
        }
    }
}

impl std::fmt::Display for XyzClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for XyzClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "X" => Ok(XyzClass::X),
            "Y" => Ok(XyzClass::Y),
            "Z" => Ok(XyzClass::Z),
            other => Err(format!("unknown XYZ class '{}'", other)),
        }
    }
}

/// Movement class derived from the number of active months
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FsnClass {
    /// Fast moving
    F,
    /// Slow moving
    S,
    /// Non moving
    N,
}

impl FsnClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FsnClass::F => "F",
            FsnClass::S => "S",
            FsnClass::N => "N",
        }
    }
}

impl std::fmt::Display for FsnClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FsnClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "F" => Ok(FsnClass::F),
            "S" => Ok(FsnClass::S),
            "N" => Ok(FsnClass::N),
            other => Err(format!("unknown FSN class '{}'", other)),
        }
    }
}

/// Monthly demand profile used by the classifier and the monthly demand path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DemandProfile {
    /// Mean of the monthly totals
    pub avg_monthly_qty: f64,
    /// Sample standard deviation of the monthly totals
    pub monthly_stddev: f64,
    /// Sum of the monthly totals over the trailing twelve months
    pub total_units: f64,
    /// Coefficient of variation; `None` when the mean is zero
    pub cv: Option<f64>,
    pub customer_count: u32,
    pub active_months: u32,
}

/// Classifier result for one item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemClassification {
    /// Fine ABC tier, `None` when no record exists
    pub abc_tier: Option<String>,
    pub abc_class: Option<String>,
    pub xyz_class: XyzClass,
    pub fsn_class: FsnClass,
    pub profile: DemandProfile,
}
