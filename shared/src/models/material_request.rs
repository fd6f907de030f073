//! Material planning request rows and the draft material request built from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ItemPlan;

/// Header of a material planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequestHeader {
    pub company: String,
    pub cost_center: String,
    pub warehouse: Option<String>,
    pub posting_date: Option<NaiveDate>,
}

/// A row of a material planning request after recomputation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRow {
    /// Row identifier used for selection
    pub row_id: String,
    pub item: String,
    pub uom: Option<String>,
    /// Whether quantities in this UOM must be whole numbers
    #[serde(default)]
    pub whole_number_uom: bool,
    pub plan: ItemPlan,
    /// Set when the row could not be recomputed
    pub error: Option<String>,
}

/// Line of a draft material request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRequestLine {
    pub row_id: String,
    pub item: String,
    pub qty: f64,
    pub uom: Option<String>,
    pub schedule_date: NaiveDate,
    pub warehouse: String,
}

/// Draft purchase material request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRequestDraft {
    pub company: String,
    pub cost_center: String,
    pub warehouse: String,
    pub material_request_type: String,
    pub transaction_date: NaiveDate,
    pub schedule_date: NaiveDate,
    pub lines: Vec<MaterialRequestLine>,
}
