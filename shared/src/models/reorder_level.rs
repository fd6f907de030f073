//! Per-warehouse reorder level rows kept on an item

use serde::{Deserialize, Serialize};

/// One row of an item's reorder table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderLevelRow {
    pub warehouse: String,
    pub warehouse_group: Option<String>,
    pub reorder_level: f64,
    pub reorder_qty: f64,
    pub material_request_type: String,
}

/// Values taken from a planning policy and applied to the item's reorder table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderTarget {
    pub item: String,
    pub warehouse: String,
    pub warehouse_group: String,
    pub material_request_type: String,
    pub reorder_level: Option<f64>,
    pub reorder_qty: Option<f64>,
    /// Used as the reorder quantity when none is given
    pub minimum_inventory_qty: Option<f64>,
}

/// What happened to the reorder table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Updated,
    Inserted,
    NoChange,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::Inserted => "inserted",
            UpsertOutcome::NoChange => "no_change",
        }
    }

    /// Whether the table needs to be written back
    pub fn is_dirty(&self) -> bool {
        !matches!(self, UpsertOutcome::NoChange)
    }
}
