//! Reorder planning engine
//!
//! Derives a stocking policy, safety stock, reorder level and reorder quantity
//! for an item / cost center from its demand and procurement history.

pub mod classifier;
pub mod config;
pub mod coverage;
pub mod demand;
pub mod engine;
pub mod error;
pub mod lead_time;
pub mod manual;
pub mod material_request;
pub mod policy;
pub mod reorder;
pub mod reorder_levels;
pub mod source;
pub mod stats;

pub use config::{ClassificationThresholds, CoverageDays, PlanningConfig, ServiceLevelTable};
pub use engine::{
    compute_policy, history_window, plan_item, plan_items, recompute_rows, RecomputeSummary,
};
pub use error::{PlanningError, PlanningResult};
pub use manual::compute_manual_policy;
pub use material_request::draft_material_request;
pub use reorder_levels::upsert_reorder_level;
pub use source::{
    ClassificationLookup, HistoryQuery, HistorySnapshot, PlanningSources, StockSnapshotSource,
    TransactionHistory,
};
