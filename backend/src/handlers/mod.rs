//! HTTP handlers

mod health;
mod planning;

pub use health::health_check;
pub use planning::{
    apply_reorder_level, compute_policy, create_material_request, export_request, manual_policy,
    recompute_request,
};
