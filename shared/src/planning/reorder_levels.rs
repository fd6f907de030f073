//! Apply a planning policy to an item's per-warehouse reorder table

use super::error::{PlanningError, PlanningResult};
use crate::models::{ReorderLevelRow, ReorderTarget, UpsertOutcome};
use crate::validation::validate_quantity;

/// Smallest difference treated as a change
const EPS: f64 = 1e-9;

pub const DEFAULT_MATERIAL_REQUEST_TYPE: &str = "Purchase";

fn fold(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_lowercase()
}

fn changed(a: f64, b: f64) -> bool {
    (a - b).abs() > EPS
}

/// Check the target carries everything the reorder table needs
pub fn validate_target(target: &ReorderTarget) -> PlanningResult<()> {
    let mut missing = Vec::new();
    if target.item.trim().is_empty() {
        missing.push("item");
    }
    if target.warehouse.trim().is_empty() {
        missing.push("warehouse");
    }
    if target.warehouse_group.trim().is_empty() {
        missing.push("warehouse_group");
    }
    if target.material_request_type.trim().is_empty() {
        missing.push("material_request_type");
    }
    if target.reorder_level.is_none() {
        missing.push("reorder_level");
    }
    let has_qty = target.reorder_qty.map_or(false, |q| q != 0.0)
        || target.minimum_inventory_qty.map_or(false, |q| q != 0.0);
    if !has_qty {
        missing.push("reorder_qty");
    }

    if let Some(field) = missing.first() {
        return Err(PlanningError::validation(
            field,
            format!("missing required fields: {}", missing.join(", ")),
        ));
    }

    let qty = target.reorder_qty.or(target.minimum_inventory_qty);
    for (field, value) in [("reorder_level", target.reorder_level), ("reorder_qty", qty)] {
        if let Some(value) = value {
            validate_quantity(value).map_err(|msg| PlanningError::validation(field, msg))?;
        }
    }
    Ok(())
}

/// Insert or update the row for the target's warehouse and warehouse group.
///
/// Rows match on trimmed, case-folded warehouse and group. A matching row is
/// only rewritten when the level or quantity actually moved.
pub fn upsert_reorder_level(
    rows: &mut Vec<ReorderLevelRow>,
    target: &ReorderTarget,
) -> PlanningResult<UpsertOutcome> {
    validate_target(target)?;

    let warehouse = target.warehouse.trim();
    let group = target.warehouse_group.trim();
    let request_type = match target.material_request_type.trim() {
        "" => DEFAULT_MATERIAL_REQUEST_TYPE,
        t => t,
    };
    let level = target.reorder_level.unwrap_or_default();
    let qty = target
        .reorder_qty
        .or(target.minimum_inventory_qty)
        .unwrap_or_default();

    let key = (fold(Some(warehouse)), fold(Some(group)));
    let existing = rows.iter_mut().find(|row| {
        (
            fold(Some(row.warehouse.as_str())),
            fold(row.warehouse_group.as_deref()),
        ) == key
    });

    let outcome = match existing {
        Some(row) => {
            if changed(row.reorder_level, level) || changed(row.reorder_qty, qty) {
                row.reorder_level = level;
                row.reorder_qty = qty;
                row.material_request_type = request_type.to_string();
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::NoChange
            }
        }
        None => {
            rows.push(ReorderLevelRow {
                warehouse: warehouse.to_string(),
                warehouse_group: Some(group.to_string()),
                reorder_level: level,
                reorder_qty: qty,
                material_request_type: request_type.to_string(),
            });
            UpsertOutcome::Inserted
        }
    };

    tracing::debug!(
        item = %target.item,
        warehouse,
        op = outcome.as_str(),
        "reorder level upsert"
    );
    Ok(outcome)
}
