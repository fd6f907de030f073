//! Draft material requests from selected planning rows

use std::collections::HashSet;

use chrono::NaiveDate;

use super::error::{PlanningError, PlanningResult};
use super::reorder_levels::DEFAULT_MATERIAL_REQUEST_TYPE;
use crate::models::{MaterialRequestDraft, MaterialRequestLine, PlanningRequestHeader, PlanningRow};

/// Build one draft purchase request from the selected rows.
///
/// Each selected row with an item and a positive recommended ROL becomes a
/// line for that quantity, rounded up when the UOM must be whole.
pub fn draft_material_request(
    header: &PlanningRequestHeader,
    rows: &[PlanningRow],
    selected: &HashSet<String>,
    today: NaiveDate,
) -> PlanningResult<MaterialRequestDraft> {
    if selected.is_empty() {
        return Err(PlanningError::validation(
            "rows",
            "select at least one planning row",
        ));
    }
    if header.company.trim().is_empty() {
        return Err(PlanningError::validation("company", "company is required"));
    }
    if header.cost_center.trim().is_empty() {
        return Err(PlanningError::validation(
            "cost_center",
            "cost center is required",
        ));
    }
    let warehouse = header
        .warehouse
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .ok_or_else(|| PlanningError::validation("warehouse", "warehouse is required"))?;

    let schedule_date = header.posting_date.unwrap_or(today);

    let lines: Vec<MaterialRequestLine> = rows
        .iter()
        .filter(|row| selected.contains(&row.row_id))
        .filter_map(|row| {
            let item = row.item.trim();
            let mut qty = row.plan.policy.reorder_level;
            if item.is_empty() || !qty.is_finite() || qty <= 0.0 {
                return None;
            }
            if row.whole_number_uom {
                qty = qty.ceil();
            }
            Some(MaterialRequestLine {
                row_id: row.row_id.clone(),
                item: item.to_string(),
                qty,
                uom: row
                    .uom
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .map(str::to_string),
                schedule_date,
                warehouse: warehouse.to_string(),
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(PlanningError::validation(
            "rows",
            "no selected rows with a recommended ROL above zero",
        ));
    }

    tracing::info!(
        company = %header.company,
        cost_center = %header.cost_center,
        lines = lines.len(),
        "drafted material request"
    );

    Ok(MaterialRequestDraft {
        company: header.company.trim().to_string(),
        cost_center: header.cost_center.trim().to_string(),
        warehouse: warehouse.to_string(),
        material_request_type: DEFAULT_MATERIAL_REQUEST_TYPE.to_string(),
        transaction_date: schedule_date,
        schedule_date,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemPlan;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn header() -> PlanningRequestHeader {
        PlanningRequestHeader {
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: Some("Stores - AC".to_string()),
            posting_date: None,
        }
    }

    fn row(id: &str, item: &str, rol: f64, whole: bool) -> PlanningRow {
        let mut plan = ItemPlan::cleared(item, "CC-1");
        plan.policy.reorder_level = rol;
        PlanningRow {
            row_id: id.to_string(),
            item: item.to_string(),
            uom: Some("Nos".to_string()),
            whole_number_uom: whole,
            plan,
            error: None,
        }
    }

    fn select(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selected_rows_become_lines() {
        let rows = vec![
            row("r1", "ITEM-1", 10.2, true),
            row("r2", "ITEM-2", 7.5, false),
            row("r3", "ITEM-3", 0.0, true),
            row("r4", "ITEM-4", 3.0, true),
        ];
        let draft =
            draft_material_request(&header(), &rows, &select(&["r1", "r2", "r3"]), today())
                .unwrap();

        assert_eq!(draft.material_request_type, "Purchase");
        assert_eq!(draft.schedule_date, today());
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].qty, 11.0);
        assert_eq!(draft.lines[1].qty, 7.5);
        assert_eq!(draft.lines[1].warehouse, "Stores - AC");
    }

    #[test]
    fn test_posting_date_is_schedule_date() {
        let mut h = header();
        h.posting_date = NaiveDate::from_ymd_opt(2025, 7, 15);
        let rows = vec![row("r1", "ITEM-1", 1.0, false)];
        let draft = draft_material_request(&h, &rows, &select(&["r1"]), today()).unwrap();
        assert_eq!(draft.transaction_date, h.posting_date.unwrap());
        assert_eq!(draft.lines[0].schedule_date, h.posting_date.unwrap());
    }

    #[test]
    fn test_no_selection() {
        let rows = vec![row("r1", "ITEM-1", 1.0, false)];
        let err = draft_material_request(&header(), &rows, &HashSet::new(), today()).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { ref field, .. } if field == "rows"));
    }

    #[test]
    fn test_missing_warehouse() {
        let mut h = header();
        h.warehouse = Some(" ".to_string());
        let rows = vec![row("r1", "ITEM-1", 1.0, false)];
        let err = draft_material_request(&h, &rows, &select(&["r1"]), today()).unwrap_err();
        assert!(matches!(err, PlanningError::Validation { ref field, .. } if field == "warehouse"));
    }

    #[test]
    fn test_nothing_eligible() {
        let rows = vec![row("r1", "ITEM-1", 0.0, false), row("r2", "", 5.0, false)];
        let err =
            draft_material_request(&header(), &rows, &select(&["r1", "r2"]), today()).unwrap_err();
        assert!(err.to_string().contains("recommended ROL"));
    }
}
