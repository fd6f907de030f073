//! CSV export of recomputed planning requests

use serde::Serialize;
use shared::PlanningRow;

use crate::error::{AppError, AppResult};

/// One flat CSV line per planning row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanningExportRow {
    pub row_id: String,
    pub item: String,
    pub cost_center: String,
    pub uom: String,
    pub abc_class: String,
    pub xyz_class: String,
    pub fsn_class: String,
    pub policy: String,
    pub coverage_days: u32,
    pub daily_demand_mean: f64,
    pub daily_demand_stddev: f64,
    pub lead_time_p50: f64,
    pub lead_time_p80: f64,
    pub lead_time_mean: f64,
    pub lead_time_used: f64,
    pub lead_time_basis: String,
    pub z_factor: f64,
    pub safety_stock_units: f64,
    pub safety_days: f64,
    pub reorder_level: f64,
    pub reorder_qty: f64,
    pub confidence: String,
    pub on_hand_qty: f64,
    pub projected_qty: f64,
    pub projected_minus_rol: f64,
    pub error: String,
}

impl From<&PlanningRow> for PlanningExportRow {
    fn from(row: &PlanningRow) -> Self {
        let policy = &row.plan.policy;
        let stock = &row.plan.stock;
        Self {
            row_id: row.row_id.clone(),
            item: row.item.clone(),
            cost_center: row.plan.cost_center.clone(),
            uom: row.uom.clone().unwrap_or_default(),
            abc_class: policy.abc_class.clone().unwrap_or_default(),
            xyz_class: policy.xyz_class.to_string(),
            fsn_class: policy.fsn_class.to_string(),
            policy: policy.policy.to_string(),
            coverage_days: policy.coverage_days,
            daily_demand_mean: policy.daily_demand_mean,
            daily_demand_stddev: policy.daily_demand_stddev,
            lead_time_p50: policy.lead_time_p50,
            lead_time_p80: policy.lead_time_p80,
            lead_time_mean: policy.lead_time_mean,
            lead_time_used: policy.lead_time_used,
            lead_time_basis: policy
                .lead_time_basis
                .map(|b| b.to_string())
                .unwrap_or_default(),
            z_factor: policy.z_factor,
            safety_stock_units: policy.safety_stock_units,
            safety_days: policy.safety_days,
            reorder_level: policy.reorder_level,
            reorder_qty: policy.reorder_qty,
            confidence: policy.confidence.as_str().to_string(),
            on_hand_qty: stock.on_hand_qty,
            projected_qty: stock.projected_qty,
            projected_minus_rol: stock.projected_minus_rol,
            error: row.error.clone().unwrap_or_default(),
        }
    }
}

/// Reporting service for planning exports
pub struct ReportingService;

impl ReportingService {
    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }

    /// Export recomputed planning rows to CSV
    pub fn export_planning_rows(rows: &[PlanningRow]) -> AppResult<String> {
        let flat: Vec<PlanningExportRow> = rows.iter().map(PlanningExportRow::from).collect();
        Self::export_to_csv(&flat)
    }
}
