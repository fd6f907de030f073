//! Manual planning policy
//!
//! The planner supplies safety and coverage days; demand is the recent sales
//! run rate and the lead time is the plain average of matched receipts.

use chrono::NaiveDate;

use super::config::PlanningConfig;
use super::error::PlanningResult;
use super::source::{HistoryQuery, TransactionHistory};
use super::stats::{mean, non_negative};
use crate::models::{DemandKind, ManualPolicyInput, ManualPolicyOutput, ProcurementReceipt};
use crate::types::{round_to, DateRange};

const QTY_PLACES: i32 = 3;
const LEAD_DAY_PLACES: i32 = 2;
const DAYS_PER_MONTH: f64 = 30.0;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Compute a manual policy for an item
pub fn compute_manual_policy(
    input: &ManualPolicyInput,
    history: &dyn TransactionHistory,
    config: &PlanningConfig,
    as_of: NaiveDate,
) -> PlanningResult<ManualPolicyOutput> {
    let item = input.item.trim();
    if item.is_empty() {
        return Ok(ManualPolicyOutput::default());
    }

    let company = non_blank(input.company.as_deref());
    let query = HistoryQuery {
        item: item.to_string(),
        company: company.clone(),
        cost_center: non_blank(input.cost_center.as_deref()),
        warehouse: non_blank(input.warehouse.as_deref()),
        range: DateRange::trailing_months(as_of, config.manual_sales_months),
    };

    let last_sales: f64 = history
        .demand_events(&query)?
        .iter()
        .filter(|e| e.kind == DemandKind::Invoice)
        .map(|e| e.issued_qty())
        .sum();

    let months = f64::from(config.manual_sales_months.max(1));
    let monthly = last_sales / months;
    let daily = monthly / DAYS_PER_MONTH;

    // Lead days need a company; the window is the whole history
    let lead_days = if company.is_some() {
        let receipts =
            history.procurement_receipts(&query.with_range(DateRange::new(NaiveDate::MIN, as_of)))?;
        let samples: Vec<f64> = receipts
            .iter()
            .filter_map(ProcurementReceipt::lead_days)
            .collect();
        round_to(mean(&samples), LEAD_DAY_PLACES)
    } else {
        0.0
    };
    if lead_days == 0.0 {
        tracing::info!(item, company = ?company, "manual policy lead days computed as 0");
    }

    let safety_days = non_negative(input.safety_days);
    let coverage_days = non_negative(input.coverage_days);

    Ok(ManualPolicyOutput {
        last_3_month_sales_qty: round_to(last_sales, QTY_PLACES),
        monthly_requirement: round_to(monthly, QTY_PLACES),
        daily_requirement: round_to(daily, QTY_PLACES),
        lead_days,
        minimum_inventory_qty: round_to(safety_days * daily, QTY_PLACES),
        rol: round_to((safety_days + lead_days) * daily, QTY_PLACES),
        roq: round_to(coverage_days * daily, QTY_PLACES),
    })
}
