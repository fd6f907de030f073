//! Policy computation for one item and for planning request batches
//!
//! Pipeline per item: classify the T12 invoice history, estimate daily demand
//! and lead time, pick a stocking policy, then apply the reorder formulas.
//! Every read goes through `PlanningSources`; the reference date is passed in
//! so the same inputs always produce the same output.

use chrono::NaiveDate;

use super::classifier::classify;
use super::config::PlanningConfig;
use super::coverage::stock_coverage;
use super::demand::{estimate_demand, weekly_window};
use super::error::PlanningResult;
use super::lead_time::{estimate_lead_time, LeadTimeStats};
use super::policy::{select_policy, PolicyFacts};
use super::reorder::{calculate, choose_lead_time, z_factor, ReorderInputs};
use super::source::{HistoryQuery, PlanningSources};
use crate::models::{
    Confidence, ItemPlan, LeadTimeBasis, PlanningRequestHeader, PlanningRow, PolicyInput,
    PolicyOutput,
};
use crate::types::DateRange;

/// Lead time samples needed before a percentile basis counts as reliable
const MIN_RELIABLE_LEAD_SAMPLES: usize = 3;

/// Smallest date range covering every history read of `plan_item`
pub fn history_window(config: &PlanningConfig, as_of: NaiveDate) -> DateRange {
    let start = [
        DateRange::trailing_months(as_of, config.classification_months).start,
        weekly_window(as_of, config.weeks_back).start,
        DateRange::trailing_days(as_of, config.lt_window_days).start,
    ]
    .into_iter()
    .min()
    .unwrap_or(as_of);
    DateRange::new(start, as_of)
}

/// Compute the reorder policy for one item / cost center.
///
/// A blank item or cost center yields `PolicyOutput::zeroed()` without
/// touching any collaborator.
pub fn compute_policy(
    input: &PolicyInput,
    sources: PlanningSources<'_>,
    config: &PlanningConfig,
    as_of: NaiveDate,
) -> PlanningResult<PolicyOutput> {
    plan_item(input, sources, config, as_of).map(|plan| plan.policy)
}

/// Policy output together with the demand profile and stock coverage
pub fn plan_item(
    input: &PolicyInput,
    sources: PlanningSources<'_>,
    config: &PlanningConfig,
    as_of: NaiveDate,
) -> PlanningResult<ItemPlan> {
    let item = input.item.trim();
    let cost_center = input.cost_center.trim();

    if !input.is_complete() {
        tracing::debug!(item, cost_center, "incomplete policy input, returning zeroed plan");
        return Ok(ItemPlan::cleared(item, cost_center));
    }

    let query = HistoryQuery::for_input(
        input,
        DateRange::trailing_months(as_of, config.classification_months),
    );

    let invoices = sources.history.demand_events(&query)?;
    let record = sources.classifications.classification(item, cost_center)?;
    let classification = classify(&invoices, record.as_ref(), config);

    let weekly_events = sources
        .history
        .demand_events(&query.with_range(weekly_window(as_of, config.weeks_back)))?;
    let demand = estimate_demand(
        classification.xyz_class,
        &classification.profile,
        &weekly_events,
        as_of,
        config,
    );

    let receipts = sources.history.procurement_receipts(
        &query.with_range(DateRange::trailing_days(as_of, config.lt_window_days)),
    )?;
    let lead_time = estimate_lead_time(&receipts);

    let tier = classification.abc_tier.as_deref();
    let (lead_time_used, basis) = choose_lead_time(tier, &lead_time, config);
    if basis == LeadTimeBasis::Fallback45 && demand.mean > 0.0 {
        tracing::warn!(
            item,
            cost_center,
            fallback_days = lead_time_used,
            "no lead time history, using fallback lead time"
        );
    }

    let facts = PolicyFacts {
        abc_tier: tier,
        xyz_class: classification.xyz_class,
        fsn_class: classification.fsn_class,
        customer_count: classification.profile.customer_count,
        cv: classification.profile.cv,
        active_months: classification.profile.active_months,
    };
    let (policy, coverage_days) = select_policy(&facts, config);

    let z = z_factor(
        tier,
        classification.abc_class.as_deref(),
        &config.service_level,
    );
    let figures = calculate(&ReorderInputs {
        daily_demand_mean: demand.mean,
        daily_demand_stddev: demand.stddev,
        lead_time_used,
        z_factor: z,
        coverage_days,
    });

    let output = PolicyOutput {
        daily_demand_mean: demand.mean,
        daily_demand_stddev: demand.stddev,
        lead_time_p50: lead_time.p50,
        lead_time_p80: lead_time.p80,
        lead_time_mean: lead_time.mean,
        lead_time_used,
        lead_time_basis: Some(basis),
        abc_class: classification.abc_tier.clone(),
        xyz_class: classification.xyz_class,
        fsn_class: classification.fsn_class,
        policy,
        coverage_days,
        z_factor: z,
        safety_stock_units: figures.safety_stock_units,
        safety_days: figures.safety_days,
        reorder_level: figures.reorder_level,
        reorder_qty: figures.reorder_qty,
        confidence: confidence(demand.mean, basis, &lead_time),
    };

    let snapshot = sources.stock.stock_snapshot(item, cost_center)?;
    let stock = stock_coverage(
        snapshot.as_ref(),
        output.daily_demand_mean,
        output.reorder_level,
    );

    tracing::debug!(
        item,
        cost_center,
        policy = %output.policy,
        basis = %basis,
        demand_source = ?demand.source,
        rol = output.reorder_level,
        roq = output.reorder_qty,
        "computed item policy"
    );

    Ok(ItemPlan {
        item: item.to_string(),
        cost_center: cost_center.to_string(),
        policy: output,
        profile: classification.profile,
        stock,
    })
}

fn confidence(daily_mean: f64, basis: LeadTimeBasis, lead_time: &LeadTimeStats) -> Confidence {
    if daily_mean <= 0.0 {
        return Confidence::None;
    }
    let percentile_basis = matches!(basis, LeadTimeBasis::P50 | LeadTimeBasis::P80);
    if percentile_basis && lead_time.samples >= MIN_RELIABLE_LEAD_SAMPLES {
        Confidence::High
    } else {
        Confidence::Low
    }
}

/// Plan several items; a failing item does not stop the batch
pub fn plan_items(
    inputs: &[PolicyInput],
    sources: PlanningSources<'_>,
    config: &PlanningConfig,
    as_of: NaiveDate,
) -> Vec<PlanningResult<ItemPlan>> {
    inputs
        .iter()
        .map(|input| plan_item(input, sources, config, as_of))
        .collect()
}

/// Outcome counts of a batch recomputation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeSummary {
    pub computed: usize,
    pub cleared: usize,
    pub failed: usize,
}

/// Recompute every row of a material planning request in place.
///
/// A blank cost center on the header clears all rows. A blank item clears
/// its row. A collaborator failure keeps the row's previous plan and records
/// the error on it.
pub fn recompute_rows(
    header: &PlanningRequestHeader,
    rows: &mut [PlanningRow],
    sources: PlanningSources<'_>,
    config: &PlanningConfig,
    as_of: NaiveDate,
) -> RecomputeSummary {
    let mut summary = RecomputeSummary::default();
    let cost_center = header.cost_center.trim();

    if cost_center.is_empty() {
        for row in rows.iter_mut() {
            row.plan = ItemPlan::cleared(row.item.trim(), "");
            row.error = None;
        }
        summary.cleared = rows.len();
        tracing::info!(rows = rows.len(), "planning request has no cost center, rows cleared");
        return summary;
    }

    for row in rows.iter_mut() {
        row.error = None;
        if row.item.trim().is_empty() {
            row.plan = ItemPlan::cleared("", cost_center);
            summary.cleared += 1;
            continue;
        }

        let mut input = PolicyInput::new(&row.item, cost_center, &header.company);
        input.warehouse = header.warehouse.clone();

        match plan_item(&input, sources, config, as_of) {
            Ok(plan) => {
                row.plan = plan;
                summary.computed += 1;
            }
            Err(err) => {
                tracing::warn!(
                    row_id = %row.row_id,
                    item = %row.item,
                    error = %err,
                    "planning row failed"
                );
                row.error = Some(err.to_string());
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        computed = summary.computed,
        cleared = summary.cleared,
        failed = summary.failed,
        "planning request recomputed"
    );
    summary
}
