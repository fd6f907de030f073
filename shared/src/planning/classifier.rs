//! ABC / XYZ / FSN classification from trailing twelve-month invoice history

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use super::config::{ClassificationThresholds, PlanningConfig};
use super::stats::{mean, sample_stddev};
use crate::models::{
    ClassificationRecord, DemandEvent, DemandKind, DemandProfile, FsnClass, ItemClassification,
    XyzClass,
};

/// Invoice quantity per calendar month, oldest first.
///
/// Only months with at least one invoice line appear; months without sales are
/// not padded with zeros.
pub fn monthly_totals(events: &[DemandEvent]) -> Vec<f64> {
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.confirmed && e.kind == DemandKind::Invoice)
    {
        let key = (event.posting_date.year(), event.posting_date.month());
        *by_month.entry(key).or_insert(0.0) += event.issued_qty();
    }
    by_month.into_values().collect()
}

/// Distinct non-blank customers on invoices
pub fn customer_count(events: &[DemandEvent]) -> u32 {
    events
        .iter()
        .filter(|e| e.confirmed && e.kind == DemandKind::Invoice)
        .filter_map(|e| e.customer.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// XYZ class from the coefficient of variation; no usable cv means Z
pub fn classify_xyz(cv: Option<f64>, thresholds: &ClassificationThresholds) -> XyzClass {
    match cv {
        Some(cv) if cv.is_finite() && cv <= thresholds.xyz_x_max_cv => XyzClass::X,
        Some(cv) if cv.is_finite() && cv <= thresholds.xyz_y_max_cv => XyzClass::Y,
        _ => XyzClass::Z,
    }
}

/// FSN class from the number of months with at least one unit sold
pub fn classify_fsn(active_months: u32, thresholds: &ClassificationThresholds) -> FsnClass {
    if active_months >= thresholds.fsn_fast_min_months {
        FsnClass::F
    } else if active_months >= thresholds.fsn_slow_min_months {
        FsnClass::S
    } else {
        FsnClass::N
    }
}

/// Monthly statistics, customer breadth and activity for one item
pub fn demand_profile(events: &[DemandEvent]) -> DemandProfile {
    let monthly = monthly_totals(events);
    let active_months = monthly.iter().filter(|q| **q >= 1.0).count() as u32;
    let customers = customer_count(events);
    let total: f64 = monthly.iter().sum();

    if monthly.is_empty() || total == 0.0 {
        return DemandProfile {
            customer_count: customers,
            active_months,
            ..DemandProfile::default()
        };
    }

    let avg = mean(&monthly);
    let sd = sample_stddev(&monthly);
    let cv = if avg > 0.0 { Some(sd / avg) } else { None };

    DemandProfile {
        avg_monthly_qty: avg,
        monthly_stddev: sd,
        total_units: total,
        cv,
        customer_count: customers,
        active_months,
    }
}

/// Classify an item from its T12 invoice history and its ABC record
pub fn classify(
    events: &[DemandEvent],
    record: Option<&ClassificationRecord>,
    config: &PlanningConfig,
) -> ItemClassification {
    let profile = demand_profile(events);
    let xyz_class = classify_xyz(profile.cv, &config.thresholds);
    let fsn_class = classify_fsn(profile.active_months, &config.thresholds);

    let abc_tier = record
        .map(ClassificationRecord::normalized_tier)
        .filter(|t| !t.is_empty());
    let abc_class = record
        .map(ClassificationRecord::normalized_class)
        .filter(|c| !c.is_empty());

    ItemClassification {
        abc_tier,
        abc_class,
        xyz_class,
        fsn_class,
        profile,
    }
}
