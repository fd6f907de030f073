//! Stocking policy decision table

use super::config::PlanningConfig;
use crate::models::{FsnClass, StockingPolicy, XyzClass};

/// Facts the decision table is evaluated against
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyFacts<'a> {
    pub abc_tier: Option<&'a str>,
    pub xyz_class: XyzClass,
    pub fsn_class: FsnClass,
    pub customer_count: u32,
    pub cv: Option<f64>,
    pub active_months: u32,
}

/// Evaluate the decision table, first match wins:
///
/// 1. A1/A2, X, F/S, enough customers → MTS
/// 2. A1/A2, X/Y, F/S, enough customers, or the A1 low-cv breadth override → MTS-Lite
/// 3. otherwise MTO
///
/// Rule 1 is contained in rule 2's X/Y branch; the order is kept so the audit
/// trail reads MTS before MTS-Lite.
pub fn select_policy(facts: &PolicyFacts<'_>, config: &PlanningConfig) -> (StockingPolicy, u32) {
    let t = &config.thresholds;
    let tier = facts
        .abc_tier
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_default();

    let top_tier = tier == "A1" || tier == "A2";
    let moving = matches!(facts.fsn_class, FsnClass::F | FsnClass::S);
    let broad = facts.customer_count >= t.min_customers;

    if top_tier && facts.xyz_class == XyzClass::X && moving && broad {
        return (StockingPolicy::Mts, config.coverage.mts);
    }

    let main = top_tier && matches!(facts.xyz_class, XyzClass::X | XyzClass::Y) && moving && broad;
    let cv_override = tier == "A1"
        && facts.cv.map_or(false, |cv| cv <= t.override_max_cv)
        && facts.customer_count >= t.override_min_customers
        && facts.active_months >= t.override_min_active_months;

    if main || cv_override {
        return (StockingPolicy::MtsLite, config.coverage.mts_lite);
    }

    (StockingPolicy::Mto, config.coverage.mto)
}
