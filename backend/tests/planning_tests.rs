//! Reorder planning tests
//!
//! Tests for the planning engine including:
//! - Reorder figures are never negative
//! - Nearest-rank percentiles pick an observed lead time
//! - Policy selection is a pure function of the classification
//! - Repeated computation over the same history is identical
//! - Reorder level upserts settle after one write

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use shared::planning::policy::{select_policy, PolicyFacts};
use shared::planning::reorder::{calculate, ReorderInputs};
use shared::planning::stats::nearest_rank;
use shared::planning::{
    compute_policy, upsert_reorder_level, HistorySnapshot, PlanningConfig, PlanningSources,
};
use shared::{
    Confidence, DemandEvent, DemandKind, FsnClass, LeadTimeBasis, OrderLink, PolicyInput,
    ProcurementReceipt, ReorderLevelRow, ReorderTarget, StockingPolicy, UpsertOutcome, XyzClass,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn invoice(days_ago: i64, qty: f64, customer: &str) -> DemandEvent {
    DemandEvent {
        item: "ITEM-1".to_string(),
        company: "ACME".to_string(),
        cost_center: "CC-1".to_string(),
        warehouse: None,
        kind: DemandKind::Invoice,
        customer: Some(customer.to_string()),
        qty,
        posting_date: as_of() - Duration::days(days_ago),
        confirmed: true,
    }
}

fn receipt(days_ago: i64, lead_days: i64) -> ProcurementReceipt {
    let received = as_of() - Duration::days(days_ago);
    ProcurementReceipt {
        item: "ITEM-1".to_string(),
        company: "ACME".to_string(),
        cost_center: "CC-1".to_string(),
        warehouse: None,
        receipt_date: received,
        confirmed: true,
        order_line: None,
        order: Some(OrderLink {
            reference: format!("PO-{}-{}", days_ago, lead_days),
            transaction_date: received - Duration::days(lead_days),
            confirmed: true,
        }),
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn xyz_strategy() -> impl Strategy<Value = XyzClass> {
    prop_oneof![Just(XyzClass::X), Just(XyzClass::Y), Just(XyzClass::Z)]
}

fn fsn_strategy() -> impl Strategy<Value = FsnClass> {
    prop_oneof![Just(FsnClass::F), Just(FsnClass::S), Just(FsnClass::N)]
}

fn tier_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("A1"),
        Just("a2"),
        Just("A3"),
        Just("B1"),
        Just("C"),
        Just(""),
    ]
}

fn invoice_strategy() -> impl Strategy<Value = DemandEvent> {
    (
        0i64..365,
        -50.0f64..500.0,
        prop_oneof![Just("CUST-1"), Just("CUST-2"), Just("CUST-3")],
    )
        .prop_map(|(days_ago, qty, customer)| invoice(days_ago, qty, customer))
}

fn receipt_strategy() -> impl Strategy<Value = ProcurementReceipt> {
    (0i64..700, -10i64..120).prop_map(|(days_ago, lead)| receipt(days_ago, lead))
}

fn snapshot_strategy() -> impl Strategy<Value = HistorySnapshot> {
    (
        prop::collection::vec(invoice_strategy(), 0..60),
        prop::collection::vec(receipt_strategy(), 0..20),
    )
        .prop_map(|(demand, receipts)| {
            HistorySnapshot::new()
                .with_demand(demand)
                .with_receipts(receipts)
        })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Coverage days per policy
    #[test]
    fn test_coverage_days_per_policy() {
        let config = PlanningConfig::default();
        assert_eq!(config.coverage.mts, 40);
        assert_eq!(config.coverage.mts_lite, 20);
        assert_eq!(config.coverage.mto, 0);
    }

    /// Empty history uses the fallback lead time and yields nothing to order
    #[test]
    fn test_empty_history() {
        let snapshot = HistorySnapshot::new();
        let output = compute_policy(
            &PolicyInput::new("ITEM-1", "CC-1", "ACME"),
            PlanningSources::from_snapshot(&snapshot),
            &PlanningConfig::default(),
            as_of(),
        )
        .unwrap();

        assert_eq!(output.policy, StockingPolicy::Mto);
        assert_eq!(output.lead_time_basis, Some(LeadTimeBasis::Fallback45));
        assert_eq!(output.lead_time_used, 45.0);
        assert_eq!(output.reorder_level, 0.0);
        assert_eq!(output.confidence, Confidence::None);
    }

    /// Steady weekly demand with known lead times
    #[test]
    fn test_steady_weekly_demand() {
        let demand: Vec<DemandEvent> = (0..52).map(|w| invoice(w * 7, 70.0, "CUST-1")).collect();
        let receipts: Vec<ProcurementReceipt> = [10, 12, 14].iter().map(|&l| receipt(60, l)).collect();
        let snapshot = HistorySnapshot::new()
            .with_demand(demand)
            .with_receipts(receipts);

        let output = compute_policy(
            &PolicyInput::new("ITEM-1", "CC-1", "ACME"),
            PlanningSources::from_snapshot(&snapshot),
            &PlanningConfig::default(),
            as_of(),
        )
        .unwrap();

        // No ABC record: P50 basis, three samples
        assert_eq!(output.lead_time_basis, Some(LeadTimeBasis::P50));
        assert_eq!(output.lead_time_used, 12.0);
        assert_eq!(output.confidence, Confidence::High);
        assert!(output.daily_demand_mean > 0.0);
        let expected = output.daily_demand_mean * 12.0 + output.safety_stock_units;
        assert!((output.reorder_level - expected).abs() < 1e-9);
        assert!(
            (output.reorder_qty - f64::from(output.coverage_days) * output.daily_demand_mean).abs()
                < 1e-9
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Reorder figures stay finite and non-negative for any input
    #[test]
    fn prop_reorder_figures_non_negative(
        mean in -100.0f64..1000.0,
        sigma in -100.0f64..1000.0,
        lead in -30.0f64..200.0,
        z in -3.0f64..3.0,
        coverage in 0u32..120,
    ) {
        let figures = calculate(&ReorderInputs {
            daily_demand_mean: mean,
            daily_demand_stddev: sigma,
            lead_time_used: lead,
            z_factor: z,
            coverage_days: coverage,
        });

        for value in [
            figures.safety_stock_units,
            figures.safety_days,
            figures.reorder_level,
            figures.reorder_qty,
        ] {
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }
        if mean <= 0.0 || lead <= 0.0 {
            prop_assert_eq!(figures.reorder_level, 0.0);
            prop_assert_eq!(figures.reorder_qty, 0.0);
        } else {
            prop_assert!(figures.reorder_level >= mean * lead - 1e-9);
        }
    }

    /// Nearest-rank always returns an observed value, and P50 <= P80
    #[test]
    fn prop_nearest_rank_is_observed(mut samples in prop::collection::vec(0.0f64..365.0, 1..50)) {
        samples.sort_by(|a, b| a.total_cmp(b));
        let p50 = nearest_rank(&samples, 50.0);
        let p80 = nearest_rank(&samples, 80.0);

        prop_assert!(samples.contains(&p50));
        prop_assert!(samples.contains(&p80));
        prop_assert!(p50 <= p80);
        prop_assert_eq!(nearest_rank(&samples, 100.0), samples[samples.len() - 1]);
        prop_assert_eq!(nearest_rank(&samples, 0.0), samples[0]);
    }

    /// The selected coverage days always belong to the selected policy
    #[test]
    fn prop_policy_matches_coverage(
        tier in tier_strategy(),
        xyz in xyz_strategy(),
        fsn in fsn_strategy(),
        customers in 0u32..10,
        cv in prop::option::of(0.0f64..3.0),
        active_months in 0u32..=12,
    ) {
        let config = PlanningConfig::default();
        let facts = PolicyFacts {
            abc_tier: Some(tier),
            xyz_class: xyz,
            fsn_class: fsn,
            customer_count: customers,
            cv,
            active_months,
        };
        let (policy, days) = select_policy(&facts, &config);

        prop_assert_eq!(select_policy(&facts, &config), (policy, days));
        let expected = match policy {
            StockingPolicy::Mts => config.coverage.mts,
            StockingPolicy::MtsLite => config.coverage.mts_lite,
            StockingPolicy::Mto => config.coverage.mto,
        };
        prop_assert_eq!(days, expected);

        // Only A1/A2 items are ever stocked
        if policy != StockingPolicy::Mto {
            let tier = tier.to_uppercase();
            prop_assert!(tier == "A1" || tier == "A2");
        }
    }

    /// Same history, same reference date, same output
    #[test]
    fn prop_compute_is_idempotent(snapshot in snapshot_strategy()) {
        let config = PlanningConfig::default();
        let input = PolicyInput::new("ITEM-1", "CC-1", "ACME");
        let sources = PlanningSources::from_snapshot(&snapshot);

        let first = compute_policy(&input, sources, &config, as_of()).unwrap();
        let second = compute_policy(&input, sources, &config, as_of()).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(first.lead_time_used > 0.0);
        prop_assert!(first.daily_demand_mean >= 0.0);
        prop_assert!(first.reorder_level >= 0.0);
        prop_assert!(first.reorder_qty >= 0.0);
        if first.daily_demand_mean <= 0.0 {
            prop_assert_eq!(first.confidence, Confidence::None);
        }
    }

    /// A second identical upsert never changes the table
    #[test]
    fn prop_upsert_settles(
        level in 0.0f64..10_000.0,
        qty in prop::option::of(0.0f64..10_000.0),
        warehouse in prop_oneof![Just("Stores - AC"), Just(" stores - ac "), Just("Finished Goods - AC")],
        existing in prop::option::of((0.0f64..10_000.0, 0.0f64..10_000.0)),
    ) {
        let mut rows: Vec<ReorderLevelRow> = existing
            .map(|(l, q)| ReorderLevelRow {
                warehouse: "Stores - AC".to_string(),
                warehouse_group: Some("All Warehouses".to_string()),
                reorder_level: l,
                reorder_qty: q,
                material_request_type: "Purchase".to_string(),
            })
            .into_iter()
            .collect();
        let target = ReorderTarget {
            item: "ITEM-1".to_string(),
            warehouse: warehouse.to_string(),
            warehouse_group: "all warehouses".to_string(),
            material_request_type: String::new(),
            reorder_level: Some(level),
            reorder_qty: qty,
            minimum_inventory_qty: Some(5.0),
        };

        let first = upsert_reorder_level(&mut rows, &target).unwrap();
        let len = rows.len();
        let second = upsert_reorder_level(&mut rows, &target).unwrap();

        if existing.is_none() {
            prop_assert_eq!(first, UpsertOutcome::Inserted);
        }
        prop_assert_eq!(second, UpsertOutcome::NoChange);
        prop_assert_eq!(rows.len(), len);
        prop_assert!(rows.iter().all(|r| r.material_request_type == "Purchase"));
    }
}
