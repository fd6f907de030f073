//! Stock coverage metrics

use super::stats::non_negative;
use crate::models::{StockCoverage, StockSnapshot};

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Days of demand a quantity covers; zero when there is no demand
fn coverage_days(qty: f64, daily_mean: f64) -> f64 {
    if daily_mean > 0.0 {
        finite(qty / daily_mean)
    } else {
        0.0
    }
}

/// Coverage of the current stock against daily demand and the reorder level.
///
/// Projected quantity may be negative (over-committed stock), so only the
/// mean is clamped here.
pub fn stock_coverage(
    snapshot: Option<&StockSnapshot>,
    daily_mean: f64,
    reorder_level: f64,
) -> StockCoverage {
    let Some(snapshot) = snapshot else {
        return StockCoverage::default();
    };
    let daily_mean = non_negative(daily_mean);
    let on_hand = finite(snapshot.on_hand_qty);
    let projected = finite(snapshot.projected_qty);

    StockCoverage {
        on_hand_qty: on_hand,
        projected_qty: projected,
        reserved_qty: finite(snapshot.reserved_qty),
        ordered_qty: finite(snapshot.ordered_qty),
        on_hand_coverage_days: coverage_days(on_hand, daily_mean),
        projected_coverage_days: coverage_days(projected, daily_mean),
        projected_minus_rol: projected - non_negative(reorder_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StockSnapshot {
        StockSnapshot {
            on_hand_qty: 100.0,
            projected_qty: 80.0,
            reserved_qty: 30.0,
            ordered_qty: 10.0,
        }
    }

    #[test]
    fn test_coverage_days() {
        let coverage = stock_coverage(Some(&snapshot()), 4.0, 50.0);
        assert_eq!(coverage.on_hand_coverage_days, 25.0);
        assert_eq!(coverage.projected_coverage_days, 20.0);
        assert_eq!(coverage.projected_minus_rol, 30.0);
        assert_eq!(coverage.reserved_qty, 30.0);
    }

    #[test]
    fn test_zero_demand_has_no_coverage_days() {
        let coverage = stock_coverage(Some(&snapshot()), 0.0, 0.0);
        assert_eq!(coverage.on_hand_coverage_days, 0.0);
        assert_eq!(coverage.projected_minus_rol, 80.0);
    }

    #[test]
    fn test_shortage_is_negative() {
        let coverage = stock_coverage(Some(&snapshot()), 1.0, 120.0);
        assert_eq!(coverage.projected_minus_rol, -40.0);
    }

    #[test]
    fn test_missing_snapshot() {
        assert_eq!(stock_coverage(None, 3.0, 10.0), StockCoverage::default());
    }
}
