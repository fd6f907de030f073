//! Purchase order to receipt lead time statistics

use serde::{Deserialize, Serialize};

use super::stats::{mean, nearest_rank};
use crate::models::ProcurementReceipt;

/// Lead time percentiles and mean, in days
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeadTimeStats {
    pub p50: f64,
    pub p80: f64,
    pub mean: f64,
    /// Number of matched receipts
    pub samples: usize,
}

/// Matched, non-negative lead times sorted ascending
pub fn lead_time_samples(receipts: &[ProcurementReceipt]) -> Vec<f64> {
    let mut samples: Vec<f64> = receipts
        .iter()
        .filter(|r| r.confirmed)
        .filter_map(ProcurementReceipt::lead_days)
        .collect();
    samples.sort_by(|a, b| a.total_cmp(b));
    samples
}

/// P50 / P80 (nearest rank) and mean of the sample vector; zeros when empty
pub fn lead_time_stats(samples: &[f64]) -> LeadTimeStats {
    if samples.is_empty() {
        return LeadTimeStats::default();
    }
    LeadTimeStats {
        p50: nearest_rank(samples, 50.0),
        p80: nearest_rank(samples, 80.0),
        mean: mean(samples),
        samples: samples.len(),
    }
}

/// Lead time statistics for a set of receipts
pub fn estimate_lead_time(receipts: &[ProcurementReceipt]) -> LeadTimeStats {
    let stats = lead_time_stats(&lead_time_samples(receipts));
    if stats.samples == 0 {
        tracing::debug!(
            receipts = receipts.len(),
            "no matched receipts, lead time statistics are zero"
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderLink;
    use chrono::{Duration, NaiveDate};

    fn receipt(order_days_before: i64) -> ProcurementReceipt {
        let received = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        ProcurementReceipt {
            item: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: None,
            receipt_date: received,
            confirmed: true,
            order_line: Some(OrderLink {
                reference: "PO-1".to_string(),
                transaction_date: received - Duration::days(order_days_before),
                confirmed: true,
            }),
            order: None,
        }
    }

    #[test]
    fn test_percentiles_one_to_ten() {
        let receipts: Vec<ProcurementReceipt> = (1..=10).rev().map(receipt).collect();
        let stats = estimate_lead_time(&receipts);
        assert_eq!(stats.p50, 5.0);
        assert_eq!(stats.p80, 8.0);
        assert!((stats.mean - 5.5).abs() < 1e-12);
        assert_eq!(stats.samples, 10);
    }

    #[test]
    fn test_negative_deltas_are_discarded_not_clamped() {
        let receipts = vec![receipt(-3), receipt(4), receipt(0)];
        assert_eq!(lead_time_samples(&receipts), vec![0.0, 4.0]);
    }

    #[test]
    fn test_unconfirmed_receipts_are_ignored() {
        let mut pending = receipt(30);
        pending.confirmed = false;
        assert!(lead_time_samples(&[pending]).is_empty());
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(estimate_lead_time(&[]), LeadTimeStats::default());
    }
}
