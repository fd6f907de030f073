//! Daily demand mean and standard deviation
//!
//! Stable (X) items with a usable monthly profile use the T12 monthly totals.
//! Everything else falls back to weekly buckets over the trailing window.
//! The two paths produce different sigmas for the same history; both are kept
//! and the choice follows the item's XYZ class.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::PlanningConfig;
use super::stats::{mean, non_negative, sample_stddev};
use crate::models::{DemandEvent, DemandProfile, XyzClass};
use crate::types::DateRange;

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_WEEK: f64 = 7.0;

/// Where a demand estimate came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DemandSource {
    Monthly,
    Weekly,
    NoHistory,
}

/// Daily demand statistics in units per day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DemandStats {
    pub mean: f64,
    pub stddev: f64,
    pub source: DemandSource,
}

impl DemandStats {
    pub fn none() -> Self {
        Self {
            mean: 0.0,
            stddev: 0.0,
            source: DemandSource::NoHistory,
        }
    }
}

/// Date range the weekly path reads: `weeks_back` whole weeks ending on `as_of`
pub fn weekly_window(as_of: NaiveDate, weeks_back: u32) -> DateRange {
    let days = i64::from(weeks_back) * 7 - 1;
    DateRange::trailing_days(as_of, days)
}

/// Monthly-path estimate, if the profile has enough history for it
pub fn monthly_demand(profile: &DemandProfile) -> Option<DemandStats> {
    if profile.total_units <= 0.0 || profile.monthly_stddev <= 0.0 {
        return None;
    }
    Some(DemandStats {
        mean: non_negative(profile.total_units / DAYS_PER_YEAR),
        stddev: non_negative(profile.monthly_stddev / (DAYS_PER_YEAR / MONTHS_PER_YEAR).sqrt()),
        source: DemandSource::Monthly,
    })
}

/// Issued quantity per week, most recent week first.
///
/// Week 0 ends on `as_of`. Every week in the window has a bucket, so weeks
/// without issues count as zero demand.
pub fn weekly_totals(events: &[DemandEvent], as_of: NaiveDate, weeks_back: u32) -> Vec<f64> {
    let mut buckets = vec![0.0; weeks_back as usize];
    for event in events.iter().filter(|e| e.confirmed) {
        let days_ago = (as_of - event.posting_date).num_days();
        if days_ago < 0 {
            continue;
        }
        let week = (days_ago / 7) as usize;
        if let Some(bucket) = buckets.get_mut(week) {
            *bucket += event.issued_qty();
        }
    }
    buckets
}

/// Weekly-path estimate from invoice and delivery issues
pub fn weekly_demand(events: &[DemandEvent], as_of: NaiveDate, weeks_back: u32) -> DemandStats {
    let totals = weekly_totals(events, as_of, weeks_back);
    if totals.iter().sum::<f64>() <= 0.0 {
        return DemandStats::none();
    }
    DemandStats {
        mean: non_negative(mean(&totals) / DAYS_PER_WEEK),
        stddev: non_negative(sample_stddev(&totals) / DAYS_PER_WEEK.sqrt()),
        source: DemandSource::Weekly,
    }
}

/// Pick the demand path for an item and estimate its daily demand
pub fn estimate_demand(
    variability: XyzClass,
    profile: &DemandProfile,
    weekly_events: &[DemandEvent],
    as_of: NaiveDate,
    config: &PlanningConfig,
) -> DemandStats {
    if variability == XyzClass::X {
        if let Some(stats) = monthly_demand(profile) {
            return stats;
        }
    }
    weekly_demand(weekly_events, as_of, config.weeks_back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DemandKind;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn issue(days_ago: i64, qty: f64, kind: DemandKind) -> DemandEvent {
        DemandEvent {
            item: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: None,
            kind,
            customer: None,
            qty,
            posting_date: as_of() - chrono::Duration::days(days_ago),
            confirmed: true,
        }
    }

    #[test]
    fn test_weekly_buckets_end_on_as_of() {
        let events = vec![
            issue(0, 5.0, DemandKind::Invoice),
            issue(6, 5.0, DemandKind::Delivery),
            issue(7, 3.0, DemandKind::Invoice),
            issue(400, 99.0, DemandKind::Invoice),
        ];
        let totals = weekly_totals(&events, as_of(), 4);
        assert_eq!(totals, vec![10.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weekly_window_covers_whole_weeks() {
        let window = weekly_window(as_of(), 52);
        assert_eq!(window.days(), 363);
        let events = vec![issue(363, 1.0, DemandKind::Invoice)];
        assert_eq!(weekly_totals(&events, as_of(), 52)[51], 1.0);
    }

    #[test]
    fn test_constant_weekly_demand() {
        let events: Vec<DemandEvent> = (0..26)
            .map(|w| issue(w * 7, 14.0, DemandKind::Delivery))
            .collect();
        let stats = weekly_demand(&events, as_of(), 26);
        assert_eq!(stats.source, DemandSource::Weekly);
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert!(stats.stddev.abs() < 1e-12);
    }

    #[test]
    fn test_returns_are_excluded() {
        let events = vec![
            issue(0, 7.0, DemandKind::Invoice),
            issue(1, -7.0, DemandKind::Invoice),
        ];
        let totals = weekly_totals(&events, as_of(), 2);
        assert_eq!(totals, vec![7.0, 0.0]);
    }

    #[test]
    fn test_no_observations_is_zero() {
        let stats = weekly_demand(&[], as_of(), 52);
        assert_eq!(stats, DemandStats::none());
    }

    #[test]
    fn test_monthly_path_for_stable_items() {
        let profile = DemandProfile {
            avg_monthly_qty: 100.0,
            monthly_stddev: 10.0,
            total_units: 1200.0,
            cv: Some(0.1),
            customer_count: 3,
            active_months: 12,
        };
        let stats = estimate_demand(XyzClass::X, &profile, &[], as_of(), &PlanningConfig::default());
        assert_eq!(stats.source, DemandSource::Monthly);
        assert!((stats.mean - 1200.0 / 365.0).abs() < 1e-12);
        assert!((stats.stddev - 10.0 / (365.0f64 / 12.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_path_needs_variation() {
        // A perfectly flat profile has no monthly sigma, so weekly stats are used
        let profile = DemandProfile {
            avg_monthly_qty: 100.0,
            monthly_stddev: 0.0,
            total_units: 1200.0,
            cv: Some(0.0),
            customer_count: 3,
            active_months: 12,
        };
        let events = vec![issue(0, 7.0, DemandKind::Invoice)];
        let config = PlanningConfig {
            weeks_back: 26,
            ..PlanningConfig::default()
        };
        let stats = estimate_demand(XyzClass::X, &profile, &events, as_of(), &config);
        assert_eq!(stats.source, DemandSource::Weekly);
        assert!((stats.mean - 7.0 / 26.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_variable_items_use_weekly_path() {
        let profile = DemandProfile {
            avg_monthly_qty: 100.0,
            monthly_stddev: 90.0,
            total_units: 1200.0,
            cv: Some(0.9),
            customer_count: 3,
            active_months: 12,
        };
        let stats = estimate_demand(XyzClass::Y, &profile, &[], as_of(), &PlanningConfig::default());
        assert_eq!(stats.source, DemandSource::NoHistory);
        assert_eq!(stats.mean, 0.0);
    }
}
