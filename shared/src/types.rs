//! Common types used across the planning workspace

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range for history queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[as_of - days, as_of]`
    pub fn trailing_days(as_of: NaiveDate, days: i64) -> Self {
        Self {
            start: as_of - Duration::days(days.max(0)),
            end: as_of,
        }
    }

    /// `[as_of - months, as_of]`, clamping to month ends like calendar arithmetic does
    pub fn trailing_months(as_of: NaiveDate, months: u32) -> Self {
        let start = as_of
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: as_of }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
