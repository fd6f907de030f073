//! Transaction history records read by the planning engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of demand transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DemandKind {
    /// Customer invoice issue
    Invoice,
    /// Delivery note issue
    Delivery,
}

impl DemandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandKind::Invoice => "invoice",
            DemandKind::Delivery => "delivery",
        }
    }
}

/// A single demand line (sales invoice or delivery issue)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandEvent {
    pub item: String,
    pub company: String,
    pub cost_center: String,
    pub warehouse: Option<String>,
    pub kind: DemandKind,
    /// Customer on the invoice; deliveries may not carry one
    pub customer: Option<String>,
    /// Signed quantity; returns come through as negative lines
    pub qty: f64,
    pub posting_date: NaiveDate,
    /// Only posted documents count as demand
    pub confirmed: bool,
}

impl DemandEvent {
    /// Quantity counted as demand: negative, NaN and infinite lines contribute nothing.
    pub fn issued_qty(&self) -> f64 {
        if self.qty.is_finite() && self.qty > 0.0 {
            self.qty
        } else {
            0.0
        }
    }
}

/// Reference from a receipt to the purchase order (or order line) it fulfils
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLink {
    pub reference: String,
    pub transaction_date: NaiveDate,
    pub confirmed: bool,
}

/// A purchase receipt line together with its order linkage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementReceipt {
    pub item: String,
    pub company: String,
    pub cost_center: String,
    pub warehouse: Option<String>,
    pub receipt_date: NaiveDate,
    pub confirmed: bool,
    /// Direct receipt line -> order line linkage
    pub order_line: Option<OrderLink>,
    /// Order-level reference only
    pub order: Option<OrderLink>,
}

impl ProcurementReceipt {
    /// Order date the receipt is measured against.
    ///
    /// A confirmed order-line linkage wins; otherwise the confirmed order-level
    /// reference is used. Receipts with neither are unmatched.
    pub fn matched_order_date(&self) -> Option<NaiveDate> {
        self.order_line
            .as_ref()
            .filter(|link| link.confirmed)
            .or_else(|| self.order.as_ref().filter(|link| link.confirmed))
            .map(|link| link.transaction_date)
    }

    /// Order-to-receipt days, or `None` when unmatched or the receipt predates the order.
    pub fn lead_days(&self) -> Option<f64> {
        let ordered = self.matched_order_date()?;
        let delta = (self.receipt_date - ordered).num_days();
        if delta < 0 {
            return None;
        }
        Some(delta as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn link(day: u32, confirmed: bool) -> OrderLink {
        OrderLink {
            reference: format!("PO-{}", day),
            transaction_date: date(2025, 1, day),
            confirmed,
        }
    }

    fn receipt(order_line: Option<OrderLink>, order: Option<OrderLink>) -> ProcurementReceipt {
        ProcurementReceipt {
            item: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: None,
            receipt_date: date(2025, 1, 20),
            confirmed: true,
            order_line,
            order,
        }
    }

    #[test]
    fn test_order_line_takes_precedence() {
        let r = receipt(Some(link(10, true)), Some(link(2, true)));
        assert_eq!(r.lead_days(), Some(10.0));
    }

    #[test]
    fn test_falls_back_to_order_reference() {
        let r = receipt(None, Some(link(5, true)));
        assert_eq!(r.lead_days(), Some(15.0));

        let unconfirmed_line = receipt(Some(link(10, false)), Some(link(5, true)));
        assert_eq!(unconfirmed_line.lead_days(), Some(15.0));
    }

    #[test]
    fn test_unmatched_and_negative_are_dropped() {
        assert_eq!(receipt(None, None).lead_days(), None);

        let mut early = receipt(None, Some(link(25, true)));
        early.receipt_date = date(2025, 1, 20);
        assert_eq!(early.lead_days(), None);
    }

    #[test]
    fn test_same_day_receipt_is_zero() {
        let r = receipt(Some(link(20, true)), None);
        assert_eq!(r.lead_days(), Some(0.0));
    }

    #[test]
    fn test_issued_qty_clamps_returns() {
        let mut event = DemandEvent {
            item: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: None,
            kind: DemandKind::Invoice,
            customer: Some("CUST-1".to_string()),
            qty: -4.0,
            posting_date: date(2025, 1, 1),
            confirmed: true,
        };
        assert_eq!(event.issued_qty(), 0.0);
        event.qty = f64::NAN;
        assert_eq!(event.issued_qty(), 0.0);
        event.qty = 7.5;
        assert_eq!(event.issued_qty(), 7.5);
    }
}
