//! Postgres-backed transaction history
//!
//! The planning engine reads history synchronously, so the repository
//! prefetches everything a request needs into a `HistorySnapshot` first.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use shared::planning::HistorySnapshot;
use shared::{
    ClassificationRecord, DemandEvent, DemandKind, OrderLink, ProcurementReceipt, StockSnapshot,
};

use crate::error::AppResult;

/// What to prefetch
#[derive(Debug, Clone)]
pub struct HistoryScope {
    pub items: Vec<String>,
    pub company: Option<String>,
    pub cost_center: Option<String>,
    /// Earliest posting / receipt date; `None` reads the whole history
    pub since: Option<NaiveDate>,
    pub until: NaiveDate,
    /// Also load ABC records and stock; needs a cost center
    pub reference_data: bool,
}

/// Decimal columns that do not fit an f64 are read as zero
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Row for demand line query
#[derive(Debug, FromRow)]
struct DemandLineRow {
    item_code: String,
    company: String,
    cost_center: String,
    warehouse: Option<String>,
    kind: String,
    customer: Option<String>,
    qty: Decimal,
    posting_date: NaiveDate,
    confirmed: bool,
}

impl From<DemandLineRow> for DemandEvent {
    fn from(row: DemandLineRow) -> Self {
        let kind = match row.kind.as_str() {
            "delivery" => DemandKind::Delivery,
            _ => DemandKind::Invoice,
        };
        DemandEvent {
            item: row.item_code,
            company: row.company,
            cost_center: row.cost_center,
            warehouse: row.warehouse,
            kind,
            customer: row.customer,
            qty: decimal_to_f64(row.qty),
            posting_date: row.posting_date,
            confirmed: row.confirmed,
        }
    }
}

/// Row for receipt query, with both order linkages resolved
#[derive(Debug, FromRow)]
struct ReceiptRow {
    item_code: String,
    company: String,
    cost_center: String,
    warehouse: Option<String>,
    receipt_date: NaiveDate,
    confirmed: bool,
    order_line_ref: Option<String>,
    order_line_date: Option<NaiveDate>,
    order_line_confirmed: Option<bool>,
    order_ref: Option<String>,
    order_date: Option<NaiveDate>,
    order_confirmed: Option<bool>,
}

fn order_link(
    reference: Option<String>,
    date: Option<NaiveDate>,
    confirmed: Option<bool>,
) -> Option<OrderLink> {
    Some(OrderLink {
        reference: reference?,
        transaction_date: date?,
        confirmed: confirmed.unwrap_or(false),
    })
}

impl From<ReceiptRow> for ProcurementReceipt {
    fn from(row: ReceiptRow) -> Self {
        ProcurementReceipt {
            item: row.item_code,
            company: row.company,
            cost_center: row.cost_center,
            warehouse: row.warehouse,
            receipt_date: row.receipt_date,
            confirmed: row.confirmed,
            order_line: order_link(
                row.order_line_ref,
                row.order_line_date,
                row.order_line_confirmed,
            ),
            order: order_link(row.order_ref, row.order_date, row.order_confirmed),
        }
    }
}

#[derive(Debug, FromRow)]
struct ClassificationRow {
    item_code: String,
    cost_center: String,
    tier: String,
    coarse_class: String,
}

#[derive(Debug, FromRow)]
struct StockRow {
    item_code: String,
    cost_center: String,
    on_hand_qty: Decimal,
    projected_qty: Decimal,
    reserved_qty: Decimal,
    ordered_qty: Decimal,
}

/// Reads planning history from Postgres
#[derive(Clone)]
pub struct HistoryRepository {
    db: PgPool,
}

impl HistoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Prefetch demand, receipts, classifications and stock for the scope
    pub async fn load_snapshot(&self, scope: &HistoryScope) -> AppResult<HistorySnapshot> {
        let demand = sqlx::query_as::<_, DemandLineRow>(
            r#"
            SELECT item_code, company, cost_center, warehouse, kind, customer, qty,
                   posting_date, docstatus = 1 AS confirmed
            FROM demand_lines
            WHERE item_code = ANY($1)
              AND ($2::text IS NULL OR company = $2)
              AND ($3::text IS NULL OR cost_center = $3)
              AND ($4::date IS NULL OR posting_date >= $4)
              AND posting_date <= $5
            ORDER BY posting_date
            "#,
        )
        .bind(&scope.items)
        .bind(&scope.company)
        .bind(&scope.cost_center)
        .bind(scope.since)
        .bind(scope.until)
        .fetch_all(&self.db)
        .await?;

        let receipts = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT pri.item_code, pri.company,
                   COALESCE(poi.cost_center, pri.cost_center) AS cost_center,
                   pri.warehouse, pri.receipt_date, pri.docstatus = 1 AS confirmed,
                   poi.id AS order_line_ref,
                   line_po.transaction_date AS order_line_date,
                   line_po.docstatus = 1 AS order_line_confirmed,
                   po.id AS order_ref,
                   po.transaction_date AS order_date,
                   po.docstatus = 1 AS order_confirmed
            FROM purchase_receipt_items pri
            LEFT JOIN purchase_order_items poi ON poi.id = pri.purchase_order_item
            LEFT JOIN purchase_orders line_po ON line_po.id = poi.purchase_order
            LEFT JOIN purchase_orders po ON po.id = pri.purchase_order
            WHERE pri.item_code = ANY($1)
              AND ($2::text IS NULL OR pri.company = $2)
              AND ($3::text IS NULL OR COALESCE(poi.cost_center, pri.cost_center) = $3)
              AND ($4::date IS NULL OR pri.receipt_date >= $4)
              AND pri.receipt_date <= $5
            ORDER BY pri.receipt_date
            "#,
        )
        .bind(&scope.items)
        .bind(&scope.company)
        .bind(&scope.cost_center)
        .bind(scope.since)
        .bind(scope.until)
        .fetch_all(&self.db)
        .await?;

        let mut snapshot = HistorySnapshot::new()
            .with_demand(demand.into_iter().map(DemandEvent::from))
            .with_receipts(receipts.into_iter().map(ProcurementReceipt::from));

        let reference_cost_center = scope.cost_center.as_ref().filter(|_| scope.reference_data);
        if let Some(cost_center) = reference_cost_center {
            let classifications = sqlx::query_as::<_, ClassificationRow>(
                r#"
                SELECT item_code, cost_center,
                       COALESCE(tier, '') AS tier, COALESCE(coarse_class, '') AS coarse_class
                FROM item_classifications
                WHERE item_code = ANY($1) AND cost_center = $2
                "#,
            )
            .bind(&scope.items)
            .bind(cost_center)
            .fetch_all(&self.db)
            .await?;

            for row in classifications {
                snapshot = snapshot.with_classification(ClassificationRecord {
                    item: row.item_code,
                    cost_center: row.cost_center,
                    tier: row.tier,
                    coarse_class: row.coarse_class,
                });
            }

            let stock = sqlx::query_as::<_, StockRow>(
                r#"
                SELECT b.item_code, w.cost_center,
                       COALESCE(SUM(b.actual_qty), 0) AS on_hand_qty,
                       COALESCE(SUM(b.projected_qty), 0) AS projected_qty,
                       COALESCE(SUM(b.reserved_qty), 0) AS reserved_qty,
                       COALESCE(SUM(b.ordered_qty), 0) AS ordered_qty
                FROM bins b
                JOIN warehouses w ON w.name = b.warehouse
                WHERE b.item_code = ANY($1) AND w.cost_center = $2
                GROUP BY b.item_code, w.cost_center
                "#,
            )
            .bind(&scope.items)
            .bind(cost_center)
            .fetch_all(&self.db)
            .await?;

            for row in stock {
                snapshot = snapshot.with_stock(
                    &row.item_code,
                    &row.cost_center,
                    StockSnapshot {
                        on_hand_qty: decimal_to_f64(row.on_hand_qty),
                        projected_qty: decimal_to_f64(row.projected_qty),
                        reserved_qty: decimal_to_f64(row.reserved_qty),
                        ordered_qty: decimal_to_f64(row.ordered_qty),
                    },
                );
            }
        }

        tracing::debug!(
            items = scope.items.len(),
            demand_lines = snapshot.demand.len(),
            receipts = snapshot.receipts.len(),
            "history snapshot loaded"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(decimal_to_f64(Decimal::from_str("12.5").unwrap()), 12.5);
        assert_eq!(decimal_to_f64(Decimal::ZERO), 0.0);
    }

    #[test]
    fn test_receipt_row_links() {
        let row = ReceiptRow {
            item_code: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: None,
            receipt_date: date(2025, 3, 10),
            confirmed: true,
            order_line_ref: None,
            order_line_date: None,
            order_line_confirmed: None,
            order_ref: Some("PO-0001".to_string()),
            order_date: Some(date(2025, 3, 1)),
            order_confirmed: Some(true),
        };
        let receipt = ProcurementReceipt::from(row);
        assert!(receipt.order_line.is_none());
        assert_eq!(receipt.lead_days(), Some(9.0));
    }

    #[test]
    fn test_demand_row_kind() {
        let row = DemandLineRow {
            item_code: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: Some("Stores - AC".to_string()),
            kind: "delivery".to_string(),
            customer: None,
            qty: Decimal::from(4),
            posting_date: date(2025, 3, 10),
            confirmed: true,
        };
        let event = DemandEvent::from(row);
        assert_eq!(event.kind, DemandKind::Delivery);
        assert_eq!(event.qty, 4.0);
    }
}
