//! Read-only collaborators of the planning engine
//!
//! The engine never talks to a database. It reads history through these
//! traits; `HistorySnapshot` is the in-memory implementation used by tests and
//! by callers that prefetch an item's history before running the engine.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::error::PlanningResult;
use crate::models::{
    ClassificationRecord, DemandEvent, PolicyInput, ProcurementReceipt, StockSnapshot,
};
use crate::types::DateRange;

/// Filter for history reads. `None` filters are not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub item: String,
    pub company: Option<String>,
    pub cost_center: Option<String>,
    pub warehouse: Option<String>,
    pub range: DateRange,
}

impl HistoryQuery {
    pub fn for_input(input: &PolicyInput, range: DateRange) -> Self {
        Self {
            item: input.item.trim().to_string(),
            company: non_blank(&input.company),
            cost_center: non_blank(&input.cost_center),
            warehouse: input.warehouse.as_deref().and_then(non_blank),
            range,
        }
    }

    pub fn with_range(&self, range: DateRange) -> Self {
        Self {
            range,
            ..self.clone()
        }
    }

    fn matches(
        &self,
        item: &str,
        company: &str,
        cost_center: &str,
        warehouse: Option<&str>,
        date: NaiveDate,
    ) -> bool {
        if item != self.item || !self.range.contains(date) {
            return false;
        }
        if let Some(c) = &self.company {
            if company != c {
                return false;
            }
        }
        if let Some(cc) = &self.cost_center {
            if cost_center != cc {
                return false;
            }
        }
        if let Some(wh) = &self.warehouse {
            if warehouse != Some(wh.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn matches_demand(&self, event: &DemandEvent) -> bool {
        self.matches(
            &event.item,
            &event.company,
            &event.cost_center,
            event.warehouse.as_deref(),
            event.posting_date,
        )
    }

    pub fn matches_receipt(&self, receipt: &ProcurementReceipt) -> bool {
        self.matches(
            &receipt.item,
            &receipt.company,
            &receipt.cost_center,
            receipt.warehouse.as_deref(),
            receipt.receipt_date,
        )
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collaborator A: demand and procurement history
pub trait TransactionHistory {
    /// Confirmed demand lines matching the query, posting date within the range
    fn demand_events(&self, query: &HistoryQuery) -> PlanningResult<Vec<DemandEvent>>;

    /// Confirmed receipt lines matching the query, receipt date within the range
    fn procurement_receipts(&self, query: &HistoryQuery)
        -> PlanningResult<Vec<ProcurementReceipt>>;
}

/// Collaborator B: ABC records. A missing record is `Ok(None)`, not an error.
pub trait ClassificationLookup {
    fn classification(
        &self,
        item: &str,
        cost_center: &str,
    ) -> PlanningResult<Option<ClassificationRecord>>;
}

/// Collaborator C: current stock, only used for coverage metrics
pub trait StockSnapshotSource {
    fn stock_snapshot(&self, item: &str, cost_center: &str)
        -> PlanningResult<Option<StockSnapshot>>;
}

/// The three collaborators the engine reads from
#[derive(Clone, Copy)]
pub struct PlanningSources<'a> {
    pub history: &'a dyn TransactionHistory,
    pub classifications: &'a dyn ClassificationLookup,
    pub stock: &'a dyn StockSnapshotSource,
}

impl<'a> PlanningSources<'a> {
    pub fn from_snapshot(snapshot: &'a HistorySnapshot) -> Self {
        Self {
            history: snapshot,
            classifications: snapshot,
            stock: snapshot,
        }
    }
}

/// In-memory history for one or more items
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    pub demand: Vec<DemandEvent>,
    pub receipts: Vec<ProcurementReceipt>,
    pub classifications: Vec<ClassificationRecord>,
    pub stock: HashMap<(String, String), StockSnapshot>,
}

impl HistorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demand(mut self, events: impl IntoIterator<Item = DemandEvent>) -> Self {
        self.demand.extend(events);
        self
    }

    pub fn with_receipts(mut self, receipts: impl IntoIterator<Item = ProcurementReceipt>) -> Self {
        self.receipts.extend(receipts);
        self
    }

    pub fn with_classification(mut self, record: ClassificationRecord) -> Self {
        self.classifications.push(record);
        self
    }

    pub fn with_stock(mut self, item: &str, cost_center: &str, snapshot: StockSnapshot) -> Self {
        self.stock
            .insert((item.to_string(), cost_center.to_string()), snapshot);
        self
    }
}

impl TransactionHistory for HistorySnapshot {
    fn demand_events(&self, query: &HistoryQuery) -> PlanningResult<Vec<DemandEvent>> {
        Ok(self
            .demand
            .iter()
            .filter(|e| e.confirmed && query.matches_demand(e))
            .cloned()
            .collect())
    }

    fn procurement_receipts(
        &self,
        query: &HistoryQuery,
    ) -> PlanningResult<Vec<ProcurementReceipt>> {
        Ok(self
            .receipts
            .iter()
            .filter(|r| r.confirmed && query.matches_receipt(r))
            .cloned()
            .collect())
    }
}

impl ClassificationLookup for HistorySnapshot {
    fn classification(
        &self,
        item: &str,
        cost_center: &str,
    ) -> PlanningResult<Option<ClassificationRecord>> {
        Ok(self
            .classifications
            .iter()
            .find(|c| c.item == item && c.cost_center == cost_center)
            .cloned())
    }
}

impl StockSnapshotSource for HistorySnapshot {
    fn stock_snapshot(
        &self,
        item: &str,
        cost_center: &str,
    ) -> PlanningResult<Option<StockSnapshot>> {
        Ok(self
            .stock
            .get(&(item.to_string(), cost_center.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DemandKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(warehouse: Option<&str>, day: u32, confirmed: bool) -> DemandEvent {
        DemandEvent {
            item: "ITEM-1".to_string(),
            company: "ACME".to_string(),
            cost_center: "CC-1".to_string(),
            warehouse: warehouse.map(str::to_string),
            kind: DemandKind::Invoice,
            customer: Some("CUST-1".to_string()),
            qty: 1.0,
            posting_date: date(2025, 3, day),
            confirmed,
        }
    }

    #[test]
    fn test_query_filters_warehouse_only_when_given() {
        let snapshot = HistorySnapshot::new().with_demand(vec![
            event(Some("WH-1"), 1, true),
            event(Some("WH-2"), 2, true),
            event(None, 3, true),
        ]);
        let input = PolicyInput::new("ITEM-1", "CC-1", "ACME");
        let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31));

        let all = snapshot
            .demand_events(&HistoryQuery::for_input(&input, range))
            .unwrap();
        assert_eq!(all.len(), 3);

        let scoped = HistoryQuery::for_input(&input.clone().with_warehouse("WH-1"), range);
        assert_eq!(snapshot.demand_events(&scoped).unwrap().len(), 1);
    }

    #[test]
    fn test_unconfirmed_and_out_of_range_excluded() {
        let snapshot = HistorySnapshot::new().with_demand(vec![
            event(None, 1, false),
            event(None, 20, true),
        ]);
        let input = PolicyInput::new("ITEM-1", "CC-1", "");
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 31));
        let events = snapshot
            .demand_events(&HistoryQuery::for_input(&input, range))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].posting_date, date(2025, 3, 20));
    }

    #[test]
    fn test_missing_classification_is_none() {
        let snapshot = HistorySnapshot::new();
        assert_eq!(snapshot.classification("ITEM-1", "CC-1").unwrap(), None);
        assert_eq!(snapshot.stock_snapshot("ITEM-1", "CC-1").unwrap(), None);
    }
}
