//! Planning service: loads history from Postgres and runs the planning engine

use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::planning::{
    compute_manual_policy, draft_material_request, history_window, plan_item, recompute_rows,
    upsert_reorder_level, PlanningConfig, PlanningSources, RecomputeSummary,
};
use shared::{
    ItemPlan, ManualPolicyInput, ManualPolicyOutput, MaterialRequestDraft, PlanningRequestHeader,
    PlanningRow, PolicyInput, ReorderLevelRow, ReorderTarget, UpsertOutcome,
};

use super::history::{decimal_to_f64, HistoryRepository, HistoryScope};
use crate::error::{AppError, AppResult};

/// Planning service for policy computation and its follow-up documents
#[derive(Clone)]
pub struct PlanningService {
    db: PgPool,
    history: HistoryRepository,
    config: PlanningConfig,
}

/// Input for computing one item's policy
#[derive(Debug, Deserialize, Validate)]
pub struct ComputePolicyInput {
    #[validate(length(max = 140))]
    pub item: String,
    #[validate(length(max = 140))]
    pub cost_center: String,
    #[serde(default)]
    #[validate(length(max = 140))]
    pub company: String,
    #[validate(length(max = 140))]
    pub warehouse: Option<String>,
    /// Reference date, defaults to today
    pub as_of: Option<NaiveDate>,
}

/// One row of a material planning request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanningRowInput {
    #[validate(length(min = 1, max = 140))]
    pub row_id: String,
    #[serde(default)]
    #[validate(length(max = 140))]
    pub item: String,
    pub uom: Option<String>,
}

/// Input for recomputing a material planning request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanningRequestInput {
    #[serde(default)]
    #[validate(length(max = 140))]
    pub company: String,
    #[serde(default)]
    #[validate(length(max = 140))]
    pub cost_center: String,
    pub warehouse: Option<String>,
    pub posting_date: Option<NaiveDate>,
    #[validate]
    pub rows: Vec<PlanningRowInput>,
    pub as_of: Option<NaiveDate>,
}

impl PlanningRequestInput {
    pub fn header(&self) -> PlanningRequestHeader {
        PlanningRequestHeader {
            company: self.company.clone(),
            cost_center: self.cost_center.clone(),
            warehouse: self.warehouse.clone(),
            posting_date: self.posting_date,
        }
    }
}

/// Recomputed material planning request
#[derive(Debug, Clone, Serialize)]
pub struct PlanningRequestResult {
    pub header: PlanningRequestHeader,
    pub rows: Vec<PlanningRow>,
    pub computed: usize,
    pub cleared: usize,
    pub failed: usize,
}

/// Input for creating a material request from a planning request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialRequestInput {
    #[validate]
    pub request: PlanningRequestInput,
    /// Row ids picked by the planner
    #[serde(default)]
    pub selected: Vec<String>,
}

/// Created draft material request
#[derive(Debug, Serialize)]
pub struct MaterialRequestCreated {
    pub material_request: Uuid,
    pub draft: MaterialRequestDraft,
}

/// Result of applying a policy to an item's reorder table
#[derive(Debug, Serialize)]
pub struct ReorderLevelResult {
    pub item: String,
    pub op: UpsertOutcome,
}

/// Row for reorder level query
#[derive(Debug, FromRow)]
struct ReorderLevelDbRow {
    warehouse: String,
    warehouse_group: Option<String>,
    reorder_level: Decimal,
    reorder_qty: Decimal,
    material_request_type: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

impl PlanningService {
    /// Create a new PlanningService instance
    pub fn new(db: PgPool, config: PlanningConfig) -> Self {
        Self {
            history: HistoryRepository::new(db.clone()),
            db,
            config,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Compute the policy, demand profile and stock coverage for one item
    pub async fn compute_item(&self, input: ComputePolicyInput) -> AppResult<ItemPlan> {
        input.validate()?;
        let as_of = input.as_of.unwrap_or_else(Self::today);

        let mut policy_input = PolicyInput::new(&input.item, &input.cost_center, &input.company);
        policy_input.warehouse = input.warehouse.as_deref().and_then(non_blank);

        if !policy_input.is_complete() {
            return Ok(ItemPlan::cleared(input.item.trim(), input.cost_center.trim()));
        }

        let scope = HistoryScope {
            items: vec![policy_input.item.trim().to_string()],
            company: non_blank(&policy_input.company),
            cost_center: non_blank(&policy_input.cost_center),
            since: Some(history_window(&self.config, as_of).start),
            until: as_of,
            reference_data: true,
        };
        let snapshot = self.history.load_snapshot(&scope).await?;

        let plan = plan_item(
            &policy_input,
            PlanningSources::from_snapshot(&snapshot),
            &self.config,
            as_of,
        )?;
        Ok(plan)
    }

    /// Recompute every row of a material planning request
    pub async fn recompute_request(
        &self,
        input: &PlanningRequestInput,
    ) -> AppResult<PlanningRequestResult> {
        input.validate()?;
        let as_of = input.as_of.unwrap_or_else(Self::today);
        let header = input.header();

        let whole_uoms = self.whole_number_uoms(&input.rows).await?;
        let mut rows: Vec<PlanningRow> = input
            .rows
            .iter()
            .map(|row| {
                let uom = row.uom.as_deref().and_then(non_blank);
                PlanningRow {
                    row_id: row.row_id.clone(),
                    item: row.item.clone(),
                    whole_number_uom: uom.as_ref().map_or(false, |u| whole_uoms.contains(u)),
                    uom,
                    plan: ItemPlan::cleared(row.item.trim(), header.cost_center.trim()),
                    error: None,
                }
            })
            .collect();

        let items: Vec<String> = rows
            .iter()
            .filter_map(|r| non_blank(&r.item))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let snapshot = match non_blank(&header.cost_center) {
            Some(cost_center) if !items.is_empty() => {
                let scope = HistoryScope {
                    items,
                    company: non_blank(&header.company),
                    cost_center: Some(cost_center),
                    since: Some(history_window(&self.config, as_of).start),
                    until: as_of,
                    reference_data: true,
                };
                self.history.load_snapshot(&scope).await?
            }
            _ => Default::default(),
        };

        let RecomputeSummary {
            computed,
            cleared,
            failed,
        } = recompute_rows(
            &header,
            &mut rows,
            PlanningSources::from_snapshot(&snapshot),
            &self.config,
            as_of,
        );

        Ok(PlanningRequestResult {
            header,
            rows,
            computed,
            cleared,
            failed,
        })
    }

    /// UOMs among the rows whose quantities must be whole numbers
    async fn whole_number_uoms(&self, rows: &[PlanningRowInput]) -> AppResult<HashSet<String>> {
        let uoms: Vec<String> = rows
            .iter()
            .filter_map(|r| r.uom.as_deref().and_then(non_blank))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if uoms.is_empty() {
            return Ok(HashSet::new());
        }

        let whole = sqlx::query_scalar::<_, String>(
            "SELECT name FROM uoms WHERE name = ANY($1) AND must_be_whole_number",
        )
        .bind(&uoms)
        .fetch_all(&self.db)
        .await?;

        Ok(whole.into_iter().collect())
    }

    /// Compute a manual planning policy
    pub async fn manual_policy(&self, input: &ManualPolicyInput) -> AppResult<ManualPolicyOutput> {
        shared::validate_days(input.safety_days).map_err(|msg| AppError::Validation {
            field: "safety_days".to_string(),
            message: msg.to_string(),
        })?;
        shared::validate_days(input.coverage_days).map_err(|msg| AppError::Validation {
            field: "coverage_days".to_string(),
            message: msg.to_string(),
        })?;

        let as_of = Self::today();
        let Some(item) = non_blank(&input.item) else {
            return Ok(ManualPolicyOutput::default());
        };

        // Lead days average over the whole receipt history
        let scope = HistoryScope {
            items: vec![item],
            company: input.company.as_deref().and_then(non_blank),
            cost_center: input.cost_center.as_deref().and_then(non_blank),
            since: None,
            until: as_of,
            reference_data: false,
        };
        let snapshot = self.history.load_snapshot(&scope).await?;

        Ok(compute_manual_policy(input, &snapshot, &self.config, as_of)?)
    }

    /// Apply planned values to the item's reorder table
    pub async fn apply_reorder_level(&self, target: &ReorderTarget) -> AppResult<ReorderLevelResult> {
        let item = target.item.trim().to_string();
        let mut tx = self.db.begin().await?;

        let mut rows: Vec<ReorderLevelRow> = sqlx::query_as::<_, ReorderLevelDbRow>(
            r#"
            SELECT warehouse, warehouse_group, reorder_level, reorder_qty, material_request_type
            FROM item_reorder_levels
            WHERE item_code = $1
            ORDER BY idx
            FOR UPDATE
            "#,
        )
        .bind(&item)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|row| ReorderLevelRow {
            warehouse: row.warehouse,
            warehouse_group: row.warehouse_group,
            reorder_level: decimal_to_f64(row.reorder_level),
            reorder_qty: decimal_to_f64(row.reorder_qty),
            material_request_type: row.material_request_type,
        })
        .collect();

        let op = upsert_reorder_level(&mut rows, target)?;

        if op.is_dirty() {
            sqlx::query("DELETE FROM item_reorder_levels WHERE item_code = $1")
                .bind(&item)
                .execute(&mut *tx)
                .await?;

            for (idx, row) in rows.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO item_reorder_levels (
                        item_code, idx, warehouse, warehouse_group,
                        reorder_level, reorder_qty, material_request_type
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(&item)
                .bind(idx as i32 + 1)
                .bind(&row.warehouse)
                .bind(&row.warehouse_group)
                .bind(to_decimal(row.reorder_level))
                .bind(to_decimal(row.reorder_qty))
                .bind(&row.material_request_type)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(item = %item, op = op.as_str(), "reorder table updated");
        Ok(ReorderLevelResult { item, op })
    }

    /// Recompute the request, then create one draft material request from the selected rows
    pub async fn create_material_request(
        &self,
        input: &CreateMaterialRequestInput,
    ) -> AppResult<MaterialRequestCreated> {
        input.validate()?;
        let selected: HashSet<String> = input.selected.iter().cloned().collect();

        let recomputed = self.recompute_request(&input.request).await?;
        let today = input.request.as_of.unwrap_or_else(Self::today);
        let draft = draft_material_request(&recomputed.header, &recomputed.rows, &selected, today)?;

        let mut tx = self.db.begin().await?;

        let material_request = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO material_requests (
                company, cost_center, warehouse, material_request_type,
                transaction_date, schedule_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&draft.company)
        .bind(&draft.cost_center)
        .bind(&draft.warehouse)
        .bind(&draft.material_request_type)
        .bind(draft.transaction_date)
        .bind(draft.schedule_date)
        .fetch_one(&mut *tx)
        .await?;

        for (idx, line) in draft.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO material_request_items (
                    material_request_id, idx, item_code, qty, uom,
                    schedule_date, warehouse, planning_row
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(material_request)
            .bind(idx as i32 + 1)
            .bind(&line.item)
            .bind(to_decimal(line.qty))
            .bind(&line.uom)
            .bind(line.schedule_date)
            .bind(&line.warehouse)
            .bind(&line.row_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            material_request = %material_request,
            lines = draft.lines.len(),
            "material request created"
        );
        Ok(MaterialRequestCreated {
            material_request,
            draft,
        })
    }
}
