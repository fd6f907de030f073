//! HTTP handlers for reorder planning endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use shared::{ItemPlan, ManualPolicyInput, ManualPolicyOutput, ReorderTarget};

use crate::error::AppResult;
use crate::services::planning::{
    ComputePolicyInput, CreateMaterialRequestInput, MaterialRequestCreated, PlanningRequestInput,
    PlanningRequestResult, ReorderLevelResult,
};
use crate::services::{PlanningService, ReportingService};
use crate::AppState;

fn service(state: &AppState) -> PlanningService {
    PlanningService::new(state.db.clone(), state.config.planning.clone())
}

/// Compute one item's policy
pub async fn compute_policy(
    State(state): State<AppState>,
    Json(input): Json<ComputePolicyInput>,
) -> AppResult<Json<ItemPlan>> {
    let plan = service(&state).compute_item(input).await?;
    Ok(Json(plan))
}

/// Recompute every row of a material planning request
pub async fn recompute_request(
    State(state): State<AppState>,
    Json(input): Json<PlanningRequestInput>,
) -> AppResult<Json<PlanningRequestResult>> {
    let result = service(&state).recompute_request(&input).await?;
    Ok(Json(result))
}

/// Recompute a material planning request and return it as CSV
pub async fn export_request(
    State(state): State<AppState>,
    Json(input): Json<PlanningRequestInput>,
) -> AppResult<Response> {
    let result = service(&state).recompute_request(&input).await?;
    let csv = ReportingService::export_planning_rows(&result.rows)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"material_planning_request.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Compute a manual planning policy
pub async fn manual_policy(
    State(state): State<AppState>,
    Json(input): Json<ManualPolicyInput>,
) -> AppResult<Json<ManualPolicyOutput>> {
    let output = service(&state).manual_policy(&input).await?;
    Ok(Json(output))
}

/// Apply a policy to the item's reorder table
pub async fn apply_reorder_level(
    State(state): State<AppState>,
    Json(target): Json<ReorderTarget>,
) -> AppResult<Json<ReorderLevelResult>> {
    let result = service(&state).apply_reorder_level(&target).await?;
    Ok(Json(result))
}

/// Create a draft material request from selected planning rows
pub async fn create_material_request(
    State(state): State<AppState>,
    Json(input): Json<CreateMaterialRequestInput>,
) -> AppResult<Json<MaterialRequestCreated>> {
    let created = service(&state).create_material_request(&input).await?;
    Ok(Json(created))
}
