//! Budget API endpoints

use api_types::{
    budget::{
        BudgetItemInput, BudgetItemResponse, BudgetItemsResponse, BudgetSummariesResponse,
        BudgetSummaryResponse,
    },
    trip::Deleted,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::User;

use crate::{
    ServerError,
    convert::{
        budget_item_draft, budget_item_patch, budget_item_view, parse_id, summary_view,
        totals_view, trip_summary_view,
    },
    server::ServerState,
};

pub async fn add_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetItemInput>, ServerError>,
) -> Result<(StatusCode, Json<BudgetItemResponse>), ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let item = state
        .engine
        .add_budget_item(user.id, trip_id, &budget_item_draft(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BudgetItemResponse {
            budget_item: budget_item_view(&item),
        }),
    ))
}

/// Items newest first, with the totals they add up to.
pub async fn list_items(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
) -> Result<Json<BudgetItemsResponse>, ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let (items, totals) = state.engine.list_budget_items(user.id, trip_id).await?;

    Ok(Json(BudgetItemsResponse {
        budget_items: items.iter().map(budget_item_view).collect(),
        summary: totals_view(&totals),
    }))
}

pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<String>,
) -> Result<Json<BudgetSummaryResponse>, ServerError> {
    let trip_id = parse_id(&trip_id, "trip")?;
    let summary = state.engine.budget_summary(user.id, trip_id).await?;
    Ok(Json(BudgetSummaryResponse {
        summary: summary_view(&summary),
    }))
}

pub async fn summaries(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetSummariesResponse>, ServerError> {
    let summaries = state.engine.budget_summaries(user.id).await?;
    Ok(Json(BudgetSummariesResponse {
        summaries: summaries.iter().map(trip_summary_view).collect(),
    }))
}

pub async fn update_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetItemInput>, ServerError>,
) -> Result<Json<BudgetItemResponse>, ServerError> {
    let item_id = parse_id(&item_id, "budget item")?;
    let item = state
        .engine
        .update_budget_item(user.id, item_id, &budget_item_patch(payload))
        .await?;
    Ok(Json(BudgetItemResponse {
        budget_item: budget_item_view(&item),
    }))
}

pub async fn delete_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let item_id = parse_id(&item_id, "budget item")?;
    state.engine.delete_budget_item(user.id, item_id).await?;
    Ok(Json(Deleted {
        success: true,
        message: "Budget item deleted successfully".to_string(),
    }))
}
