//! Dining Table API Handlers

use axum::extract::State;
use shared::error::{ApiResponse, AppResult};
use shared::models::{DiningTable, DiningTableUpdate, TableStatusUpdate};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<DiningTable>> {
    Ok(ApiResponse::success(state.tables().get(&id).await?))
}

/// PUT /api/tables/{id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<DiningTableUpdate>,
) -> AppResult<ApiResponse<DiningTable>> {
    Ok(ApiResponse::success(
        state.tables().update(&id, &payload, &current).await?,
    ))
}

/// DELETE /api/tables/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.tables().delete(&id, &current).await?;
    Ok(ApiResponse::ok("Table deleted"))
}

/// PATCH /api/tables/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<TableStatusUpdate>,
) -> AppResult<ApiResponse<DiningTable>> {
    let table = state
        .tables()
        .set_status(&id, &payload.status, &current)
        .await?;
    Ok(ApiResponse::success_with_message(
        format!("Table status updated to {}", table.status),
        table,
    ))
}
