//! Staff API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::{DiningTable, Reservation, StaffCreate, User};

use crate::api::extract::{AppJson, AppQuery};
use crate::api::reservations::{ReservationQuery, collect};
use crate::auth::{CurrentUser, accounts};
use crate::core::ServerState;

/// `date` and `status` narrow the listing; admins may pick a restaurant
#[derive(Debug, Default, Deserialize)]
pub struct StaffReservationQuery {
    pub date: Option<String>,
    pub status: Option<String>,
    pub restaurant_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StaffTableQuery {
    pub restaurant_id: Option<String>,
}

/// GET /api/staff/reservations
///
/// Non-admins only ever see their own restaurant.
pub async fn reservations(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppQuery(query): AppQuery<StaffReservationQuery>,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    let filter = ReservationQuery {
        restaurant_id: query.restaurant_id,
        date: query.date,
        status: query.status,
        ..Default::default()
    }
    .into_filter()?;
    Ok(ApiResponse::success(collect(&state, filter, &current).await?))
}

/// GET /api/staff/tables
pub async fn tables(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppQuery(query): AppQuery<StaffTableQuery>,
) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    let tables = match query.restaurant_id {
        Some(restaurant_id) => {
            current.require_restaurant_staff(&restaurant_id)?;
            state.tables().list(&restaurant_id).await?
        }
        None => state.tables().list_for_staff(&current).await?,
    };
    Ok(ApiResponse::success(tables))
}

/// POST /api/staff - create a staff or restaurant admin account (admin only)
pub async fn create_staff(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<StaffCreate>,
) -> AppResult<(StatusCode, ApiResponse<User>)> {
    let user = accounts::create_staff(state.store(), &payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(user)))
}
