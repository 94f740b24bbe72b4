//! Reservation API Handlers

use axum::extract::State;
use futures::TryStreamExt;
use http::StatusCode;
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    DepositRecord, Reservation, ReservationCreate, ReservationFilter, ReservationStatusUpdate,
};

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::auth::CurrentUser;
use crate::core::{ServerState, ServiceError};
use crate::utils::time::{local_now, parse_date};

/// Query string of `GET /api/reservations`
///
/// `date` pins a single day and overrides `from` / `to`.
#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub restaurant_id: Option<String>,
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub table_id: Option<String>,
    pub email: Option<String>,
}

impl ReservationQuery {
    pub fn into_filter(self) -> AppResult<ReservationFilter> {
        let parse = |v: Option<String>| v.as_deref().map(parse_date).transpose();
        let (from, to) = match parse(self.date)? {
            Some(day) => (Some(day), Some(day)),
            None => (parse(self.from)?, parse(self.to)?),
        };
        Ok(ReservationFilter {
            restaurant_id: self.restaurant_id,
            from,
            to,
            status: self.status.as_deref().map(str::parse).transpose()?,
            table_id: self.table_id,
            email: self.email,
        })
    }
}

/// Drain a scoped listing into memory
pub(crate) async fn collect(
    state: &ServerState,
    filter: ReservationFilter,
    current: &CurrentUser,
) -> AppResult<Vec<Reservation>> {
    let reservations = state
        .reservations()
        .list(filter, current)?
        .try_collect::<Vec<_>>()
        .await
        .map_err(ServiceError::from)?;
    Ok(reservations)
}

/// POST /api/reservations - public booking
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ReservationCreate>,
) -> AppResult<(StatusCode, ApiResponse<Reservation>)> {
    let reservation = state.reservations().create(&payload, local_now()).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Reservation created", reservation),
    ))
}

/// GET /api/reservations
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppQuery(query): AppQuery<ReservationQuery>,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    let reservations = collect(&state, query.into_filter()?, &current).await?;
    Ok(ApiResponse::success(reservations))
}

/// GET /api/reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<Reservation>> {
    Ok(ApiResponse::success(
        state.reservations().get(&id, &current).await?,
    ))
}

/// PATCH /api/reservations/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<ReservationStatusUpdate>,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = state
        .reservations()
        .update_status(&id, &payload.status, &current)
        .await?;
    Ok(ApiResponse::success(reservation))
}

/// POST /api/reservations/{id}/deposit
pub async fn record_deposit(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<DepositRecord>,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = state
        .reservations()
        .record_deposit(&id, payload.amount, &current)
        .await?;
    Ok(ApiResponse::success(reservation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::error::ErrorCode;
    use shared::models::ReservationStatus;

    #[test]
    fn single_date_pins_both_bounds() {
        let filter = ReservationQuery {
            date: Some("2030-06-01".into()),
            from: Some("2030-01-01".into()),
            status: Some("confirmed".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        assert_eq!(filter.from, Some(day));
        assert_eq!(filter.to, Some(day));
        assert_eq!(filter.status, Some(ReservationStatus::Confirmed));
    }

    #[test]
    fn bad_values_are_validation_errors() {
        let err = ReservationQuery {
            status: Some("seated".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReservationStatus);

        let err = ReservationQuery {
            from: Some("01/06/2030".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
