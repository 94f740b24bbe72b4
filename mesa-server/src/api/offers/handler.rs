//! Offer API Handlers

use axum::extract::State;
use http::StatusCode;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Offer, OfferCreate};
use shared::util::{new_id, now_millis};

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::auth::CurrentUser;
use crate::core::{ServerState, ServiceError};
use crate::utils::time::{local_today, parse_date};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text, validate_text_len,
};

#[derive(Debug, Deserialize)]
pub struct OfferQuery {
    pub restaurant_id: Option<String>,
}

/// Percentage in (0, 100]
fn validate_discount(discount: f64) -> AppResult<()> {
    if discount.is_finite() && discount > 0.0 && discount <= 100.0 {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::InvalidDiscount,
        "discount must be greater than 0 and at most 100",
    )
    .with_detail("discount", discount))
}

/// GET /api/offers - offers still valid today
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<OfferQuery>,
) -> AppResult<ApiResponse<Vec<Offer>>> {
    let offers = state
        .store()
        .list_offers(query.restaurant_id.as_deref(), local_today())
        .await
        .map_err(ServiceError::from)?;
    Ok(ApiResponse::success(offers))
}

/// POST /api/offers - admin, or the restaurant's own admin
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(payload): AppJson<OfferCreate>,
) -> AppResult<(StatusCode, ApiResponse<Offer>)> {
    current.require_restaurant_admin(&payload.restaurant_id)?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_text_len(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_discount(payload.discount)?;

    let valid_until = parse_date(&payload.valid_until)?;
    if valid_until < local_today() {
        return Err(AppError::validation("valid_until must not be in the past")
            .with_detail("field", "valid_until"));
    }

    let exists = state
        .store()
        .get_restaurant(&payload.restaurant_id)
        .await
        .map_err(ServiceError::from)?
        .is_some();
    if !exists {
        return Err(AppError::new(ErrorCode::RestaurantNotFound)
            .with_detail("id", payload.restaurant_id));
    }

    let offer = Offer {
        id: new_id(),
        restaurant_id: payload.restaurant_id,
        title: payload.title.trim().to_string(),
        description: payload.description,
        discount: payload.discount,
        valid_until,
        created_at: now_millis(),
    };
    state
        .store()
        .insert_offer(&offer)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(offer_id = %offer.id, restaurant_id = %offer.restaurant_id, "Offer created");
    Ok((StatusCode::CREATED, ApiResponse::success(offer)))
}

/// DELETE /api/offers/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<()>> {
    let not_found = || AppError::new(ErrorCode::OfferNotFound).with_detail("id", id.as_str());
    let offer = state
        .store()
        .get_offer(&id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    current.require_restaurant_admin(&offer.restaurant_id)?;

    if !state.store().delete_offer(&id).await.map_err(ServiceError::from)? {
        return Err(not_found());
    }
    Ok(ApiResponse::ok("Offer deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_bounds() {
        assert!(validate_discount(100.0).is_ok());
        assert!(validate_discount(12.5).is_ok());
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            assert_eq!(
                validate_discount(bad).unwrap_err().code,
                ErrorCode::InvalidDiscount
            );
        }
    }
}
