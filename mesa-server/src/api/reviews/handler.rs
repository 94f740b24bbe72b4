//! Review API Handlers
//!
//! Adding a review recomputes the restaurant's rating and review count in
//! the same store operation. The created review is returned; the refreshed
//! aggregate is reported in the response message.

use axum::extract::State;
use http::StatusCode;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{MAX_RATING, MIN_RATING, Review, ReviewCreate};
use shared::util::{new_id, now_millis};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::{ServerState, ServiceError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text, validate_text_len,
};

fn restaurant_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id)
}

async fn ensure_restaurant(state: &ServerState, id: &str) -> AppResult<()> {
    let exists = state
        .store()
        .get_restaurant(id)
        .await
        .map_err(ServiceError::from)?
        .is_some();
    if !exists {
        return Err(restaurant_not_found(id));
    }
    Ok(())
}

/// GET /api/reviews/restaurant/{id} - newest first
pub async fn list_for_restaurant(
    State(state): State<ServerState>,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<Review>>> {
    ensure_restaurant(&state, &id).await?;
    let reviews = state
        .store()
        .list_reviews(&id)
        .await
        .map_err(ServiceError::from)?;
    Ok(ApiResponse::success(reviews))
}

/// POST /api/reviews - any signed-in user
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(payload): AppJson<ReviewCreate>,
) -> AppResult<(StatusCode, ApiResponse<Review>)> {
    if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRating,
            format!("rating must be between {MIN_RATING} and {MAX_RATING}"),
        )
        .with_detail("rating", payload.rating));
    }
    validate_text_len(&payload.comment, "comment", MAX_NOTE_LEN)?;
    let customer_name = payload
        .customer_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| current.name.clone());
    validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
    ensure_restaurant(&state, &payload.restaurant_id).await?;

    let review = Review {
        id: new_id(),
        restaurant_id: payload.restaurant_id,
        rating: payload.rating,
        comment: payload.comment,
        customer_name: customer_name.trim().to_string(),
        user_id: Some(current.id.clone()),
        created_at: now_millis(),
    };

    let restaurant = state
        .store()
        .add_review(&review)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| restaurant_not_found(&review.restaurant_id))?;

    tracing::info!(
        review_id = %review.id,
        restaurant_id = %restaurant.id,
        rating = restaurant.rating,
        review_count = restaurant.review_count,
        "Review added"
    );
    let message = format!(
        "Review added, {} now rated {:.1} from {} reviews",
        restaurant.name, restaurant.rating, restaurant.review_count
    );
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(message, review),
    ))
}
