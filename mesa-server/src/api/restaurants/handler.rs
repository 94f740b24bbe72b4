//! Restaurant API Handlers

use axum::extract::State;
use chrono::NaiveTime;
use http::StatusCode;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    DiningTable, DiningTableCreate, Restaurant, RestaurantCreate, RestaurantUpdate,
};
use shared::util::{new_id, now_millis};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::{ServerState, ServiceError};
use crate::db::StoreError;
use crate::utils::time::parse_time;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_optional_text, validate_required_text,
};

fn restaurant_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::RestaurantNotFound).with_detail("id", id)
}

/// Blank clears the value
fn parse_hours(value: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_time(v).map(Some),
    }
}

fn validate_details(
    description: &Option<String>,
    address: &Option<String>,
    phone: &Option<String>,
    cuisine: &Option<String>,
    image_url: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(cuisine, "cuisine", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(image_url, "image_url", MAX_URL_LEN)?;
    Ok(())
}

async fn load(state: &ServerState, id: &str) -> AppResult<Restaurant> {
    state
        .store()
        .get_restaurant(id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| restaurant_not_found(id))
}

/// GET /api/restaurants
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Restaurant>>> {
    let restaurants = state
        .store()
        .list_restaurants()
        .await
        .map_err(ServiceError::from)?;
    Ok(ApiResponse::success(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<Restaurant>> {
    Ok(ApiResponse::success(load(&state, &id).await?))
}

/// POST /api/restaurants - admin only
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(payload): AppJson<RestaurantCreate>,
) -> AppResult<(StatusCode, ApiResponse<Restaurant>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_details(
        &payload.description,
        &payload.address,
        &payload.phone,
        &payload.cuisine,
        &payload.image_url,
    )?;

    let restaurant = Restaurant {
        id: new_id(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        address: payload.address,
        phone: payload.phone,
        cuisine: payload.cuisine,
        image_url: payload.image_url,
        open_time: parse_hours(payload.open_time.as_deref())?,
        close_time: parse_hours(payload.close_time.as_deref())?,
        rating: 0.0,
        review_count: 0,
        created_at: now_millis(),
    };
    state
        .store()
        .insert_restaurant(&restaurant)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(restaurant_id = %restaurant.id, user_id = %current.id, "Restaurant created");
    Ok((StatusCode::CREATED, ApiResponse::success(restaurant)))
}

/// PUT /api/restaurants/{id} - admin, or the restaurant's own admin
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<RestaurantUpdate>,
) -> AppResult<ApiResponse<Restaurant>> {
    current.require_restaurant_admin(&id)?;
    let mut restaurant = load(&state, &id).await?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        restaurant.name = name.trim().to_string();
    }
    validate_details(
        &payload.description,
        &payload.address,
        &payload.phone,
        &payload.cuisine,
        &payload.image_url,
    )?;
    if payload.description.is_some() {
        restaurant.description = payload.description;
    }
    if payload.address.is_some() {
        restaurant.address = payload.address;
    }
    if payload.phone.is_some() {
        restaurant.phone = payload.phone;
    }
    if payload.cuisine.is_some() {
        restaurant.cuisine = payload.cuisine;
    }
    if payload.image_url.is_some() {
        restaurant.image_url = payload.image_url;
    }
    if let Some(open) = payload.open_time.as_deref() {
        restaurant.open_time = parse_hours(Some(open))?;
    }
    if let Some(close) = payload.close_time.as_deref() {
        restaurant.close_time = parse_hours(Some(close))?;
    }

    let updated = state
        .store()
        .update_restaurant(&restaurant)
        .await
        .map_err(ServiceError::from)?;
    if !updated {
        return Err(restaurant_not_found(&id));
    }
    Ok(ApiResponse::success(restaurant))
}

/// DELETE /api/restaurants/{id} - admin only
///
/// Tables, offers and reviews go with the restaurant; reservation history
/// blocks the deletion.
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<()>> {
    match state.store().delete_restaurant(&id).await {
        Ok(true) => {
            tracing::info!(restaurant_id = %id, user_id = %current.id, "Restaurant deleted");
            Ok(ApiResponse::ok("Restaurant deleted"))
        }
        Ok(false) => Err(restaurant_not_found(&id)),
        Err(StoreError::Referenced(_)) => {
            Err(AppError::new(ErrorCode::RestaurantHasReservations).with_detail("id", id))
        }
        Err(e) => Err(ServiceError::from(e).into()),
    }
}

/// GET /api/restaurants/{id}/tables
pub async fn list_tables(
    State(state): State<ServerState>,
    AppPath(id): AppPath<String>,
) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    Ok(ApiResponse::success(state.tables().list(&id).await?))
}

/// POST /api/restaurants/{id}/tables - admin, or the restaurant's own admin
pub async fn create_table(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<DiningTableCreate>,
) -> AppResult<(StatusCode, ApiResponse<DiningTable>)> {
    let table = state.tables().create(&id, &payload, &current).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(table)))
}
