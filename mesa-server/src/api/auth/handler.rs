//! Authentication handlers

use axum::extract::State;
use http::StatusCode;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, User};

use crate::api::extract::AppJson;
use crate::auth::{CurrentUser, accounts};
use crate::core::{ServerState, ServiceError};
use crate::security_log;

fn issue(state: &ServerState, user: User) -> AppResult<AuthResponse> {
    let token = state.jwt_service().generate_token(&user)?;
    Ok(AuthResponse { token, user })
}

/// POST /api/auth/register - customer sign-up
pub async fn register(
    State(state): State<ServerState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, ApiResponse<AuthResponse>)> {
    let user = accounts::register(state.store(), &req).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(issue(&state, user)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = accounts::login(state.store(), &req.email, &req.password).await?;
    Ok(ApiResponse::success(issue(&state, user)?))
}

/// GET /api/auth/me - current account, fresh from the store
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<ApiResponse<User>> {
    let record = state
        .store()
        .get_user(&current.id)
        .await
        .map_err(ServiceError::from)?;
    let Some(record) = record else {
        security_log!("WARN", "token_for_missing_user", user_id = current.id.as_str());
        return Err(AppError::invalid_token("Account no longer exists"));
    };
    Ok(ApiResponse::success(accounts::load_user(state.store(), record).await?))
}
