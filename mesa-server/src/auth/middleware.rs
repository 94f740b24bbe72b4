//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::models::Role;

use crate::AppError;
use crate::auth::{CurrentUser, JwtService, extractor::authenticate};
use crate::core::ServerState;
use crate::security_log;

/// Read-only prefixes open to anonymous visitors
const PUBLIC_READ_PREFIXES: &[&str] = &[
    "/api/restaurants",
    "/api/tables",
    "/api/offers",
    "/api/reviews",
];

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether a request may pass without a token
///
/// - `OPTIONS *` (CORS preflight) and non-`/api/` paths
/// - login / register
/// - `GET` on restaurants, tables, offers and reviews
/// - `POST /api/reservations` (guest booking)
/// - the chatbot state API
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }
    if path == "/api/auth/login" || path == "/api/auth/register" {
        return true;
    }
    if under(path, "/api/chatbot") {
        return true;
    }
    if method == Method::GET && PUBLIC_READ_PREFIXES.iter().any(|p| under(path, p)) {
        return true;
    }
    method == Method::POST && path == "/api/reservations"
}

/// Require a valid bearer token on every non-public route
///
/// On success the [`CurrentUser`] is inserted into the request extensions.
/// A token sent to a public route is still honored so handlers can tell
/// customers from anonymous visitors.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let public = is_public_route(req.method(), req.uri().path());

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => match JwtService::extract_from_header(header) {
            Some(token) => token,
            None if public => return Ok(next.run(req).await),
            None => return Err(AppError::invalid_token("Invalid authorization header")),
        },
        None if public => return Ok(next.run(req).await),
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::not_authenticated());
        }
    };

    match authenticate(state.jwt_service(), token, req.uri()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
        }
        Err(e) if !public => return Err(e),
        Err(_) => {}
    }
    Ok(next.run(req).await)
}

/// Require the `admin` role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    user.require_role(&[Role::Admin])?;
    Ok(next.run(req).await)
}

/// Require staff, restaurant admin or admin
///
/// Restaurant scope is checked by the handler once the target is loaded.
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.current_user()?;
    user.require_role(&[Role::Staff, Role::RestaurantAdmin, Role::Admin])?;
    Ok(next.run(req).await)
}

/// Read the [`CurrentUser`] placed by [`require_auth`]
pub trait CurrentUserExt {
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or_else(AppError::not_authenticated)
    }
}
