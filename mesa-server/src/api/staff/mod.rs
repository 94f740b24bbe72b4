//! Staff API
//!
//! Dashboard views for staff, restaurant admins and admins, plus staff
//! account creation (admin only).

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<ServerState> {
    let dashboard_routes = Router::new()
        .route("/reservations", get(handler::reservations))
        .route("/tables", get(handler::tables))
        .layer(middleware::from_fn(require_staff));

    let account_routes = Router::new()
        .route("/", post(handler::create_staff))
        .layer(middleware::from_fn(require_admin));

    dashboard_routes.merge(account_routes)
}
