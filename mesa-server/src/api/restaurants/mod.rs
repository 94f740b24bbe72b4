//! Restaurant API
//!
//! Anonymous reads; creation and deletion are admin-only, updates are open
//! to the restaurant's own admin. The floor plan of a restaurant is nested
//! under `/api/restaurants/{id}/tables`.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/tables", get(handler::list_tables));

    let scoped_routes = Router::new()
        .route("/{id}", put(handler::update))
        .route("/{id}/tables", post(handler::create_table));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(scoped_routes).merge(admin_routes)
}
