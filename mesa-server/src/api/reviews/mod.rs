//! Review API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reviews", post(handler::create))
        .route("/api/reviews/restaurant/{id}", get(handler::list_for_restaurant))
}
