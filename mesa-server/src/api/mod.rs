//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness and detailed health
//! - [`auth`] - register, login, current account
//! - [`restaurants`] - restaurant CRUD and per-restaurant tables
//! - [`tables`] - single table CRUD and status
//! - [`reservations`] - booking, listing, lifecycle, deposits
//! - [`offers`] - promotions
//! - [`reviews`] - ratings and comments
//! - [`staff`] - staff dashboard views and staff accounts
//! - [`chatbot`] - booking assistant conversation state
//!
//! Every response body uses the [`shared::error::ApiResponse`] envelope.

pub mod extract;

pub mod auth;
pub mod chatbot;
pub mod health;
pub mod offers;
pub mod reservations;
pub mod restaurants;
pub mod reviews;
pub mod staff;
pub mod tables;

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Request};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::logging_middleware;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fresh UUID per request unless the client sent one
#[derive(Clone, Default)]
pub struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, without state or middleware
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(restaurants::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(offers::router())
        .merge(reviews::router())
        .merge(staff::router())
        .merge(chatbot::router())
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    match allow_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(Err(_)) => {
            tracing::warn!("CORS_ALLOW_ORIGIN is not a valid header value, allowing any origin");
            CorsLayer::permissive()
        }
        None => CorsLayer::permissive(),
    }
}

/// Router with state and the full middleware stack
///
/// Outermost first: request id, trace, CORS, compression, authentication,
/// request logging. Logging sits inside authentication so it sees the user.
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    build_router()
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
