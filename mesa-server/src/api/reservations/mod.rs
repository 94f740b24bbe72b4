//! Reservation API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/reservations | POST | - (guest booking) |
//! | /api/reservations | GET | any, narrowed by role |
//! | /api/reservations/{id} | GET | any, scoped |
//! | /api/reservations/{id}/status | PATCH | role matrix |
//! | /api/reservations/{id}/deposit | POST | staff and above, scoped |

mod handler;

pub use handler::ReservationQuery;
pub(crate) use handler::collect;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/deposit", post(handler::record_deposit))
}
