//! Booking assistant conversation state
//!
//! `GET`, `POST` and `DELETE` on `/api/chatbot/state/{chat_id}`. Public, the
//! chat id is the only key.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/chatbot/state/{chat_id}",
        get(handler::get_state)
            .post(handler::set_state)
            .delete(handler::clear_state),
    )
}
