//! Health check routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | - |
//! | /health/detailed | GET | - |

use std::time::Instant;

use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use shared::error::ApiResponse;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// Liveness check
async fn health() -> ApiResponse<()> {
    ApiResponse::ok("Mesa Feliz API is running")
}

#[derive(Serialize)]
pub struct DetailedHealth {
    status: &'static str,
    version: &'static str,
    environment: String,
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
    chat_sessions: usize,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn detailed_health(State(state): State<ServerState>) -> ApiResponse<DetailedHealth> {
    let started = Instant::now();
    let database = match state.store().ping().await {
        Ok(()) => CheckResult {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            CheckResult {
                status: "error",
                latency_ms: None,
                message: Some("database unreachable".into()),
            }
        }
    };

    let status = if database.status == "ok" { "ok" } else { "degraded" };
    ApiResponse::success(DetailedHealth {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        uptime_seconds: state.uptime_secs(),
        checks: HealthChecks {
            database,
            chat_sessions: state.chat.len(),
        },
    })
}
