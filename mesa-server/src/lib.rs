//! Mesa Feliz API server
//!
//! REST backend for the Mesa Feliz reservation platform.
//!
//! # Module layout
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # config, state, background tasks, server loop, errors
//! ├── auth/          # JWT, password hashing, CurrentUser, auth middleware
//! ├── db/            # Store trait, Postgres and in-memory backends
//! ├── reservations/  # reservation workflow and role matrix
//! ├── tables/        # table status machine and table CRUD rules
//! ├── chat/          # conversation state store + sweep task
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging
//! └── utils/         # validation, time, logger
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod core;
pub mod db;
pub mod middleware;
pub mod reservations;
pub mod tables;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Security events (auth failures, permission denials) go to the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialize logging from `LOG_LEVEL`, `LOG_JSON`, `LOG_DIR`
pub fn setup_environment() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());

    init_logger_with_file(&level, json, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___                    ______     ___
   /  |/  /__  _________ _    / ____/__  / (_)___
  / /|_/ / _ \/ ___/ __ `/   / /_  / _ \/ / /_  /
 / /  / /  __(__  ) /_/ /   / __/ /  __/ / / / /_
/_/  /_/\___/____/\__,_/   /_/    \___/_/_/ /___/
    "#
    );
}
