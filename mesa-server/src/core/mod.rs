//! Server core: configuration, state, errors, background tasks, lifecycle
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - state shared by handlers
//! - [`Server`] - HTTP server lifecycle
//! - [`BackgroundTasks`] - periodic jobs with coordinated shutdown
//! - [`ServerError`] / [`ServiceError`] - startup and service-layer errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError, ServiceError, ServiceResult};
pub use server::Server;
pub use state::ServerState;
pub use tasks::BackgroundTasks;
