//! Data models
//!
//! Shared between mesa-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! status enums map to Postgres enum types under the same feature.
//! All IDs are UUID strings, timestamps are Unix millis.

pub mod chat;
pub mod dining_table;
pub mod offer;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod serde_helpers;
pub mod staff;
pub mod user;

// Re-exports
pub use chat::*;
pub use dining_table::*;
pub use offer::*;
pub use reservation::*;
pub use restaurant::*;
pub use review::*;
pub use staff::*;
pub use user::*;
