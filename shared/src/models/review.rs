//! Review Model

use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Customer review, immutable once written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: String,
    pub restaurant_id: String,
    pub rating: i32,
    pub comment: String,
    pub customer_name: String,
    pub user_id: Option<String>,
    pub created_at: i64,
}

/// Create review payload
///
/// `customer_name` falls back to the author's account name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub restaurant_id: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    pub customer_name: Option<String>,
}
