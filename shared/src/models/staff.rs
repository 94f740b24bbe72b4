//! Staff Model

use serde::{Deserialize, Serialize};

use super::user::Role;

/// Binding of a staff account to the restaurant it works for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub user_id: String,
    pub restaurant_id: String,
    pub position: Option<String>,
    pub created_at: i64,
}

/// Create staff account payload (admin only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub email: String,
    pub password: String,
    pub name: String,
    /// `staff` or `restaurant_admin`
    pub role: Role,
    pub restaurant_id: String,
    pub position: Option<String>,
}
