//! User Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Permission class of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "user_role", rename_all = "snake_case"))]
pub enum Role {
    Customer,
    Staff,
    RestaurantAdmin,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::RestaurantAdmin => "restaurant_admin",
            Role::Admin => "admin",
        }
    }

    /// Roles bound to a single restaurant through a staff record
    pub fn is_restaurant_bound(&self) -> bool {
        matches!(self, Role::Staff | Role::RestaurantAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "staff" => Ok(Role::Staff),
            "restaurant_admin" => Ok(Role::RestaurantAdmin),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                format!("Unknown role '{}'", other),
            )),
        }
    }
}

/// Account as exposed through the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Restaurant the account works for (staff roles only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    pub created_at: i64,
}

/// `POST /api/auth/register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// `POST /api/auth/login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful register/login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for role in [Role::Customer, Role::Staff, Role::RestaurantAdmin, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn only_staff_roles_are_bound() {
        assert!(Role::Staff.is_restaurant_bound());
        assert!(Role::RestaurantAdmin.is_restaurant_bound());
        assert!(!Role::Admin.is_restaurant_bound());
        assert!(!Role::Customer.is_restaurant_bound());
    }
}
