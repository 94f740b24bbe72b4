//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Occupancy state of a table
///
/// Any state may move to any other; staff set it directly from the floor plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "table_status", rename_all = "snake_case"))]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl TableStatus {
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                AppError::with_message(
                    ErrorCode::InvalidTableStatus,
                    format!("Invalid status '{}'. Must be one of: {}", s, valid.join(", ")),
                )
                .with_detail("status", s)
            })
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: String,
    pub restaurant_id: String,
    /// Table number shown on the floor, unique within the restaurant
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    pub position_x: f64,
    pub position_y: f64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: i32,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// Update dining table payload
///
/// The table number cannot be changed once assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiningTableUpdate {
    pub capacity: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// `PATCH /api/tables/{id}/status` body
///
/// Kept as a raw string so unknown values produce the descriptive error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_member() {
        for status in TableStatus::ALL {
            assert_eq!(status.as_str().parse::<TableStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_with_full_list() {
        let err = "invalid".parse::<TableStatus>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTableStatus);
        assert_eq!(
            err.message,
            "Invalid status 'invalid'. Must be one of: available, occupied, reserved, maintenance"
        );
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!("Occupied".parse::<TableStatus>().is_err());
    }

    #[test]
    fn update_payload_rejects_number() {
        let res = serde_json::from_str::<DiningTableUpdate>(r#"{"number": 7}"#);
        assert!(res.is_err());
    }
}
