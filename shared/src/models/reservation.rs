//! Reservation Model
//!
//! A reservation moves through a small lifecycle:
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │
//!    └────────────┴──► cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Reservations are never deleted.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::serde_helpers::hhmm;
use crate::error::{AppError, ErrorCode};

/// Largest party accepted for a single reservation
pub const MAX_GUEST_COUNT: i32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "reservation_status", rename_all = "snake_case")
)]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Rejected lifecycle move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot change reservation status from {from} to {to}")]
pub struct TransitionError {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::with_message(ErrorCode::InvalidStatusTransition, err.to_string())
            .with_detail("from", err.from.as_str())
            .with_detail("to", err.to.as_str())
    }
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    /// Active reservations hold their table slot
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    /// Validate a move to `next`, returning the new status
    pub fn transition(self, next: ReservationStatus) -> Result<ReservationStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError { from: self, to: next })
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidReservationStatus,
                    format!(
                        "Invalid status '{}'. Must be one of: pending, confirmed, cancelled, completed",
                        s
                    ),
                )
            })
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: String,
    pub table_id: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub guest_count: i32,
    pub status: ReservationStatus,
    pub deposit_paid: bool,
    pub deposit_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reservation payload
///
/// Date and time stay as strings until the workflow validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub restaurant_id: String,
    pub table_id: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guest_count: i32,
    pub notes: Option<String>,
}

/// `PATCH /api/reservations/{id}/status` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: String,
}

/// `POST /api/reservations/{id}/deposit` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRecord {
    pub amount: Decimal,
}

/// Listing filters; every field narrows the result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationFilter {
    pub restaurant_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
    pub table_id: Option<String>,
    pub email: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, r: &Reservation) -> bool {
        self.restaurant_id.as_ref().is_none_or(|id| *id == r.restaurant_id)
            && self.from.is_none_or(|from| r.date >= from)
            && self.to.is_none_or(|to| r.date <= to)
            && self.status.is_none_or(|s| s == r.status)
            && self
                .table_id
                .as_ref()
                .is_none_or(|t| r.table_id.as_ref() == Some(t))
            && self
                .email
                .as_ref()
                .is_none_or(|e| r.email.eq_ignore_ascii_case(e))
    }
}
