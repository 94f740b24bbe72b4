//! Unified error codes for Mesa Feliz
//!
//! This module defines all error codes returned by the API.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant errors
//! - 4xxx: Reservation errors
//! - 5xxx: Deposit errors
//! - 6xxx: Offer and review errors
//! - 7xxx: Table errors
//! - 8xxx: Staff and user errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email is already registered
    EmailExists = 1005,
    /// Password too short
    PasswordTooShort = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Resource belongs to another restaurant
    RestaurantScopeMismatch = 2004,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant still has reservation history
    RestaurantHasReservations = 3002,
    /// Requested time is outside opening hours
    OutsideOpeningHours = 3003,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Status change not allowed by the reservation lifecycle
    InvalidStatusTransition = 4002,
    /// Guest count out of range
    InvalidGuestCount = 4003,
    /// Requested slot is in the past
    SlotInPast = 4004,
    /// Table already booked for an overlapping slot
    TableSlotTaken = 4005,
    /// Party is larger than the table capacity
    GuestsExceedCapacity = 4006,
    /// Unknown reservation status value
    InvalidReservationStatus = 4007,

    // ==================== 5xxx: Deposit ====================
    /// Deposit can only be recorded on pending or confirmed reservations
    DepositNotAllowed = 5001,
    /// Deposit amount must be positive
    InvalidDepositAmount = 5002,

    // ==================== 6xxx: Offer / Review ====================
    /// Offer not found
    OfferNotFound = 6001,
    /// Discount out of range
    InvalidDiscount = 6002,
    /// Review not found
    ReviewNotFound = 6101,
    /// Rating out of range
    InvalidRating = 6102,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Unknown table status value
    InvalidTableStatus = 7002,
    /// Table number already used in this restaurant
    TableNumberExists = 7003,
    /// Table is under maintenance
    TableUnderMaintenance = 7004,

    // ==================== 8xxx: Staff / User ====================
    /// User not found
    UserNotFound = 8001,
    /// Staff binding not found
    StaffNotFound = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::RestaurantScopeMismatch => "Resource belongs to another restaurant",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantHasReservations => "Restaurant has reservation history",
            ErrorCode::OutsideOpeningHours => "Requested time is outside opening hours",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::InvalidStatusTransition => "Reservation status change is not allowed",
            ErrorCode::InvalidGuestCount => "Guest count is out of range",
            ErrorCode::SlotInPast => "Requested slot is in the past",
            ErrorCode::TableSlotTaken => "Table is already booked for this time",
            ErrorCode::GuestsExceedCapacity => "Party is larger than the table capacity",
            ErrorCode::InvalidReservationStatus => {
                "Invalid status. Must be one of: pending, confirmed, cancelled, completed"
            }

            // Deposit
            ErrorCode::DepositNotAllowed => {
                "Deposit can only be recorded on pending or confirmed reservations"
            }
            ErrorCode::InvalidDepositAmount => "Deposit amount must be greater than zero",

            // Offer / Review
            ErrorCode::OfferNotFound => "Offer not found",
            ErrorCode::InvalidDiscount => "Discount must be between 0 and 100",
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::InvalidTableStatus => {
                "Invalid status. Must be one of: available, occupied, reserved, maintenance"
            }
            ErrorCode::TableNumberExists => "Table number already exists in this restaurant",
            ErrorCode::TableUnderMaintenance => "Table is under maintenance",

            // Staff / User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::StaffNotFound => "Staff member not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::EmailExists),
            1006 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::RestaurantScopeMismatch),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantHasReservations),
            3003 => Ok(ErrorCode::OutsideOpeningHours),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::InvalidStatusTransition),
            4003 => Ok(ErrorCode::InvalidGuestCount),
            4004 => Ok(ErrorCode::SlotInPast),
            4005 => Ok(ErrorCode::TableSlotTaken),
            4006 => Ok(ErrorCode::GuestsExceedCapacity),
            4007 => Ok(ErrorCode::InvalidReservationStatus),

            // Deposit
            5001 => Ok(ErrorCode::DepositNotAllowed),
            5002 => Ok(ErrorCode::InvalidDepositAmount),

            // Offer / Review
            6001 => Ok(ErrorCode::OfferNotFound),
            6002 => Ok(ErrorCode::InvalidDiscount),
            6101 => Ok(ErrorCode::ReviewNotFound),
            6102 => Ok(ErrorCode::InvalidRating),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::InvalidTableStatus),
            7003 => Ok(ErrorCode::TableNumberExists),
            7004 => Ok(ErrorCode::TableUnderMaintenance),

            // Staff / User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::StaffNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
