//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Map this error code to the HTTP status returned to clients
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            // 401
            ErrorCode::NotAuthenticated
            | ErrorCode::InvalidCredentials
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403
            ErrorCode::PermissionDenied
            | ErrorCode::RoleRequired
            | ErrorCode::AdminRequired
            | ErrorCode::RestaurantScopeMismatch => StatusCode::FORBIDDEN,

            // 404
            ErrorCode::NotFound
            | ErrorCode::RestaurantNotFound
            | ErrorCode::ReservationNotFound
            | ErrorCode::OfferNotFound
            | ErrorCode::ReviewNotFound
            | ErrorCode::TableNotFound
            | ErrorCode::UserNotFound
            | ErrorCode::StaffNotFound => StatusCode::NOT_FOUND,

            // 409
            ErrorCode::AlreadyExists
            | ErrorCode::EmailExists
            | ErrorCode::TableNumberExists
            | ErrorCode::TableSlotTaken
            | ErrorCode::RestaurantHasReservations => StatusCode::CONFLICT,

            // 500
            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // Everything else is a client-side rule violation
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidTableStatus.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::DepositNotAllowed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::RestaurantScopeMismatch.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::TableNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TableSlotTaken.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
