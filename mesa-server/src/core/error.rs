//! Server and service-layer error types
//!
//! `ServiceError` bridges storage errors and the API-layer `AppError` so
//! workflows can use `?` on both. `ServerError` covers startup failures.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StoreError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Startup / lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("startup failed: {0}")]
    Startup(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Service-layer error
///
/// - `Db`: storage/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            // Constraint names stay in the log
            StoreError::Conflict(constraint) => {
                tracing::debug!(%constraint, "Unique constraint violated");
                ServiceError::App(AppError::new(ErrorCode::AlreadyExists))
            }
            StoreError::Referenced(constraint) => {
                tracing::debug!(%constraint, "Foreign key constraint violated");
                ServiceError::App(AppError::conflict(
                    "Resource is still referenced by other records",
                ))
            }
            StoreError::Backend(err) => ServiceError::Db(err),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<shared::models::TransitionError> for ServiceError {
    fn from(e: shared::models::TransitionError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_are_hidden() {
        let err: ServiceError = StoreError::Backend("connection reset".into()).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
        assert_eq!(app.message, "Internal server error");
    }

    #[test]
    fn conflicts_pass_through() {
        let err: ServiceError = StoreError::Conflict("duplicate".into()).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn constraint_names_are_not_exposed() {
        for err in [
            StoreError::Conflict("users_email_key".into()),
            StoreError::Referenced("reservations_restaurant_id_fkey".into()),
        ] {
            let app: AppError = ServiceError::from(err).into();
            assert_eq!(app.code, ErrorCode::AlreadyExists);
            assert!(!app.message.contains("_key"));
            assert!(app.details.is_none());
        }
    }
}
