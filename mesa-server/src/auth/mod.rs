//! Authentication and authorization
//!
//! - [`JwtService`] issues and validates tokens
//! - [`CurrentUser`] is the authenticated identity (also an axum extractor)
//! - [`require_auth`] guards every non-public `/api` route
//! - [`require_admin`] / [`require_staff`] are per-router role guards

pub mod accounts;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, is_public_route, require_admin, require_auth, require_staff};
pub use password::{hash_password, verify_password};
