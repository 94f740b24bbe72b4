//! JWT token service
//!
//! Issues and validates HS256 access tokens and resolves them into a
//! [`CurrentUser`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};
use thiserror::Error;

use crate::core::ServerError;
use crate::security_log;

const MIN_SECRET_LEN: usize = 32;

/// JWT settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret (at least 32 bytes outside development)
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// Read `JWT_*` variables.
    ///
    /// Outside development the secret must be set and at least 32 chars;
    /// in development a random one is generated when missing.
    pub fn from_env(environment: &str) -> Result<Self, ServerError> {
        let secret = match std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()) {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Some(_) if environment != "development" => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Some(secret) => {
                tracing::warn!("JWT_SECRET is shorter than {MIN_SECRET_LEN} characters");
                secret
            }
            None if environment != "development" => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be set in {environment} environment"
                )));
            }
            None => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                generate_printable_secret()
            }
        };

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mesa-feliz".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "mesa-feliz-clients".to_string()),
        })
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: generate_printable_secret(),
            expiration_minutes: 1440,
            issuer: "mesa-feliz".to_string(),
            audience: "mesa-feliz-clients".to_string(),
        }
    }
}

/// Random 64-char secret for development runs
pub fn generate_printable_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect()
}

/// Claims carried in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Restaurant the staff account is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::GenerationFailed(msg) => AppError::internal(msg),
            _ => AppError::invalid_token("Invalid token"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token for `user`
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            restaurant_id: user.restaurant_id.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Authenticated identity, resolved from the JWT claims
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> AppResult<Json<()>> {
///     user.require_role(&[Role::Staff, Role::RestaurantAdmin, Role::Admin])?;
///     user.require_restaurant_scope(&restaurant_id)?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims.role.parse::<Role>()?;
        Ok(Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role,
            restaurant_id: claims.restaurant_id,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Staff, restaurant admin or admin
    pub fn is_staff_or_above(&self) -> bool {
        self.role != Role::Customer
    }

    /// Whether this identity may act on data of `restaurant_id`
    pub fn in_restaurant(&self, restaurant_id: &str) -> bool {
        self.is_admin() || self.restaurant_id.as_deref() == Some(restaurant_id)
    }

    /// Fail with 403 unless the role is one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        security_log!(
            "WARN",
            "role_required",
            user_id = self.id.as_str(),
            user_role = self.role.as_str()
        );
        let code = if roles == [Role::Admin] {
            ErrorCode::AdminRequired
        } else {
            ErrorCode::RoleRequired
        };
        Err(AppError::new(code))
    }

    /// Fail with 403 unless admin or bound to `restaurant_id`
    pub fn require_restaurant_scope(&self, restaurant_id: &str) -> Result<(), AppError> {
        if self.in_restaurant(restaurant_id) {
            return Ok(());
        }
        security_log!(
            "WARN",
            "restaurant_scope_mismatch",
            user_id = self.id.as_str(),
            restaurant_id = restaurant_id
        );
        Err(AppError::new(ErrorCode::RestaurantScopeMismatch))
    }

    /// Admin, or restaurant admin of `restaurant_id`
    pub fn require_restaurant_admin(&self, restaurant_id: &str) -> Result<(), AppError> {
        self.require_role(&[Role::Admin, Role::RestaurantAdmin])?;
        self.require_restaurant_scope(restaurant_id)
    }

    /// Admin, or staff / restaurant admin of `restaurant_id`
    pub fn require_restaurant_staff(&self, restaurant_id: &str) -> Result<(), AppError> {
        self.require_role(&[Role::Admin, Role::RestaurantAdmin, Role::Staff])?;
        self.require_restaurant_scope(restaurant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::default())
    }

    fn user(role: Role, restaurant_id: Option<&str>) -> User {
        User {
            id: "user-1".into(),
            email: "ana@example.com".into(),
            name: "Ana".into(),
            role,
            restaurant_id: restaurant_id.map(Into::into),
            created_at: 0,
        }
    }

    fn current(role: Role, restaurant_id: Option<&str>) -> CurrentUser {
        CurrentUser {
            id: "user-1".into(),
            email: "ana@example.com".into(),
            name: "Ana".into(),
            role,
            restaurant_id: restaurant_id.map(Into::into),
        }
    }

    #[test]
    fn token_round_trip() {
        let service = service();
        let token = service
            .generate_token(&user(Role::Staff, Some("r1")))
            .unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.restaurant_id.as_deref(), Some("r1"));

        let current = CurrentUser::try_from(claims).unwrap();
        assert_eq!(current.role, Role::Staff);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = service().generate_token(&user(Role::Admin, None)).unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = JwtService::with_config(JwtConfig {
            expiration_minutes: -10,
            ..JwtConfig::default()
        });
        let token = service.generate_token(&user(Role::Customer, None)).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn extract_bearer() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }

    #[test]
    fn role_and_scope_checks() {
        let staff = current(Role::Staff, Some("r1"));
        assert!(staff.require_restaurant_staff("r1").is_ok());
        assert_eq!(
            staff.require_restaurant_staff("r2").unwrap_err().code,
            ErrorCode::RestaurantScopeMismatch
        );
        assert_eq!(
            staff.require_restaurant_admin("r1").unwrap_err().code,
            ErrorCode::RoleRequired
        );

        let admin = current(Role::Admin, None);
        assert!(admin.require_restaurant_admin("anything").is_ok());

        let customer = current(Role::Customer, None);
        assert_eq!(
            customer.require_role(&[Role::Admin]).unwrap_err().code,
            ErrorCode::AdminRequired
        );
    }
}
