use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATABASE_URL | - | Postgres URL; in-memory store when unset (development only) |
/// | HTTP_PORT | 3001 | HTTP port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | generated (dev) | HMAC secret, at least 32 chars outside development |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | mesa-feliz / mesa-feliz-clients | Token claims |
/// | CHAT_TTL_SECS | 3600 | Idle time before a conversation is swept |
/// | CHAT_SWEEP_INTERVAL_SECS | 3600 | Sweep period |
/// | RESERVATION_SLOT_MINUTES | 120 | Table occupancy window for overlap checks |
/// | CORS_ALLOW_ORIGIN | - | Allowed origin; permissive when unset |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | - | Bootstrap admin account created at startup |
///
/// Logging variables (`LOG_LEVEL`, `LOG_JSON`, `LOG_DIR`) are read by
/// [`crate::setup_environment`] before the config is loaded; `LOG_DIR` is
/// kept here as well for the log cleanup task.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub chat_ttl: Duration,
    pub chat_sweep_interval: Duration,
    pub reservation_slot_minutes: i64,
    pub cors_allow_origin: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub log_dir: Option<String>,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        let database_url = env_non_empty("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(ServerError::Config(format!(
                "DATABASE_URL must be set in {environment} environment"
            )));
        }

        let config = Self {
            database_url,
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            jwt: JwtConfig::from_env(&environment)?,
            environment,
            chat_ttl: env_parse("CHAT_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.chat_ttl),
            chat_sweep_interval: env_parse("CHAT_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.chat_sweep_interval),
            reservation_slot_minutes: env_parse("RESERVATION_SLOT_MINUTES")
                .unwrap_or(defaults.reservation_slot_minutes),
            cors_allow_origin: env_non_empty("CORS_ALLOW_ORIGIN"),
            admin_email: env_non_empty("ADMIN_EMAIL"),
            admin_password: env_non_empty("ADMIN_PASSWORD"),
            log_dir: env_non_empty("LOG_DIR"),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.chat_sweep_interval.is_zero() {
            return Err(ServerError::Config(
                "CHAT_SWEEP_INTERVAL_SECS must be greater than zero".into(),
            ));
        }
        if self.reservation_slot_minutes < 0 {
            return Err(ServerError::Config(
                "RESERVATION_SLOT_MINUTES must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Development defaults, without reading the environment
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            http_port: 3001,
            environment: "development".into(),
            jwt: JwtConfig::default(),
            chat_ttl: Duration::from_secs(3600),
            chat_sweep_interval: Duration::from_secs(3600),
            reservation_slot_minutes: 120,
            cors_allow_origin: None,
            admin_email: None,
            admin_password: None,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.http_port, 3001);
        assert!(config.is_development());
        assert_eq!(config.chat_ttl, Duration::from_secs(3600));
        assert_eq!(config.reservation_slot_minutes, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let config = Config {
            chat_sweep_interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
