//! Logging setup
//!
//! Console output always; with a log directory also two daily-rotated
//! files:
//! - `app/app.YYYY-MM-DD`: everything except security events (pruned after 14 days)
//! - `security/security.YYYY-MM-DD`: `security` target only (kept)

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Application logs older than this are deleted by [`cleanup_old_logs`]
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn file_layer(dir: &Path, prefix: &str, json: bool, security: bool) -> BoxedLayer {
    let writer = std::sync::Mutex::new(RollingFileAppender::new(Rotation::DAILY, dir, prefix));
    let only = filter_fn(move |meta| (meta.target() == "security") == security);

    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_writer(writer)
            .with_filter(only)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(only)
            .boxed()
    }
}

/// Initialize tracing
///
/// `RUST_LOG` overrides `level` when set.
///
/// ```no_run
/// // Development: pretty console only
/// mesa_server::init_logger_with_file("debug", false, None)?;
///
/// // Production: JSON console + rolling files
/// mesa_server::init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    });

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_dir = log_dir.join("app");
        let security_dir = log_dir.join("security");
        fs::create_dir_all(&app_dir)?;
        fs::create_dir_all(&security_dir)?;

        layers.push(file_layer(&app_dir, "app", json_format, false));
        layers.push(file_layer(&security_dir, "security", json_format, true));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Delete `app/app.YYYY-MM-DD` files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path) -> std::io::Result<usize> {
    let app_dir = log_dir.join("app");
    if !app_dir.exists() {
        return Ok(0);
    }

    let cutoff = Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    for entry in fs::read_dir(app_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_app_logs() {
        let root = std::env::temp_dir().join(format!("mesa-logs-{}", uuid::Uuid::new_v4()));
        let app = root.join("app");
        fs::create_dir_all(&app).unwrap();

        let old = Local::now().date_naive() - chrono::Duration::days(30);
        let today = Local::now().date_naive();
        fs::write(app.join(format!("app.{}", old.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app.join(format!("app.{}", today.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app.join("notes.txt"), "x").unwrap();

        assert_eq!(cleanup_old_logs(&root).unwrap(), 1);
        assert_eq!(fs::read_dir(&app).unwrap().count(), 2);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_directory_is_not_an_error() {
        let root = std::env::temp_dir().join("mesa-logs-does-not-exist");
        assert_eq!(cleanup_old_logs(&root).unwrap(), 0);
    }
}
