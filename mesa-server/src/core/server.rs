//! HTTP server lifecycle

use std::path::PathBuf;
use std::time::Duration;

use shared::error::AppError;

use crate::api;
use crate::auth::accounts;
use crate::core::{BackgroundTasks, Config, Result, ServerError, ServerState};
use crate::utils::logger::cleanup_old_logs;

const LOG_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Run with an already built state (tests, embedding)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C, then drain requests and stop background tasks
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(self.config.clone()).await?,
        };

        if let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password)
        {
            accounts::ensure_admin(state.store(), email, password)
                .await
                .map_err(|e| {
                    let e = AppError::from(e);
                    ServerError::Startup(format!("admin bootstrap failed: {}", e.message))
                })?;
        }

        let tasks = self.start_background_tasks(&state);

        let app = api::build_app(state.clone());
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Mesa Feliz API listening on http://{}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        tasks.shutdown().await;
        served?;
        Ok(())
    }

    fn start_background_tasks(&self, state: &ServerState) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let chat = state.chat.clone();
        tasks.spawn_periodic(
            "chat_state_sweep",
            self.config.chat_sweep_interval,
            move || {
                let removed = chat.sweep();
                tracing::debug!(removed, "Chat state sweep finished");
            },
        );

        if let Some(dir) = &self.config.log_dir {
            let dir = PathBuf::from(dir);
            tasks.spawn_periodic("log_cleanup", LOG_CLEANUP_INTERVAL, move || {
                if let Err(e) = cleanup_old_logs(&dir) {
                    tracing::error!(error = %e, "Failed to clean up old logs");
                }
            });
        }

        tasks.log_summary();
        tasks
    }
}
