use std::sync::Arc;
use std::time::Instant;

use crate::auth::JwtService;
use crate::chat::ChatStore;
use crate::core::{Config, Result};
use crate::db::{MemoryStore, PgStore, Store};
use crate::reservations::ReservationWorkflow;
use crate::tables::TableService;

/// Application state shared by every handler
///
/// Cheap to clone: every field is reference counted.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Immutable server configuration |
/// | store | Persistence backend (Postgres or in-memory) |
/// | jwt_service | Token issue / validation |
/// | chat | Booking assistant conversation states |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub jwt_service: Arc<JwtService>,
    pub chat: ChatStore,
    started_at: Instant,
}

impl ServerState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let chat = ChatStore::new(config.chat_ttl);
        Self {
            config: Arc::new(config),
            store,
            jwt_service,
            chat,
            started_at: Instant::now(),
        }
    }

    /// State backed by a fresh [`MemoryStore`]
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Connect the configured backend
    ///
    /// Postgres when `DATABASE_URL` is set (migrations applied), otherwise
    /// the in-memory store, which `Config::from_env` only allows in
    /// development.
    pub async fn initialize(config: Config) -> Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url).await?),
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn reservations(&self) -> ReservationWorkflow<'_> {
        ReservationWorkflow::new(self.store(), self.config.reservation_slot_minutes)
    }

    pub fn tables(&self) -> TableService<'_> {
        TableService::new(self.store())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
