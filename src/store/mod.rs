pub mod deadline;
pub mod memory;
pub mod record;
pub mod redis_backend;
pub mod sqlite;
pub mod traits;

pub use deadline::DeadlineStore;
pub use memory::MemorySessionStore;
pub use record::SessionRecord;
pub use redis_backend::RedisSessionStore;
pub use sqlite::SqliteSessionStore;
pub use traits::{SessionField, SessionStore, StoreError, TOKEN_SEPARATOR};

use crate::config::{StoreBackend, StoreConfig};
use anyhow::Context;
use std::sync::Arc;

/// Factory: create the configured backend, bounded by the per-call deadline.
pub async fn create_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    let backend: Arc<dyn SessionStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemorySessionStore::new()),
        StoreBackend::Sqlite => Arc::new(
            SqliteSessionStore::open(&config.sqlite_path).with_context(|| {
                format!(
                    "failed to open session database {}",
                    config.sqlite_path.display()
                )
            })?,
        ),
        StoreBackend::Redis => Arc::new(
            RedisSessionStore::connect(&config.redis_url, &config.key_prefix)
                .await
                .with_context(|| format!("failed to connect to redis at {}", config.redis_url))?,
        ),
    };

    tracing::info!(
        "Session store: {} (call deadline {:?})",
        backend.name(),
        config.call_timeout()
    );
    Ok(Arc::new(DeadlineStore::new(backend, config.call_timeout())))
}
