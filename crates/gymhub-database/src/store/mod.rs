//! Document store implementations.

pub mod matcher;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use tracing::info;

use gymhub_core::config::{DatabaseConfig, StoreBackend};
use gymhub_core::result::AppResult;
use gymhub_core::traits::DocumentStore;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Build the configured document store.
pub async fn build_store(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreBackend::Postgres => {
            let db = DatabasePool::connect(config).await?;
            if config.auto_migrate {
                run_migrations(&db).await?;
            }
            Ok(Arc::new(PgDocumentStore::new(db)))
        }
    }
}
