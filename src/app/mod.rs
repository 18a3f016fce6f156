pub mod catalog_service;

use crate::infra::config::{AppConfig, StorageBackend};
use crate::storage::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use std::sync::Arc;
use tracing::info;

pub use catalog_service::CatalogService;

/// Opens the store selected by `STORAGE`.
pub async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            info!(max_connections = config.db_max_connections, "connecting to PostgreSQL");
            Ok(Arc::new(PgCatalogStore::connect(config).await?))
        }
        StorageBackend::Memory => {
            info!("using in-memory catalog store");
            Ok(Arc::new(MemoryCatalogStore::new()))
        }
    }
}
