pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{build_store, CatalogService};
pub use domain::model::{Category, CategoryInput, Product, ProductInput};
pub use domain::CatalogError;
pub use infra::config::AppConfig;
pub use storage::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
