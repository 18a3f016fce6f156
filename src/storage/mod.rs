//! Storage collaborator for the catalog.
//!
//! Every catalog operation runs inside one [`UnitOfWork`]: reads, existence checks and the
//! final write share a transaction, and dropping the unit of work without calling
//! [`UnitOfWork::commit`] discards everything it did.

use crate::domain::model::{Category, Product, ResolvedProduct};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

#[async_trait]
pub trait ProductRepository: Send {
    /// All products, ordered by id.
    async fn find_all_products(&mut self) -> anyhow::Result<Vec<Product>>;

    async fn find_product_by_id(&mut self, id: i32) -> anyhow::Result<Option<Product>>;

    /// Inserts when `id` is `None` (storage assigns the identity), replaces otherwise.
    async fn save_product(
        &mut self,
        id: Option<i32>,
        product: &ResolvedProduct,
    ) -> anyhow::Result<Product>;

    async fn delete_product(&mut self, id: i32) -> anyhow::Result<()>;

    async fn exists_by_code(&mut self, code: &str) -> anyhow::Result<bool>;

    /// Like [`exists_by_code`](Self::exists_by_code), ignoring the product with `id`.
    async fn exists_by_code_excluding(&mut self, code: &str, id: i32) -> anyhow::Result<bool>;

    /// The product with the highest id, if any.
    async fn find_most_recently_inserted_product(&mut self) -> anyhow::Result<Option<Product>>;
}

#[async_trait]
pub trait CategoryRepository: Send {
    /// All categories, ordered by id.
    async fn find_all_categories(&mut self) -> anyhow::Result<Vec<Category>>;

    async fn find_category_by_id(&mut self, id: i32) -> anyhow::Result<Option<Category>>;

    /// Inserts when `id` is `None`, renames otherwise.
    async fn save_category(&mut self, id: Option<i32>, name: &str) -> anyhow::Result<Category>;

    /// Deletes the category and clears it from every product that referenced it.
    async fn delete_category(&mut self, id: i32) -> anyhow::Result<()>;
}

#[async_trait]
pub trait UnitOfWork: ProductRepository + CategoryRepository {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}

/// Entry point into a storage backend.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> anyhow::Result<()>;
}
