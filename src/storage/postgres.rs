//! Catalog store backed by PostgreSQL.

use crate::domain::model::{Category, Product, ResolvedProduct};
use crate::infra::config::AppConfig;
use crate::storage::{CatalogStore, CategoryRepository, ProductRepository, UnitOfWork};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::info;

const PRODUCT_COLUMNS: &str = "SELECT p.id, p.code, p.name, p.price, \
     c.id AS category_id, c.name AS category_name \
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// A catalog store that uses a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using `DATABASE_URL` and makes sure the catalog tables exist.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(config.database_url()?)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the catalog tables if they are missing.
    ///
    /// Code uniqueness is enforced by the write path, so `products.code` carries a plain
    /// index, not a unique constraint.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id SERIAL PRIMARY KEY,
                name VARCHAR(200) NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                code VARCHAR(100) NOT NULL,
                name VARCHAR(200) NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS products_code_idx ON products (code)")
            .execute(&self.pool)
            .await?;

        info!("catalog schema ready");
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// One SQL transaction. Dropping it without `commit` rolls back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

fn product_from_row(row: &PgRow) -> Result<Product> {
    let category_id: Option<i32> = row.try_get("category_id")?;
    let category_name: Option<String> = row.try_get("category_name")?;
    let category = match (category_id, category_name) {
        (Some(id), Some(name)) => Some(Category { id, name }),
        _ => None,
    };
    Ok(Product {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        category,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl ProductRepository for PgUnitOfWork {
    async fn find_all_products(&mut self) -> Result<Vec<Product>> {
        let sql = format!("{} ORDER BY p.id", PRODUCT_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&mut *self.tx).await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn find_product_by_id(&mut self, id: i32) -> Result<Option<Product>> {
        let sql = format!("{} WHERE p.id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn save_product(&mut self, id: Option<i32>, product: &ResolvedProduct) -> Result<Product> {
        let id: i32 = match id {
            None => {
                sqlx::query_scalar(
                    "INSERT INTO products (code, name, price, category_id)
                     VALUES ($1, $2, $3, $4) RETURNING id",
                )
                .bind(&product.code)
                .bind(&product.name)
                .bind(product.price)
                .bind(product.category_id())
                .fetch_one(&mut *self.tx)
                .await?
            }
            Some(id) => sqlx::query_scalar(
                "UPDATE products SET code = $1, name = $2, price = $3, category_id = $4
                 WHERE id = $5 RETURNING id",
            )
            .bind(&product.code)
            .bind(&product.name)
            .bind(product.price)
            .bind(product.category_id())
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| anyhow::anyhow!("product {} does not exist", id))?,
        };
        Ok(product.clone().into_product(id))
    }

    async fn delete_product(&mut self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn exists_by_code(&mut self, code: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE code = $1)")
            .bind(code)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists)
    }

    async fn exists_by_code_excluding(&mut self, code: &str, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM products WHERE code = $1 AND id <> $2)",
        )
        .bind(code)
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn find_most_recently_inserted_product(&mut self) -> Result<Option<Product>> {
        let sql = format!("{} ORDER BY p.id DESC LIMIT 1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql).fetch_optional(&mut *self.tx).await?;
        row.as_ref().map(product_from_row).transpose()
    }
}

#[async_trait]
impl CategoryRepository for PgUnitOfWork {
    async fn find_all_categories(&mut self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        rows.iter().map(category_from_row).collect()
    }

    async fn find_category_by_id(&mut self, id: i32) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn save_category(&mut self, id: Option<i32>, name: &str) -> Result<Category> {
        let row = match id {
            None => {
                sqlx::query("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
                    .bind(name)
                    .fetch_one(&mut *self.tx)
                    .await?
            }
            Some(id) => sqlx::query("UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name")
                .bind(name)
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?
                .ok_or_else(|| anyhow::anyhow!("category {} does not exist", id))?,
        };
        category_from_row(&row)
    }

    async fn delete_category(&mut self, id: i32) -> Result<()> {
        // The foreign key nulls `products.category_id`.
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}
