//! In-process catalog store.
//!
//! A unit of work holds the store lock for its whole lifetime and edits a private copy of
//! the state; `commit` publishes the copy, dropping it throws the copy away. Units of work
//! are therefore fully serialized.

use crate::domain::model::{Category, Product, ResolvedProduct};
use crate::storage::{CatalogStore, CategoryRepository, ProductRepository, UnitOfWork};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone)]
struct StoredProduct {
    code: String,
    name: String,
    price: f64,
    category_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: BTreeMap<i32, StoredProduct>,
    categories: BTreeMap<i32, String>,
    last_product_id: i32,
    last_category_id: i32,
}

impl MemoryState {
    fn category(&self, id: i32) -> Option<Category> {
        self.categories.get(&id).map(|name| Category {
            id,
            name: name.clone(),
        })
    }

    fn hydrate(&self, id: i32, stored: &StoredProduct) -> Product {
        Product {
            id,
            code: stored.code.clone(),
            name: stored.name.clone(),
            price: stored.price,
            category: stored.category_id.and_then(|c| self.category(c)),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl ProductRepository for MemoryUnitOfWork {
    async fn find_all_products(&mut self) -> anyhow::Result<Vec<Product>> {
        let state = &self.working;
        Ok(state
            .products
            .iter()
            .map(|(id, p)| state.hydrate(*id, p))
            .collect())
    }

    async fn find_product_by_id(&mut self, id: i32) -> anyhow::Result<Option<Product>> {
        let state = &self.working;
        Ok(state.products.get(&id).map(|p| state.hydrate(id, p)))
    }

    async fn save_product(
        &mut self,
        id: Option<i32>,
        product: &ResolvedProduct,
    ) -> anyhow::Result<Product> {
        let state = &mut self.working;
        let id = match id {
            Some(id) if state.products.contains_key(&id) => id,
            Some(id) => return Err(anyhow::anyhow!("product {} does not exist", id)),
            None => {
                state.last_product_id += 1;
                state.last_product_id
            }
        };
        state.products.insert(
            id,
            StoredProduct {
                code: product.code.clone(),
                name: product.name.clone(),
                price: product.price,
                category_id: product.category_id(),
            },
        );
        Ok(product.clone().into_product(id))
    }

    async fn delete_product(&mut self, id: i32) -> anyhow::Result<()> {
        self.working.products.remove(&id);
        Ok(())
    }

    async fn exists_by_code(&mut self, code: &str) -> anyhow::Result<bool> {
        Ok(self.working.products.values().any(|p| p.code == code))
    }

    async fn exists_by_code_excluding(&mut self, code: &str, id: i32) -> anyhow::Result<bool> {
        Ok(self
            .working
            .products
            .iter()
            .any(|(pid, p)| *pid != id && p.code == code))
    }

    async fn find_most_recently_inserted_product(&mut self) -> anyhow::Result<Option<Product>> {
        let state = &self.working;
        Ok(state
            .products
            .iter()
            .next_back()
            .map(|(id, p)| state.hydrate(*id, p)))
    }
}

#[async_trait]
impl CategoryRepository for MemoryUnitOfWork {
    async fn find_all_categories(&mut self) -> anyhow::Result<Vec<Category>> {
        Ok(self
            .working
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn find_category_by_id(&mut self, id: i32) -> anyhow::Result<Option<Category>> {
        Ok(self.working.category(id))
    }

    async fn save_category(&mut self, id: Option<i32>, name: &str) -> anyhow::Result<Category> {
        let state = &mut self.working;
        let id = match id {
            Some(id) if state.categories.contains_key(&id) => id,
            Some(id) => return Err(anyhow::anyhow!("category {} does not exist", id)),
            None => {
                state.last_category_id += 1;
                state.last_category_id
            }
        };
        state.categories.insert(id, name.to_string());
        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    async fn delete_category(&mut self, id: i32) -> anyhow::Result<()> {
        let state = &mut self.working;
        state.categories.remove(&id);
        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(code: &str, category: Option<Category>) -> ResolvedProduct {
        ResolvedProduct {
            code: code.to_string(),
            name: "Cable".to_string(),
            price: 3.5,
            category,
        }
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_later_units() {
        let store = MemoryCatalogStore::new();
        let mut uow = store.begin().await.unwrap();
        let saved = uow.save_product(None, &resolved("P00001", None)).await.unwrap();
        assert_eq!(saved.id, 1);
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.exists_by_code("P00001").await.unwrap());
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = MemoryCatalogStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            uow.save_product(None, &resolved("P00001", None)).await.unwrap();
        }
        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn identities_are_not_reused_after_delete() {
        let store = MemoryCatalogStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.save_product(None, &resolved("P00001", None)).await.unwrap();
        uow.save_product(None, &resolved("P00002", None)).await.unwrap();
        uow.delete_product(2).await.unwrap();
        let third = uow.save_product(None, &resolved("P00003", None)).await.unwrap();
        assert_eq!(third.id, 3);
        let latest = uow.find_most_recently_inserted_product().await.unwrap().unwrap();
        assert_eq!(latest.code, "P00003");
    }

    #[tokio::test]
    async fn deleting_a_category_clears_product_references() {
        let store = MemoryCatalogStore::new();
        let mut uow = store.begin().await.unwrap();
        let category = uow.save_category(None, "Cables").await.unwrap();
        uow.save_product(None, &resolved("P00001", Some(category.clone())))
            .await
            .unwrap();

        uow.delete_category(category.id).await.unwrap();
        let product = uow.find_product_by_id(1).await.unwrap().unwrap();
        assert_eq!(product.category, None);
    }

    #[tokio::test]
    async fn exists_by_code_excluding_ignores_self() {
        let store = MemoryCatalogStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.save_product(None, &resolved("P00001", None)).await.unwrap();
        assert!(!uow.exists_by_code_excluding("P00001", 1).await.unwrap());
        assert!(uow.exists_by_code_excluding("P00001", 2).await.unwrap());
    }
}
