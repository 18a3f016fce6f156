//! The catalog service.
//!
//! Every public operation opens one unit of work on the store, runs the relevant policy
//! and either commits the whole result or drops the unit of work, which rolls it back.

use crate::domain::model::{Category, CategoryInput, Product, ProductInput};
use crate::domain::policy::{prepare_for_create, prepare_for_update, validation};
use crate::domain::CatalogError;
use crate::storage::CatalogStore;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut uow = self.store.begin().await?;
        let products = uow.find_all_products().await?;
        uow.commit().await?;
        Ok(products)
    }

    pub async fn find_product(&self, id: i32) -> Result<Product, CatalogError> {
        let mut uow = self.store.begin().await?;
        let product = uow
            .find_product_by_id(id)
            .await?
            .ok_or_else(CatalogError::product_not_found)?;
        uow.commit().await?;
        Ok(product)
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let mut uow = self.store.begin().await?;
        let resolved = prepare_for_create(&mut *uow, &input).await?;
        let product = uow.save_product(None, &resolved).await?;
        uow.commit().await?;
        info!(id = product.id, code = %product.code, "product created");
        Ok(product)
    }

    /// Replaces name, price, code and category of product `id`.
    pub async fn update_product(
        &self,
        id: i32,
        input: ProductInput,
    ) -> Result<Product, CatalogError> {
        let mut uow = self.store.begin().await?;
        let resolved = prepare_for_update(&mut *uow, id, &input).await?;
        let product = uow.save_product(Some(id), &resolved).await?;
        uow.commit().await?;
        info!(id, code = %product.code, "product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), CatalogError> {
        let mut uow = self.store.begin().await?;
        uow.find_product_by_id(id)
            .await?
            .ok_or_else(CatalogError::product_not_found)?;
        uow.delete_product(id).await?;
        uow.commit().await?;
        info!(id, "product deleted");
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let mut uow = self.store.begin().await?;
        let categories = uow.find_all_categories().await?;
        uow.commit().await?;
        Ok(categories)
    }

    pub async fn find_category(&self, id: i32) -> Result<Category, CatalogError> {
        let mut uow = self.store.begin().await?;
        let category = uow
            .find_category_by_id(id)
            .await?
            .ok_or_else(CatalogError::category_not_found)?;
        uow.commit().await?;
        Ok(category)
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, CatalogError> {
        validation::validate_category(&input)?;
        let name = input.name.unwrap_or_default();

        let mut uow = self.store.begin().await?;
        let category = uow.save_category(None, &name).await?;
        uow.commit().await?;
        info!(id = category.id, "category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i32,
        input: CategoryInput,
    ) -> Result<Category, CatalogError> {
        validation::validate_category(&input)?;
        let name = input.name.unwrap_or_default();

        let mut uow = self.store.begin().await?;
        uow.find_category_by_id(id)
            .await?
            .ok_or_else(CatalogError::category_not_found)?;
        let category = uow.save_category(Some(id), &name).await?;
        uow.commit().await?;
        info!(id, "category updated");
        Ok(category)
    }

    /// Deletes the category; products that referenced it keep existing without one.
    pub async fn delete_category(&self, id: i32) -> Result<(), CatalogError> {
        let mut uow = self.store.begin().await?;
        uow.find_category_by_id(id)
            .await?
            .ok_or_else(CatalogError::category_not_found)?;
        uow.delete_category(id).await?;
        uow.commit().await?;
        info!(id, "category deleted");
        Ok(())
    }
}
