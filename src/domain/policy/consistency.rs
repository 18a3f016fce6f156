//! Product create/update pipelines.
//!
//! Each pipeline runs, in order: field validation, code resolution (format check, then
//! uniqueness, or allocation on create), category resolution. The first failing step
//! rejects the whole operation; nothing here writes.

use crate::domain::code::{allocate, is_valid_format};
use crate::domain::error::CatalogError;
use crate::domain::model::{Category, ProductInput, ResolvedProduct};
use crate::domain::policy::validation::{validate_product, ValidProduct};
use crate::storage::{CategoryRepository, ProductRepository};
use tracing::warn;

/// Resolves a new product: a supplied code must be well-formed and unused, a missing one
/// is allocated starting at offset 1.
pub async fn prepare_for_create<S>(
    store: &mut S,
    input: &ProductInput,
) -> Result<ResolvedProduct, CatalogError>
where
    S: ProductRepository + CategoryRepository + ?Sized,
{
    let valid = validate_product(input)?;

    let code = match valid.code {
        Some(code) => {
            ensure_well_formed(code)?;
            if store.exists_by_code(code).await? {
                warn!(code, "rejecting duplicate product code");
                return Err(CatalogError::DuplicateCode);
            }
            code.to_string()
        }
        None => allocate(&mut *store, 1).await?,
    };

    let category = resolve_category(store, valid.category_id).await?;
    Ok(assemble(&valid, code, category))
}

/// Resolves the full replacement of product `id`.
///
/// The uniqueness check ignores the product itself, a blank code keeps the stored one, and
/// a missing category reference clears the category. Clearing is a deliberate departure
/// from keeping the stored category, since an update replaces the whole product.
pub async fn prepare_for_update<S>(
    store: &mut S,
    id: i32,
    input: &ProductInput,
) -> Result<ResolvedProduct, CatalogError>
where
    S: ProductRepository + CategoryRepository + ?Sized,
{
    let valid = validate_product(input)?;

    let existing = store
        .find_product_by_id(id)
        .await?
        .ok_or_else(CatalogError::product_not_found)?;

    let code = match valid.code {
        Some(code) => {
            ensure_well_formed(code)?;
            if store.exists_by_code_excluding(code, existing.id).await? {
                warn!(code, id, "rejecting product code owned by another product");
                return Err(CatalogError::DuplicateCode);
            }
            code.to_string()
        }
        None => existing.code,
    };

    let category = resolve_category(store, valid.category_id).await?;
    Ok(assemble(&valid, code, category))
}

fn ensure_well_formed(code: &str) -> Result<(), CatalogError> {
    if is_valid_format(code) {
        Ok(())
    } else {
        warn!(code, "rejecting malformed product code");
        Err(CatalogError::InvalidFormat)
    }
}

async fn resolve_category<S>(
    store: &mut S,
    category_id: Option<i32>,
) -> Result<Option<Category>, CatalogError>
where
    S: CategoryRepository + ?Sized,
{
    let Some(id) = category_id else {
        return Ok(None);
    };
    match store.find_category_by_id(id).await? {
        Some(category) => Ok(Some(category)),
        None => {
            warn!(category_id = id, "product references a missing category");
            Err(CatalogError::referenced_category_not_found())
        }
    }
}

fn assemble(valid: &ValidProduct<'_>, code: String, category: Option<Category>) -> ResolvedProduct {
    ResolvedProduct {
        code,
        name: valid.name.to_string(),
        price: valid.price,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CatalogStore, MemoryCatalogStore, UnitOfWork};

    fn input(code: Option<&str>, category_id: i32) -> ProductInput {
        ProductInput {
            code: code.map(str::to_string),
            name: Some("Monitor".into()),
            price: Some(199.0),
            category_id: Some(category_id),
        }
    }

    async fn seeded() -> (MemoryCatalogStore, Box<dyn UnitOfWork>) {
        let store = MemoryCatalogStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.save_category(None, "Displays").await.unwrap();
        let resolved = prepare_for_create(&mut *uow, &input(Some("P00010"), 0))
            .await
            .unwrap();
        uow.save_product(None, &resolved).await.unwrap();
        (store, uow)
    }

    #[tokio::test]
    async fn create_accepts_supplied_code_verbatim() {
        let (_store, mut uow) = seeded().await;
        let resolved = prepare_for_create(&mut *uow, &input(Some("P12345"), 1))
            .await
            .unwrap();
        assert_eq!(resolved.code, "P12345");
        assert_eq!(resolved.category.map(|c| c.name), Some("Displays".to_string()));
    }

    #[tokio::test]
    async fn create_rejects_malformed_code_before_uniqueness() {
        let (_store, mut uow) = seeded().await;
        let err = prepare_for_create(&mut *uow, &input(Some("P00X01"), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFormat));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_code() {
        let (_store, mut uow) = seeded().await;
        let err = prepare_for_create(&mut *uow, &input(Some("P00010"), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode));
        assert_eq!(err.to_string(), "Product code already exists.");
    }

    #[tokio::test]
    async fn create_allocates_when_code_is_blank() {
        let (_store, mut uow) = seeded().await;
        // Latest is P00010 -> "0001" + 1.
        let resolved = prepare_for_create(&mut *uow, &input(Some(" "), 0)).await.unwrap();
        assert_eq!(resolved.code, "P00002");
    }

    #[tokio::test]
    async fn create_rejects_missing_category() {
        let (_store, mut uow) = seeded().await;
        let err = prepare_for_create(&mut *uow, &input(None, 42)).await.unwrap_err();
        assert_eq!(err.to_string(), "Category not found.");
    }

    #[tokio::test]
    async fn validation_runs_before_code_checks() {
        let (_store, mut uow) = seeded().await;
        let bad = ProductInput {
            code: Some("garbage".into()),
            ..Default::default()
        };
        let err = prepare_for_create(&mut *uow, &bad).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn update_allows_own_code() {
        let (_store, mut uow) = seeded().await;
        let resolved = prepare_for_update(&mut *uow, 1, &input(Some("P00010"), 0))
            .await
            .unwrap();
        assert_eq!(resolved.code, "P00010");
    }

    #[tokio::test]
    async fn update_rejects_code_of_another_product() {
        let (_store, mut uow) = seeded().await;
        let other = prepare_for_create(&mut *uow, &input(Some("P00020"), 0))
            .await
            .unwrap();
        uow.save_product(None, &other).await.unwrap();

        let err = prepare_for_update(&mut *uow, 1, &input(Some("P00020"), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode));
    }

    #[tokio::test]
    async fn update_with_blank_code_keeps_stored_code() {
        let (_store, mut uow) = seeded().await;
        let resolved = prepare_for_update(&mut *uow, 1, &input(None, 1)).await.unwrap();
        assert_eq!(resolved.code, "P00010");
        assert_eq!(resolved.category.map(|c| c.id), Some(1));
    }

    #[tokio::test]
    async fn update_of_missing_product_is_not_found() {
        let (_store, mut uow) = seeded().await;
        let err = prepare_for_update(&mut *uow, 99, &input(None, 0)).await.unwrap_err();
        assert_eq!(err.to_string(), "Product not found.");
    }
}
