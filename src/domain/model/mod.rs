//! Catalog entities and the inbound payloads that create or replace them.

use serde::Deserialize;
use utoipa::ToSchema;

/// A persisted category. `id` is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// A persisted product.
///
/// `id` is assigned by storage on first save and grows monotonically, which makes it the
/// ordering key for "most recently inserted product".
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub price: f64,
    pub category: Option<Category>,
}

/// A product that passed every consistency check and is ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProduct {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub category: Option<Category>,
}

impl ResolvedProduct {
    pub fn category_id(&self) -> Option<i32> {
        self.category.as_ref().map(|c| c.id)
    }

    /// Attaches the storage-assigned identity.
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            code: self.code,
            name: self.name,
            price: self.price,
            category: self.category,
        }
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Fields are optional on the wire so that missing values surface as field-level
/// validation messages instead of deserialization failures.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ProductInput {
    /// Product code (`P` + 5 digits). Blank on create means "allocate one"; blank on
    /// update means "keep the current code".
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    /// Category identity; `0` or less means no category.
    #[serde(default, rename = "categoryID")]
    pub category_id: Option<i32>,
}

impl ProductInput {
    /// The supplied code, or `None` when it is absent or blank.
    pub fn supplied_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// The referenced category identity, or `None` for "no category".
    pub fn category_ref(&self) -> Option<i32> {
        self.category_id.filter(|id| *id > 0)
    }
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
}
