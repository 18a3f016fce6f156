//! Rejection taxonomy shared by the catalog operations.

/// Message used for every allocator failure.
pub const CODE_GENERATION_FAILED: &str = "Error generating product code.";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Field-level violations, already joined as `"<field>: <message>, ..."`.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid product code. Must follow this format PXXXXX (eg. P00001).")]
    InvalidFormat,

    #[error("Product code already exists.")]
    DuplicateCode,

    #[error("{0}")]
    NotFound(String),

    /// Malformed request body or path parameter.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn product_not_found() -> Self {
        Self::NotFound("Product not found.".to_string())
    }

    /// Category lookups made while resolving a product reference.
    pub fn referenced_category_not_found() -> Self {
        Self::NotFound("Category not found.".to_string())
    }

    /// Direct category lookups (`/categories/{id}`).
    pub fn category_not_found() -> Self {
        Self::NotFound("Category not found".to_string())
    }

    pub fn code_generation_failed() -> Self {
        Self::Internal(CODE_GENERATION_FAILED.to_string())
    }
}
