//! Field presence and length checks.
//!
//! Violations are reported in field declaration order and joined as
//! `"<field>: <message>, <field>: <message>"`.

use crate::domain::error::CatalogError;
use crate::domain::model::{CategoryInput, ProductInput};

/// Entity names: product and category.
pub const MAX_NAME_LEN: usize = 200;

/// Caller-supplied product codes, checked before the format rule.
pub const MAX_CODE_LEN: usize = 100;

#[derive(Debug, Default)]
struct Violations(Vec<(&'static str, &'static str)>);

impl Violations {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push((field, message));
    }

    fn name(&mut self, name: Option<&str>) {
        let name = name.unwrap_or_default();
        if name.trim().is_empty() {
            self.push("name", "Name cannot be empty.");
        }
        if name.chars().count() > MAX_NAME_LEN {
            self.push("name", "Name too long. Maximum 200 characters.");
        }
    }

    fn into_result(self) -> Result<(), CatalogError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        Err(CatalogError::Validation(joined))
    }
}

/// A product payload whose required fields are known to be present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidProduct<'a> {
    /// Non-blank caller code, if any.
    pub code: Option<&'a str>,
    pub name: &'a str,
    pub price: f64,
    /// Positive category reference, if any.
    pub category_id: Option<i32>,
}

pub fn validate_product(input: &ProductInput) -> Result<ValidProduct<'_>, CatalogError> {
    let mut violations = Violations::default();
    if let Some(code) = input.code.as_deref() {
        if code.chars().count() > MAX_CODE_LEN {
            violations.push("code", "Code too long. Maximum 100 characters.");
        }
    }
    violations.name(input.name.as_deref());
    if input.price.is_none() {
        violations.push("price", "Price cannot be empty.");
    }
    violations.into_result()?;

    Ok(ValidProduct {
        code: input.supplied_code(),
        name: input.name.as_deref().unwrap_or_default(),
        price: input.price.unwrap_or_default(),
        category_id: input.category_ref(),
    })
}

pub fn validate_category(input: &CategoryInput) -> Result<(), CatalogError> {
    let mut violations = Violations::default();
    violations.name(input.name.as_deref());
    violations.into_result()
}
