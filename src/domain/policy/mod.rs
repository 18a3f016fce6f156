//! Rules applied to catalog writes before anything is persisted.

pub mod consistency;
pub mod validation;

pub use consistency::{prepare_for_create, prepare_for_update};
