pub mod code;
pub mod error;
pub mod model;
pub mod policy;

pub use error::CatalogError;
