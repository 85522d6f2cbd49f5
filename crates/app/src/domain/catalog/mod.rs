//! Catalog
//!
//! Read-only product lookups used to price orders. Catalog maintenance lives elsewhere.

pub mod records;
mod repository;

pub use records::{CatalogProduct, ProductUuid};
pub use repository::CatalogRepository;
