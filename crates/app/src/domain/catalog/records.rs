//! Catalog Records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<CatalogProduct>;

/// A sellable product as priced right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub uuid: ProductUuid,
    pub name: String,

    /// Unit price in major units.
    pub price: Decimal,
    pub is_available: bool,
}
