//! Catalog Repository

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    domain::catalog::records::{CatalogProduct, ProductUuid},
    store::{PgStore, StoreError},
};

const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const FIND_PRODUCT_BY_NAME_SQL: &str = include_str!("sql/find_product_by_name.sql");

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Look a product up by identifier.
    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<CatalogProduct>, StoreError>;

    /// Look a product up by exact name, ignoring case and surrounding whitespace.
    async fn find_product_by_name(&self, name: &str)
    -> Result<Option<CatalogProduct>, StoreError>;
}

#[async_trait]
impl CatalogRepository for PgStore {
    async fn find_product(
        &self,
        product: ProductUuid,
    ) -> Result<Option<CatalogProduct>, StoreError> {
        Ok(query_as::<Postgres, CatalogProduct>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn find_product_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CatalogProduct>, StoreError> {
        Ok(query_as::<Postgres, CatalogProduct>(FIND_PRODUCT_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?)
    }
}

impl<'r> FromRow<'r, PgRow> for CatalogProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            is_available: row.try_get("is_available")?,
        })
    }
}
