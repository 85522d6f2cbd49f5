//! Customers service.

use std::sync::Arc;

use async_trait::async_trait;
use milkrun::contact::ContactInfo;
use mockall::automock;
use tracing::info;

use crate::{
    domain::customers::{
        errors::CustomersServiceError,
        records::{CustomerRecord, CustomerUuid},
    },
    store::Store,
};

#[derive(Clone)]
pub struct StoreCustomersService {
    store: Arc<dyn Store>,
}

impl StoreCustomersService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomersService for StoreCustomersService {
    #[tracing::instrument(
        name = "customers.service.upsert_customer_identity",
        skip(self, contact),
        fields(customer_uuid = tracing::field::Empty),
        err
    )]
    async fn upsert_customer_identity(
        &self,
        contact: &ContactInfo,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        let contact = contact.validated()?;

        let customer = self
            .store
            .upsert_customer(CustomerUuid::new(), &contact)
            .await?;

        tracing::Span::current().record("customer_uuid", tracing::field::display(customer.uuid));

        info!(customer_uuid = %customer.uuid, "resolved customer identity");

        Ok(customer)
    }

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        self.store
            .find_customer(customer)
            .await?
            .ok_or(CustomersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Find or create the customer identity for a contact's email.
    ///
    /// Idempotent: concurrent calls for the same email resolve to one customer.
    async fn upsert_customer_identity(
        &self,
        contact: &ContactInfo,
    ) -> Result<CustomerRecord, CustomersServiceError>;

    /// Retrieve a single customer.
    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError>;
}
