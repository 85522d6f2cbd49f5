//! Orders service.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use milkrun::{
    contact::{ContactInfo, normalize_email},
    payments::{PaymentMethod, PaymentStatus},
    status::OrderStatus,
};
use mockall::automock;
use tracing::{error, info};

use crate::{
    domain::{
        customers::CustomerUuid,
        orders::{
            builder::OrderBuilder,
            data::{
                BulkUpdateFailure, BulkUpdateOutcome, Checkout, OrderOwner, OrderRequest,
                OrderSettings, OrderViewer, StatusUpdate,
            },
            errors::OrdersServiceError,
            numbers::allocate_order_number,
            records::{OrderRecord, OrderUuid, PaymentSettlement, StatusChange},
        },
    },
    notifications::{Notifier, dispatch_order_created},
    store::Store,
};

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone)]
pub struct StoreOrdersService {
    store: Arc<dyn Store>,
    settings: OrderSettings,
    notifier: Arc<dyn Notifier>,
}

impl StoreOrdersService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, settings: OrderSettings, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            settings,
            notifier,
        }
    }

    async fn find(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.store
            .find_order(order)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn resolve_customer(
        &self,
        checkout: &Checkout,
        contact: &ContactInfo,
    ) -> Result<CustomerUuid, OrdersServiceError> {
        match checkout {
            Checkout::Authenticated(identity) => Ok(identity.uuid),
            Checkout::Guest => {
                let customer = self
                    .store
                    .upsert_customer(CustomerUuid::new(), contact)
                    .await?;

                if !customer.is_active {
                    return Err(OrdersServiceError::InactiveCustomer);
                }

                Ok(customer.uuid)
            }
        }
    }

    /// Validate `update` against the order and apply it with a conditional write.
    async fn apply_status_update(
        &self,
        order: OrderUuid,
        update: &StatusUpdate,
        cancellation_reason: Option<String>,
        now: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let current = self.find(order).await?;

        current.status.transition_to(update.status)?;

        let change = StatusChange {
            from: current.status,
            to: update.status,
            notes: non_blank(update.notes.as_deref()),
            cancellation_reason,
            at: now,
        };

        let updated = self
            .store
            .change_status(order, change)
            .await?
            .ok_or(OrdersServiceError::ConcurrentModification)?;

        info!(
            order_uuid = %updated.uuid,
            order_number = %updated.order_number,
            from = %current.status,
            to = %updated.status,
            "order status changed"
        );

        Ok(updated)
    }
}

/// Cancellations must carry a non-blank reason; other statuses ignore it.
fn cancellation_reason(update: &StatusUpdate) -> Result<Option<String>, OrdersServiceError> {
    if update.status != OrderStatus::Cancelled {
        return Ok(None);
    }

    non_blank(update.cancellation_reason.as_deref())
        .map(Some)
        .ok_or(OrdersServiceError::CancellationReasonRequired)
}

#[async_trait]
impl OrdersService for StoreOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, checkout, request),
        fields(
            guest = checkout.is_guest(),
            payment_method = %request.payment_method,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        checkout: Checkout,
        request: OrderRequest,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if let Checkout::Authenticated(identity) = checkout
            && !identity.is_active
        {
            return Err(OrdersServiceError::InactiveCustomer);
        }

        let now = Timestamp::now();

        let draft = OrderBuilder::new(self.store.as_ref(), &self.settings)
            .build(&checkout, request, now)
            .await?;

        let customer_uuid = self.resolve_customer(&checkout, &draft.contact_info).await?;

        let order_number = allocate_order_number(self.store.as_ref(), now).await?;

        let order = self
            .store
            .insert_order(draft.into_new_order(OrderUuid::new(), order_number, customer_uuid, now))
            .await?;

        let span = tracing::Span::current();

        span.record("order_uuid", tracing::field::display(order.uuid));
        span.record("order_number", tracing::field::display(&order.order_number));

        info!(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            customer_uuid = %order.customer_uuid,
            total = %order.pricing.total,
            status = %order.status,
            payment_status = %order.payment.status,
            "order created"
        );

        dispatch_order_created(&self.notifier, &order);

        Ok(order)
    }

    #[tracing::instrument(name = "orders.service.get_order", skip(self), err)]
    async fn get_order(
        &self,
        viewer: OrderViewer,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let record = self.find(order).await?;

        match viewer {
            OrderViewer::Admin => Ok(record),
            OrderViewer::Customer(customer) if record.customer_uuid == customer => Ok(record),
            OrderViewer::Customer(_) => Err(OrdersServiceError::NotFound),
        }
    }

    #[tracing::instrument(name = "orders.service.confirm_cod", skip(self, owner), err)]
    async fn confirm_cod(
        &self,
        owner: OrderOwner,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let record = self.find(order).await?;

        let owned = match &owner {
            OrderOwner::Customer(customer) => record.customer_uuid == *customer,
            OrderOwner::GuestEmail(email) => normalize_email(email) == record.contact_info.email,
        };

        if !owned {
            return Err(OrdersServiceError::NotFound);
        }

        if record.payment.method != PaymentMethod::Cod {
            return Err(OrdersServiceError::NotCashOnDelivery);
        }

        if record.status != OrderStatus::Pending || record.payment.status != PaymentStatus::Pending
        {
            return Err(OrdersServiceError::NotAwaitingConfirmation {
                status: record.status,
                payment: record.payment.status,
            });
        }

        let settlement = PaymentSettlement {
            gateway_payment_id: None,
            gateway_signature: None,
            paid_at: Timestamp::now(),
        };

        let confirmed = self
            .store
            .settle_payment(order, settlement)
            .await?
            .ok_or(OrdersServiceError::ConcurrentModification)?;

        info!(
            order_uuid = %confirmed.uuid,
            order_number = %confirmed.order_number,
            "cash on delivery order confirmed"
        );

        Ok(confirmed)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, update),
        fields(status = %update.status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let reason = cancellation_reason(&update)?;

        self.apply_status_update(order, &update, reason, Timestamp::now())
            .await
    }

    #[tracing::instrument(
        name = "orders.service.bulk_update_status",
        skip(self, orders, update),
        fields(
            status = %update.status,
            requested = orders.len(),
            matched = tracing::field::Empty,
            modified = tracing::field::Empty
        ),
        err
    )]
    async fn bulk_update_status(
        &self,
        orders: Vec<OrderUuid>,
        update: StatusUpdate,
    ) -> Result<BulkUpdateOutcome, OrdersServiceError> {
        let reason = cancellation_reason(&update)?;
        let now = Timestamp::now();

        let mut outcome = BulkUpdateOutcome::default();
        let mut seen = HashSet::with_capacity(orders.len());

        for order in orders {
            if !seen.insert(order) {
                continue;
            }

            match self
                .apply_status_update(order, &update, reason.clone(), now)
                .await
            {
                Ok(_) => {
                    outcome.matched_count += 1;
                    outcome.modified_count += 1;
                }
                Err(OrdersServiceError::NotFound) => {
                    outcome.failures.push(BulkUpdateFailure {
                        order,
                        reason: OrdersServiceError::NotFound.to_string(),
                    });
                }
                Err(OrdersServiceError::Store(source)) => {
                    error!(order_uuid = %order, error = %source, "bulk status update failed");

                    outcome.matched_count += 1;
                    outcome.failures.push(BulkUpdateFailure {
                        order,
                        reason: "storage error".to_string(),
                    });
                }
                Err(other) => {
                    outcome.matched_count += 1;
                    outcome.failures.push(BulkUpdateFailure {
                        order,
                        reason: other.to_string(),
                    });
                }
            }
        }

        let span = tracing::Span::current();

        span.record("matched", outcome.matched_count);
        span.record("modified", outcome.modified_count);

        Ok(outcome)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate, price and persist a new order.
    ///
    /// Prices always come from the catalog. Guest checkouts provision a customer identity
    /// from the contact email once the order has validated.
    async fn create_order(
        &self,
        checkout: Checkout,
        request: OrderRequest,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order. Customers only see their own orders.
    async fn get_order(
        &self,
        viewer: OrderViewer,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Confirm a pending cash-on-delivery order on behalf of its owner.
    async fn confirm_cod(
        &self,
        owner: OrderOwner,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Move an order along the status state machine.
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Apply the same status update to many orders, each checked on its own.
    async fn bulk_update_status(
        &self,
        orders: Vec<OrderUuid>,
        update: StatusUpdate,
    ) -> Result<BulkUpdateOutcome, OrdersServiceError>;
}
