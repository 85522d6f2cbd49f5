//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use milkrun::{
    money::{round_money, to_minor_units},
    payments::{PaymentMethod, PaymentStatus},
    signature::{self, GatewaySecret},
    status::OrderStatus,
};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    domain::{
        orders::records::{OrderRecord, OrderUuid, PaymentSettlement},
        payments::{
            data::{GatewayOrder, PaymentVerification},
            errors::PaymentsServiceError,
        },
    },
    gateway::PaymentGateway,
    store::Store,
};

/// Gateway client together with the secret that signs its receipts.
#[derive(Clone)]
pub struct GatewayAccess {
    pub client: Arc<dyn PaymentGateway>,
    pub secret: GatewaySecret,
}

#[derive(Clone)]
pub struct StorePaymentsService {
    store: Arc<dyn Store>,
    gateway: Option<GatewayAccess>,
    currency: String,
}

impl StorePaymentsService {
    /// Without `gateway`, every online payment operation answers
    /// [`PaymentsServiceError::GatewayUnavailable`].
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        gateway: Option<GatewayAccess>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            currency: currency.into(),
        }
    }

    fn gateway(&self) -> Result<&GatewayAccess, PaymentsServiceError> {
        self.gateway
            .as_ref()
            .ok_or(PaymentsServiceError::GatewayUnavailable)
    }

    async fn find_online_order(
        &self,
        order: OrderUuid,
    ) -> Result<OrderRecord, PaymentsServiceError> {
        let record = self
            .store
            .find_order(order)
            .await?
            .ok_or(PaymentsServiceError::NotFound)?;

        if record.payment.method != PaymentMethod::Online {
            return Err(PaymentsServiceError::NotOnlineOrder);
        }

        Ok(record)
    }

    fn gateway_order(
        &self,
        order: &OrderRecord,
        gateway_order_id: String,
    ) -> Result<GatewayOrder, PaymentsServiceError> {
        Ok(GatewayOrder {
            order: order.uuid,
            gateway_order_id,
            amount: order.pricing.total,
            amount_minor: to_minor_units(order.pricing.total)?,
            currency: self.currency.clone(),
        })
    }
}

/// A repeated receipt for an already-paid order is accepted; a different payment is not.
fn settled_outcome(
    order: OrderRecord,
    payment_id: &str,
) -> Result<OrderRecord, PaymentsServiceError> {
    if order.payment.status == PaymentStatus::Paid
        && order.payment.gateway_payment_id.as_deref() == Some(payment_id)
    {
        Ok(order)
    } else {
        Err(PaymentsServiceError::PaymentConflict)
    }
}

#[async_trait]
impl PaymentsService for StorePaymentsService {
    #[tracing::instrument(
        name = "payments.service.create_gateway_order",
        skip(self),
        fields(gateway_order_id = tracing::field::Empty, reused = tracing::field::Empty),
        err
    )]
    async fn create_gateway_order(
        &self,
        order: OrderUuid,
        declared_amount: Option<Decimal>,
    ) -> Result<GatewayOrder, PaymentsServiceError> {
        let gateway = self.gateway()?;
        let record = self.find_online_order(order).await?;

        if record.payment.status != PaymentStatus::Pending {
            return Err(PaymentsServiceError::AlreadySettled);
        }

        if record.status != OrderStatus::Pending {
            return Err(PaymentsServiceError::NotPayable {
                status: record.status,
            });
        }

        if let Some(declared) = declared_amount
            && round_money(declared) != record.pricing.total
        {
            return Err(PaymentsServiceError::AmountMismatch {
                expected: record.pricing.total,
                declared,
            });
        }

        let span = tracing::Span::current();

        if let Some(existing) = record.payment.gateway_order_id.clone() {
            span.record("gateway_order_id", existing.as_str());
            span.record("reused", true);

            return self.gateway_order(&record, existing);
        }

        let amount_minor = to_minor_units(record.pricing.total)?;

        let intent = gateway
            .client
            .create_intent(amount_minor, &self.currency, record.order_number.as_str())
            .await?;

        let attached = match self.store.attach_gateway_order(order, &intent.id).await? {
            Some(attached) => attached,
            // Lost a race with a concurrent request; reuse whatever it attached.
            None => self
                .store
                .find_order(order)
                .await?
                .filter(|current| current.payment.gateway_order_id.is_some())
                .ok_or(PaymentsServiceError::AlreadySettled)?,
        };

        let gateway_order_id = attached
            .payment
            .gateway_order_id
            .clone()
            .unwrap_or(intent.id);

        span.record("gateway_order_id", gateway_order_id.as_str());
        span.record("reused", false);

        info!(
            order_uuid = %attached.uuid,
            order_number = %attached.order_number,
            gateway_order_id = %gateway_order_id,
            amount_minor,
            "gateway order created"
        );

        self.gateway_order(&attached, gateway_order_id)
    }

    #[tracing::instrument(
        name = "payments.service.verify_payment",
        skip(self, verification),
        fields(
            order_uuid = %verification.order,
            gateway_order_id = %verification.gateway_order_id,
            payment_id = %verification.payment_id
        ),
        err
    )]
    async fn verify_payment(
        &self,
        verification: PaymentVerification,
    ) -> Result<OrderRecord, PaymentsServiceError> {
        let gateway = self.gateway()?;
        let record = self.find_online_order(verification.order).await?;

        if let Err(error) = signature::verify(
            &gateway.secret,
            &verification.gateway_order_id,
            &verification.payment_id,
            &verification.signature,
        ) {
            warn!(
                target: "security",
                order_uuid = %record.uuid,
                gateway_order_id = %verification.gateway_order_id,
                payment_id = %verification.payment_id,
                error = %error,
                "payment signature verification failed"
            );

            return Err(PaymentsServiceError::InvalidSignature);
        }

        let Some(attached) = record.payment.gateway_order_id.as_deref() else {
            return Err(PaymentsServiceError::NoGatewayOrder);
        };

        if attached != verification.gateway_order_id {
            warn!(
                target: "security",
                order_uuid = %record.uuid,
                gateway_order_id = %verification.gateway_order_id,
                attached_gateway_order_id = %attached,
                "signed receipt belongs to a different gateway order"
            );

            return Err(PaymentsServiceError::InvalidSignature);
        }

        match record.payment.status {
            PaymentStatus::Pending => {}
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Refunded => {
                return settled_outcome(record, &verification.payment_id);
            }
        }

        if record.status != OrderStatus::Pending {
            return Err(PaymentsServiceError::NotPayable {
                status: record.status,
            });
        }

        let settlement = PaymentSettlement {
            gateway_payment_id: Some(verification.payment_id.clone()),
            gateway_signature: Some(verification.signature.trim().to_lowercase()),
            paid_at: Timestamp::now(),
        };

        let settled = match self
            .store
            .settle_payment(verification.order, settlement)
            .await?
        {
            Some(settled) => settled,
            None => {
                let current = self
                    .store
                    .find_order(verification.order)
                    .await?
                    .ok_or(PaymentsServiceError::NotFound)?;

                return settled_outcome(current, &verification.payment_id);
            }
        };

        info!(
            order_uuid = %settled.uuid,
            order_number = %settled.order_number,
            payment_id = %verification.payment_id,
            "online payment verified"
        );

        Ok(settled)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Create (or reuse) the gateway order that collects an online order's total.
    ///
    /// The amount always comes from the persisted order. A `declared_amount` that differs
    /// from it is rejected.
    async fn create_gateway_order(
        &self,
        order: OrderUuid,
        declared_amount: Option<Decimal>,
    ) -> Result<GatewayOrder, PaymentsServiceError>;

    /// Check a gateway receipt's signature and mark the order paid.
    ///
    /// Idempotent for a repeated receipt. Nothing changes when the signature does not
    /// verify.
    async fn verify_payment(
        &self,
        verification: PaymentVerification,
    ) -> Result<OrderRecord, PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        domain::orders::{
            OrdersRepository, OrdersService, OrdersServiceError,
            data::{Checkout, StatusUpdate},
        },
        gateway::{GatewayError, MockPaymentGateway},
        test::{
            TestContext,
            helpers::{line, named_line, request, signed_receipt},
        },
    };

    use super::*;

    async fn online_order(ctx: &TestContext) -> Result<OrderRecord, OrdersServiceError> {
        ctx.orders
            .create_order(
                ctx.customer(),
                request(vec![line(&ctx.catalog.milk, 1)], PaymentMethod::Online),
            )
            .await
    }

    #[tokio::test]
    async fn gateway_order_uses_persisted_total() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;

        assert_eq!(gateway_order.order, order.uuid);
        assert_eq!(gateway_order.amount, dec!(82));
        assert_eq!(gateway_order.amount_minor, 8200);
        assert_eq!(gateway_order.currency, "INR");
        assert_eq!(ctx.gateway.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn retries_reuse_the_gateway_order() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let first = ctx.payments.create_gateway_order(order.uuid, None).await?;
        let second = ctx
            .payments
            .create_gateway_order(order.uuid, Some(dec!(82.00)))
            .await?;

        assert_eq!(first.gateway_order_id, second.gateway_order_id);
        assert_eq!(ctx.gateway.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_client_amount_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let result = ctx
            .payments
            .create_gateway_order(order.uuid, Some(dec!(52)))
            .await;

        assert!(
            matches!(
                result,
                Err(PaymentsServiceError::AmountMismatch { expected, declared })
                    if expected == dec!(82) && declared == dec!(52)
            ),
            "expected AmountMismatch, got {result:?}"
        );
        assert_eq!(ctx.gateway.calls(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn cash_orders_have_no_gateway_order() -> TestResult {
        let ctx = TestContext::new().await;

        let order = ctx
            .orders
            .create_order(
                ctx.customer(),
                request(vec![line(&ctx.catalog.milk, 2)], PaymentMethod::Cod),
            )
            .await?;

        let result = ctx.payments.create_gateway_order(order.uuid, None).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NotOnlineOrder)),
            "expected NotOnlineOrder, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn settled_orders_need_no_gateway_order() -> TestResult {
        let ctx = TestContext::new().await;

        let mut free = request(vec![line(&ctx.catalog.paneer, 2)], PaymentMethod::Online);
        free.coupon_code = Some("FREEMILK".to_string());

        let order = ctx.orders.create_order(ctx.customer(), free).await?;

        let result = ctx.payments.create_gateway_order(order.uuid, None).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::AlreadySettled)),
            "expected AlreadySettled, got {result:?}"
        );
        assert_eq!(ctx.gateway.calls(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_orders_cannot_be_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        ctx.orders
            .update_status(
                order.uuid,
                StatusUpdate {
                    status: OrderStatus::Cancelled,
                    notes: None,
                    cancellation_reason: Some("duplicate".to_string()),
                },
            )
            .await?;

        let result = ctx.payments.create_gateway_order(order.uuid, None).await;

        assert!(
            matches!(
                result,
                Err(PaymentsServiceError::NotPayable {
                    status: OrderStatus::Cancelled
                })
            ),
            "expected NotPayable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_gateway_is_unavailable() -> TestResult {
        let ctx = TestContext::without_gateway().await;
        let order = online_order(&ctx).await?;

        let created = ctx.payments.create_gateway_order(order.uuid, None).await;

        assert!(
            matches!(created, Err(PaymentsServiceError::GatewayUnavailable)),
            "expected GatewayUnavailable, got {created:?}"
        );

        let verified = ctx
            .payments
            .verify_payment(signed_receipt(order.uuid, "order_test_1", "pay_1"))
            .await;

        assert!(
            matches!(verified, Err(PaymentsServiceError::GatewayUnavailable)),
            "expected GatewayUnavailable, got {verified:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn gateway_failures_leave_the_order_pending() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_intent()
            .times(1)
            .returning(|_, _, _| Err(GatewayError::UnexpectedResponse("timeout".to_string())));

        let ctx = TestContext::with_gateway_client(Arc::new(gateway)).await;
        let order = online_order(&ctx).await?;

        let result = ctx.payments.create_gateway_order(order.uuid, None).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::Gateway(_))),
            "expected Gateway error, got {result:?}"
        );

        let current = ctx.store.find_order(order.uuid).await?.ok_or("order vanished")?;

        assert_eq!(current.status, OrderStatus::Pending);
        assert_eq!(current.payment.status, PaymentStatus::Pending);
        assert_eq!(current.payment.gateway_order_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn signed_receipt_marks_order_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;

        let paid = ctx
            .payments
            .verify_payment(signed_receipt(
                order.uuid,
                &gateway_order.gateway_order_id,
                "pay_1",
            ))
            .await?;

        assert_eq!(paid.payment.status, PaymentStatus::Paid);
        assert_eq!(paid.status, OrderStatus::Confirmed);
        assert_eq!(paid.payment.gateway_payment_id.as_deref(), Some("pay_1"));
        assert!(paid.payment.paid_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn repeated_receipts_are_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;
        let receipt = signed_receipt(order.uuid, &gateway_order.gateway_order_id, "pay_1");

        let first = ctx.payments.verify_payment(receipt.clone()).await?;
        let second = ctx.payments.verify_payment(receipt).await?;

        assert_eq!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn forged_signature_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let order = ctx
            .orders
            .create_order(
                Checkout::Guest,
                request(vec![named_line("Full Cream Milk 1L", 1)], PaymentMethod::Online),
            )
            .await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;

        let mut forged = signed_receipt(order.uuid, &gateway_order.gateway_order_id, "pay_1");
        forged.signature = "0".repeat(64);

        let result = ctx.payments.verify_payment(forged).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::InvalidSignature)),
            "expected InvalidSignature, got {result:?}"
        );

        let mut malformed = signed_receipt(order.uuid, &gateway_order.gateway_order_id, "pay_1");
        malformed.signature = "not-a-signature".to_string();

        let result = ctx.payments.verify_payment(malformed).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::InvalidSignature)),
            "expected InvalidSignature, got {result:?}"
        );

        let current = ctx.store.find_order(order.uuid).await?.ok_or("order vanished")?;

        assert_eq!(current.payment.status, PaymentStatus::Pending);
        assert_eq!(current.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn receipts_for_other_gateway_orders_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        ctx.payments.create_gateway_order(order.uuid, None).await?;

        let result = ctx
            .payments
            .verify_payment(signed_receipt(order.uuid, "order_elsewhere", "pay_1"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::InvalidSignature)),
            "expected InvalidSignature, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn receipts_need_a_gateway_order() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let result = ctx
            .payments
            .verify_payment(signed_receipt(order.uuid, "order_test_1", "pay_1"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NoGatewayOrder)),
            "expected NoGatewayOrder, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_second_payment_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;
        let id = gateway_order.gateway_order_id.as_str();

        ctx.payments
            .verify_payment(signed_receipt(order.uuid, id, "pay_1"))
            .await?;

        let result = ctx
            .payments
            .verify_payment(signed_receipt(order.uuid, id, "pay_2"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::PaymentConflict)),
            "expected PaymentConflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn racing_receipts_settle_once() -> TestResult {
        let ctx = TestContext::new().await;
        let order = online_order(&ctx).await?;

        let gateway_order = ctx.payments.create_gateway_order(order.uuid, None).await?;

        let handles: Vec<_> = (0..6)
            .map(|attempt| {
                let payments = ctx.payments.clone();
                let receipt = signed_receipt(
                    order.uuid,
                    &gateway_order.gateway_order_id,
                    &format!("pay_{attempt}"),
                );

                tokio::spawn(async move { payments.verify_payment(receipt).await })
            })
            .collect();

        let mut settled = Vec::new();

        for handle in handles {
            match handle.await? {
                Ok(paid) => settled.push(paid),
                Err(PaymentsServiceError::PaymentConflict) => {}
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(settled.len(), 1, "expected one settlement, got {settled:?}");

        let current = ctx.store.find_order(order.uuid).await?.ok_or("order vanished")?;

        assert_eq!(current.payment.status, PaymentStatus::Paid);
        assert_eq!(current.status, OrderStatus::Confirmed);
        assert_eq!(
            current.payment.gateway_payment_id,
            settled.first().and_then(|paid| paid.payment.gateway_payment_id.clone())
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_orders_are_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .payments
            .verify_payment(signed_receipt(OrderUuid::new(), "order_test_1", "pay_1"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
