//! Turns an order request into a priced, validated draft.

use jiff::Timestamp;
use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    coupons::AppliedCoupon,
    order_numbers::OrderNumber,
    payments::{PaymentMethod, PaymentPlan},
    pricing::{LineItem, Pricing, PricingError, chargeable_amount, price_order},
};
use rust_decimal::Decimal;

use crate::{
    domain::{
        catalog::CatalogProduct,
        coupons::check_coupon,
        customers::CustomerUuid,
        orders::{
            data::{Checkout, OrderLine, OrderRequest, OrderSettings},
            errors::OrdersServiceError,
            records::{NewOrderRecord, OrderItem, OrderUuid, PaymentRecord},
        },
    },
    store::Store,
};

/// Validated order awaiting an identity and an order number.
#[derive(Debug, Clone)]
pub(crate) struct DraftOrder {
    pub(crate) items: Vec<OrderItem>,
    pub(crate) customer_type: CustomerType,
    pub(crate) hostel: Option<String>,
    pub(crate) delivery_address: DeliveryAddress,
    pub(crate) contact_info: ContactInfo,
    pub(crate) pricing: Pricing,
    pub(crate) coupon: Option<AppliedCoupon>,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) plan: PaymentPlan,
    pub(crate) notes: Option<String>,
}

impl DraftOrder {
    pub(crate) fn into_new_order(
        self,
        uuid: OrderUuid,
        order_number: OrderNumber,
        customer_uuid: CustomerUuid,
        now: Timestamp,
    ) -> NewOrderRecord {
        let payment_status = self.plan.initial_status();

        NewOrderRecord {
            uuid,
            order_number,
            customer_uuid,
            items: self.items,
            customer_type: self.customer_type,
            hostel: self.hostel,
            delivery_address: self.delivery_address,
            contact_info: self.contact_info,
            pricing: self.pricing,
            coupon_code: self.coupon.map(|coupon| coupon.code),
            payment: PaymentRecord {
                method: self.payment_method,
                status: payment_status,
                gateway_order_id: None,
                gateway_payment_id: None,
                gateway_signature: None,
                paid_at: matches!(self.plan, PaymentPlan::Settled).then_some(now),
            },
            status: self.plan.initial_order_status(),
            notes: self.notes,
        }
    }
}

pub(crate) struct OrderBuilder<'a> {
    store: &'a dyn Store,
    settings: &'a OrderSettings,
}

impl<'a> OrderBuilder<'a> {
    pub(crate) fn new(store: &'a dyn Store, settings: &'a OrderSettings) -> Self {
        Self { store, settings }
    }

    /// Validate the request and price it from catalog prices.
    pub(crate) async fn build(
        &self,
        checkout: &Checkout,
        request: OrderRequest,
        now: Timestamp,
    ) -> Result<DraftOrder, OrdersServiceError> {
        let contact_info = request.contact_info.validated()?;

        let delivery_address = if checkout.is_guest() {
            request.delivery_address.validated_minimal()?
        } else {
            request.delivery_address.validated_structured()?
        };

        let hostel = request
            .customer_type
            .resolve_hostel(request.hostel.as_deref())?;

        let items = self.resolve_items(checkout, &request.items).await?;

        let lines: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem::new(item.quantity, item.unit_price))
            .collect();

        let coupon = match request
            .coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            Some(code) => {
                let order_amount = chargeable_amount(&lines, &self.settings.delivery)?;

                Some(check_coupon(self.store, code, order_amount, now).await??)
            }
            None => None,
        };

        let pricing = price_order(
            &lines,
            &self.settings.delivery,
            coupon
                .as_ref()
                .map_or(Decimal::ZERO, |coupon| coupon.discount),
        )?;

        let plan = PaymentPlan::for_order(request.payment_method, &pricing);

        Ok(DraftOrder {
            items,
            customer_type: request.customer_type,
            hostel,
            delivery_address,
            contact_info,
            pricing,
            coupon,
            payment_method: request.payment_method,
            plan,
            notes: request
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(ToString::to_string),
        })
    }

    async fn resolve_items(
        &self,
        checkout: &Checkout,
        lines: &[OrderLine],
    ) -> Result<Vec<OrderItem>, OrdersServiceError> {
        if lines.is_empty() {
            return Err(PricingError::NoItems.into());
        }

        let mut items = Vec::with_capacity(lines.len());

        for (line, requested) in lines.iter().enumerate() {
            if requested.quantity == 0 {
                return Err(PricingError::ZeroQuantity { line }.into());
            }

            let product = self.resolve_product(checkout, line, requested).await?;

            if !product.is_available {
                return Err(OrdersServiceError::ProductUnavailable { name: product.name });
            }

            if let Some(declared) = requested.unit_price
                && (declared - product.price).abs() > self.settings.price_tolerance
            {
                return Err(OrdersServiceError::PriceMismatch {
                    name: product.name,
                    declared,
                    current: product.price,
                });
            }

            let line_total = LineItem::new(requested.quantity, product.price).line_total()?;

            items.push(OrderItem {
                product_uuid: Some(product.uuid),
                name: product.name,
                quantity: requested.quantity,
                unit_price: product.price,
                line_total,
            });
        }

        Ok(items)
    }

    async fn resolve_product(
        &self,
        checkout: &Checkout,
        line: usize,
        requested: &OrderLine,
    ) -> Result<CatalogProduct, OrdersServiceError> {
        if let Some(product) = requested.product {
            return self
                .store
                .find_product(product)
                .await?
                .ok_or(OrdersServiceError::ProductNotFound { line });
        }

        if !checkout.is_guest() {
            return Err(OrdersServiceError::ProductReferenceRequired { line });
        }

        let name = requested
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(OrdersServiceError::ProductReferenceRequired { line })?;

        self.store
            .find_product_by_name(name)
            .await?
            .ok_or_else(|| OrdersServiceError::UnresolvedItem {
                name: name.to_string(),
            })
    }
}
