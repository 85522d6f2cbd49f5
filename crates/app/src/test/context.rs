//! Test context for service-level tests against a real database.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use jiff::{Timestamp, ToSpan};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use milkrun::{
    contact::ContactInfo,
    coupons::{Coupon, DiscountKind},
    signature::GatewaySecret,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{
    auth::CustomerIdentity,
    database::Db,
    domain::{
        catalog::{CatalogProduct, ProductUuid},
        coupons::{CouponsRepository, StoreCouponsService},
        customers::{CustomerUuid, CustomersRepository, StoreCustomersService},
        orders::{
            StoreOrdersService,
            data::{Checkout, OrderSettings},
            records::OrderRecord,
        },
        payments::{GatewayAccess, StorePaymentsService},
    },
    gateway::{GatewayError, GatewayIntent, PaymentGateway},
    notifications::{Notifier, NotifyError},
    store::{PgStore, Store},
};

use super::db::TestDb;

/// Secret the test gateway signs receipts with.
pub(crate) const TEST_GATEWAY_SECRET: &str = "gateway_test_secret";

pub(crate) const CURRENCY: &str = "INR";

pub(crate) fn gateway_secret() -> GatewaySecret {
    GatewaySecret::new(TEST_GATEWAY_SECRET)
}

/// Gateway that hands out sequential ids and counts calls.
#[derive(Debug, Default)]
pub(crate) struct FakeGateway {
    calls: AtomicUsize,
}

impl FakeGateway {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(
        &self,
        amount_minor: u64,
        currency: &str,
        _receipt: &str,
    ) -> Result<GatewayIntent, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(GatewayIntent {
            id: format!("order_test_{call}"),
            amount_minor,
            currency: currency.to_string(),
        })
    }
}

/// Forwards every created order to a channel.
#[derive(Debug)]
pub(crate) struct RecordingNotifier {
    sender: UnboundedSender<OrderRecord>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn order_created(&self, order: &OrderRecord) -> Result<(), NotifyError> {
        let _sent = self.sender.send(order.clone());

        Ok(())
    }
}

/// Catalog seeded into every context.
#[derive(Debug, Clone)]
pub(crate) struct TestCatalog {
    /// 52.00, available.
    pub(crate) milk: CatalogProduct,

    /// 17.00, available.
    pub(crate) curd: CatalogProduct,

    /// 50.00, available.
    pub(crate) paneer: CatalogProduct,

    /// 120.00, unavailable.
    pub(crate) ghee: CatalogProduct,
}

impl TestCatalog {
    fn new() -> Self {
        let product = |name: &str, price: Decimal, is_available: bool| CatalogProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            price,
            is_available,
        };

        Self {
            milk: product("Full Cream Milk 1L", dec!(52), true),
            curd: product("Curd 400g", dec!(17), true),
            paneer: product("Paneer 200g", dec!(50), true),
            ghee: product("Ghee 500ml", dec!(120), false),
        }
    }
}

fn coupon(code: &str, kind: DiscountKind, value: Decimal) -> Coupon {
    let now = Timestamp::now();

    Coupon {
        code: code.to_string(),
        kind,
        value,
        min_order_amount: Decimal::ZERO,
        max_discount: None,
        valid_from: now - 720.hours(),
        valid_until: now + 720.hours(),
        usage_limit: None,
        used_count: 0,
        is_active: true,
        description: None,
    }
}

fn seeded_coupons() -> [Coupon; 6] {
    let mut welcome = coupon("WELCOME10", DiscountKind::Percentage, dec!(10));
    welcome.max_discount = Some(dec!(50));
    welcome.description = Some("10% off your first order".to_string());

    let mut save20 = coupon("SAVE20", DiscountKind::Fixed, dec!(20));
    save20.min_order_amount = dec!(100);

    let mut expired = coupon("EXPIRED", DiscountKind::Fixed, dec!(10));
    expired.valid_until = Timestamp::now() - 24.hours();

    let mut free_milk = coupon("FREEMILK", DiscountKind::Percentage, dec!(100));
    free_milk.min_order_amount = dec!(100);

    let all_free = coupon("ALLFREE", DiscountKind::Percentage, dec!(100));

    let mut one_shot = coupon("ONESHOT", DiscountKind::Fixed, dec!(5));
    one_shot.usage_limit = Some(1);

    [welcome, save20, expired, free_milk, all_free, one_shot]
}

/// Signed-in customer every context starts with. Distinct from the contact used in requests.
fn account_holder() -> ContactInfo {
    ContactInfo {
        name: "Ravi Kumar".to_string(),
        email: "ravi@example.com".to_string(),
        phone: "9123456780".to_string(),
    }
}

pub(crate) struct TestContext {
    pub(crate) db: TestDb,
    pub(crate) store: Arc<PgStore>,
    pub(crate) catalog: TestCatalog,
    pub(crate) account: CustomerIdentity,
    pub(crate) gateway: Arc<FakeGateway>,
    pub(crate) orders: Arc<StoreOrdersService>,
    pub(crate) payments: Arc<StorePaymentsService>,
    pub(crate) coupons: Arc<StoreCouponsService>,
    pub(crate) customers: Arc<StoreCustomersService>,
    pub(crate) notifications: UnboundedReceiver<OrderRecord>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let gateway = Arc::new(FakeGateway::default());

        Self::build(
            gateway.clone(),
            Some(GatewayAccess {
                client: gateway,
                secret: gateway_secret(),
            }),
        )
        .await
    }

    /// Context whose payments service has no gateway configured.
    pub(crate) async fn without_gateway() -> Self {
        Self::build(Arc::new(FakeGateway::default()), None).await
    }

    /// Context whose payments service talks to `client`.
    pub(crate) async fn with_gateway_client(client: Arc<dyn PaymentGateway>) -> Self {
        Self::build(
            Arc::new(FakeGateway::default()),
            Some(GatewayAccess {
                client,
                secret: gateway_secret(),
            }),
        )
        .await
    }

    async fn build(gateway: Arc<FakeGateway>, access: Option<GatewayAccess>) -> Self {
        let db = TestDb::new().await;
        let store = Arc::new(PgStore::new(Db::new(db.pool().clone())));
        let catalog = TestCatalog::new();

        for product in [&catalog.milk, &catalog.curd, &catalog.paneer, &catalog.ghee] {
            insert_product(&db, product).await;
        }

        for coupon in seeded_coupons() {
            insert_coupon(&db, &coupon).await;
        }

        let holder = store
            .upsert_customer(CustomerUuid::new(), &account_holder())
            .await
            .expect("Failed to create test customer");

        let (sender, notifications) = unbounded_channel();
        let shared: Arc<dyn Store> = store.clone();

        Self {
            orders: Arc::new(StoreOrdersService::new(
                shared.clone(),
                OrderSettings::default(),
                Arc::new(RecordingNotifier { sender }),
            )),
            payments: Arc::new(StorePaymentsService::new(shared.clone(), access, CURRENCY)),
            coupons: Arc::new(StoreCouponsService::new(shared.clone())),
            customers: Arc::new(StoreCustomersService::new(shared)),
            account: CustomerIdentity {
                uuid: holder.uuid,
                is_active: holder.is_active,
            },
            db,
            store,
            catalog,
            gateway,
            notifications,
        }
    }

    /// Checkout as the seeded signed-in customer.
    pub(crate) fn customer(&self) -> Checkout {
        Checkout::Authenticated(self.account)
    }

    /// Current state of a coupon.
    pub(crate) async fn coupon(&self, code: &str) -> Option<Coupon> {
        self.store
            .find_coupon(code)
            .await
            .expect("Failed to read coupon")
    }

    pub(crate) async fn order_count(&self) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM orders")
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count orders")
    }

    /// Activate or deactivate a customer. Returns `false` if the customer does not exist.
    pub(crate) async fn set_customer_active(&self, customer: CustomerUuid, is_active: bool) -> bool {
        sqlx::query("UPDATE customers SET is_active = $2 WHERE uuid = $1")
            .bind(customer.into_uuid())
            .bind(is_active)
            .execute(self.db.pool())
            .await
            .expect("Failed to update customer")
            .rows_affected()
            == 1
    }
}

pub(crate) async fn insert_product(db: &TestDb, product: &CatalogProduct) {
    sqlx::query("INSERT INTO products (uuid, name, price, is_available) VALUES ($1, $2, $3, $4)")
        .bind(product.uuid.into_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.is_available)
        .execute(db.pool())
        .await
        .expect("Failed to insert product");
}

pub(crate) async fn insert_coupon(db: &TestDb, coupon: &Coupon) {
    sqlx::query(
        "INSERT INTO coupons (code, kind, value, min_order_amount, max_discount, valid_from, \
         valid_until, usage_limit, used_count, is_active, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(&coupon.code)
    .bind(coupon.kind.as_str())
    .bind(coupon.value)
    .bind(coupon.min_order_amount)
    .bind(coupon.max_discount)
    .bind(SqlxTimestamp::from(coupon.valid_from))
    .bind(SqlxTimestamp::from(coupon.valid_until))
    .bind(coupon.usage_limit.map(|limit| i32::try_from(limit).expect("usage limit fits")))
    .bind(i32::try_from(coupon.used_count).expect("used count fits"))
    .bind(coupon.is_active)
    .bind(&coupon.description)
    .execute(db.pool())
    .await
    .expect("Failed to insert coupon");
}
