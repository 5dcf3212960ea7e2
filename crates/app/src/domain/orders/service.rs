//! Orders service.
//!
//! Order placement is the one multi-table write in the system: stock is
//! taken, prices are captured, and the order with its items is inserted, all
//! inside a single transaction. Any failure rolls the whole placement back.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{
            NewOrder, Order, OrderItem, OrderUuid, PaymentConfirmation, PaymentResult, SalesTotals,
        },
        repository::{OrderRow, PgOrdersRepository},
    },
    domain::products::models::ProductUuid,
    domain::users::models::UserUuid,
};

/// Every payment is recorded in the store currency.
const STORE_CURRENCY: &str = "CAD";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }

    /// Take stock for one line and capture the unit price.
    ///
    /// A zero-row decrement is disambiguated with an existence check so an
    /// unknown product and an out-of-stock product report differently.
    async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        qty: u8,
    ) -> Result<u64, OrdersServiceError> {
        if let Some(price) = self.repository.decrement_stock(tx, product, qty).await? {
            return Ok(price);
        }

        if self.repository.product_exists(tx, product).await? {
            Err(OrdersServiceError::InsufficientStock { product })
        } else {
            Err(OrdersServiceError::NotFound)
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = rows.iter().map(OrderRow::uuid).collect();

        let mut items: HashMap<OrderUuid, Vec<OrderItem>> = HashMap::new();

        for row in self
            .repository
            .list_order_items_for_orders(tx, &uuids)
            .await?
        {
            items.entry(row.order_uuid).or_default().push(row.item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.uuid()).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            user_uuid = %order.user_uuid,
            line_count = order.lines.len()
        ),
        err
    )]
    async fn place_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        if order.lines.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if order.lines.iter().any(|line| line.qty == 0) {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let mut items = Vec::with_capacity(order.lines.len());
        let mut items_price: u64 = 0;

        for line in &order.lines {
            let price = self.take_stock(&mut tx, line.product_uuid, line.qty).await?;

            let line_total = price
                .checked_mul(u64::from(line.qty))
                .ok_or(OrdersServiceError::PriceOverflow)?;

            items_price = items_price
                .checked_add(line_total)
                .ok_or(OrdersServiceError::PriceOverflow)?;

            items.push(OrderItem {
                uuid: line.uuid,
                product_uuid: line.product_uuid,
                qty: line.qty,
                price,
            });
        }

        let total_price = items_price
            .checked_add(order.shipping_price)
            .and_then(|subtotal| subtotal.checked_add(order.tax_price))
            .ok_or(OrdersServiceError::PriceOverflow)?;

        let row = self
            .repository
            .create_order(&mut tx, &order, items_price, total_price)
            .await?;

        for item in &items {
            self.repository
                .create_order_item(&mut tx, order.uuid, item)
                .await?;
        }

        tx.commit().await?;

        info!(total_price, "placed order");

        Ok(row.into_order(items))
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.get_order(&mut tx, order).await?;
        let items = self.repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(row.into_order(items))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_orders(&mut tx).await?;
        let orders = self.attach_items(&mut tx, rows).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_user_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_user_orders(&mut tx, user).await?;
        let orders = self.attach_items(&mut tx, rows).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.mark_paid",
        skip(self, confirmation),
        fields(order_uuid = %order),
        err
    )]
    async fn mark_paid(
        &self,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, OrdersServiceError> {
        let result = PaymentResult {
            provider_id: confirmation.id,
            status: confirmation.status,
            update_time: confirmation.update_time,
            payer_email: confirmation.payer_email,
            currency: STORE_CURRENCY.to_string(),
        };

        let mut tx = self.db.begin().await?;

        let row = self.repository.mark_paid(&mut tx, order, &result).await?;
        let items = self.repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(row.into_order(items))
    }

    #[tracing::instrument(
        name = "orders.service.mark_delivered",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn mark_delivered(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.mark_delivered(&mut tx, order).await?;
        let items = self.repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(row.into_order(items))
    }

    async fn count_orders(&self) -> Result<u64, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn sales_totals(&self) -> Result<SalesTotals, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let totals = self.repository.sales_totals(&mut tx).await?;

        tx.commit().await?;

        Ok(totals)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order: take stock per line, capture unit prices, compute the
    /// total and persist the order with its items, all in one transaction.
    ///
    /// Any line failing leaves no order and no stock change.
    async fn place_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve all orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve one user's orders, newest first.
    async fn list_user_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Record a payment confirmation: sets `is_paid`, stamps `paid_at` and
    /// stores the normalized payment result. Re-applying keeps the order
    /// paid; `paid_at` moves to the latest confirmation.
    async fn mark_paid(
        &self,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, OrdersServiceError>;

    /// Mark an order delivered, stamping `delivered_at`.
    async fn mark_delivered(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Count all orders.
    async fn count_orders(&self) -> Result<u64, OrdersServiceError>;

    /// Aggregate sales, shipping and tax over every order.
    async fn sales_totals(&self) -> Result<SalesTotals, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            orders::models::{NewOrderLine, OrderItemUuid, ShippingAddress},
            products::{models::ProductUuid, service::ProductsService},
        },
        test::TestContext,
    };

    use super::*;

    fn shipping_address() -> ShippingAddress {
        ShippingAddress {
            address1: "12 Rue des Lilas".to_string(),
            city: "Montreal".to_string(),
            postal_code: "H2X 1Y4".to_string(),
            state: "QC".to_string(),
            country: "Canada".to_string(),
            phone_number: "514-555-0101".to_string(),
            ..ShippingAddress::default()
        }
    }

    fn order_for(user: UserUuid, lines: Vec<(ProductUuid, u8)>) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: user,
            lines: lines
                .into_iter()
                .map(|(product_uuid, qty)| NewOrderLine {
                    uuid: OrderItemUuid::new(),
                    product_uuid,
                    qty,
                })
                .collect(),
            shipping: shipping_address(),
            payment_method: "card".to_string(),
            shipping_price: 2_50,
            tax_price: 1_00,
        }
    }

    fn confirmation() -> PaymentConfirmation {
        PaymentConfirmation {
            id: "pay_123".to_string(),
            status: "COMPLETED".to_string(),
            update_time: "2024-06-01T12:00:00Z".to_string(),
            payer_email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn place_order_computes_total_and_decrements_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 5).await;
        let alice = ctx.create_user("alice@example.com").await;

        let order = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 3)]))
            .await?;

        assert_eq!(order.items_price, 30_00);
        assert_eq!(order.total_price, 33_50);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, 10_00);
        assert_eq!(order.items[0].qty, 3);
        assert!(!order.is_paid);
        assert!(!order.is_delivered);

        let remaining = ctx.products.get_product(product).await?;
        assert_eq!(remaining.count_in_stock, 2);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_insufficient_stock_leaves_no_trace() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 2).await;
        let alice = ctx.create_user("alice@example.com").await;

        let result = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 5)]))
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InsufficientStock { product: p }) if p == product
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let untouched = ctx.products.get_product(product).await?;
        assert_eq!(untouched.count_in_stock, 2);
        assert_eq!(ctx.orders.count_orders().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_failing_line_rolls_back_earlier_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let plentiful = ctx.create_product(category, 10_00, 10).await;
        let scarce = ctx.create_product(category, 20_00, 1).await;
        let alice = ctx.create_user("alice@example.com").await;

        let result = ctx
            .orders
            .place_order(order_for(alice, vec![(plentiful, 4), (scarce, 3)]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        // The first line's decrement must not survive the rollback.
        assert_eq!(ctx.products.get_product(plentiful).await?.count_in_stock, 10);
        assert_eq!(ctx.products.get_product(scarce).await?.count_in_stock, 1);
        assert_eq!(ctx.orders.count_orders().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("alice@example.com").await;

        let result = ctx
            .orders
            .place_order(order_for(alice, vec![(ProductUuid::new(), 1)]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn place_order_zero_quantity_is_rejected() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("alice@example.com").await;

        let result = ctx
            .orders
            .place_order(order_for(alice, vec![(ProductUuid::new(), 0)]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn place_order_without_lines_is_rejected() {
        let ctx = TestContext::new().await;
        let alice = ctx.create_user("alice@example.com").await;

        let result = ctx.orders.place_order(order_for(alice, vec![])).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyOrder)),
            "expected EmptyOrder, got {result:?}"
        );
    }

    #[tokio::test]
    async fn order_items_keep_the_price_captured_at_placement() -> TestResult {
        use crate::domain::products::models::ProductUpdate;

        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 5).await;
        let alice = ctx.create_user("alice@example.com").await;

        let order = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;

        let current = ctx.products.get_product(product).await?;
        ctx.products
            .update_product(
                product,
                ProductUpdate {
                    name: current.name,
                    description: current.description,
                    brand: current.brand,
                    image: current.image,
                    images: current.images,
                    price: 99_00,
                    category_uuid: current.category_uuid,
                    count_in_stock: current.count_in_stock,
                    is_featured: current.is_featured,
                },
            )
            .await?;

        let reloaded = ctx.orders.get_order(order.uuid).await?;
        assert_eq!(reloaded.items[0].price, 10_00);
        assert_eq!(reloaded.total_price, order.total_price);

        Ok(())
    }

    #[tokio::test]
    async fn mark_paid_records_the_confirmation() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 5).await;
        let alice = ctx.create_user("alice@example.com").await;

        let order = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;

        let paid = ctx.orders.mark_paid(order.uuid, confirmation()).await?;

        assert!(paid.is_paid);
        assert!(paid.paid_at.is_some());

        let result = paid.payment_result.ok_or("missing payment result")?;
        assert_eq!(result.provider_id, "pay_123");
        assert_eq!(result.status, "COMPLETED");
        assert_eq!(result.currency, "CAD");

        Ok(())
    }

    #[tokio::test]
    async fn mark_paid_twice_stays_paid_and_advances_paid_at() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 5).await;
        let alice = ctx.create_user("alice@example.com").await;

        let order = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;

        let first = ctx.orders.mark_paid(order.uuid, confirmation()).await?;
        let second = ctx.orders.mark_paid(order.uuid, confirmation()).await?;

        assert!(second.is_paid);

        let first_paid_at = first.paid_at.ok_or("missing paid_at")?;
        let second_paid_at = second.paid_at.ok_or("missing paid_at")?;
        assert!(second_paid_at >= first_paid_at);

        Ok(())
    }

    #[tokio::test]
    async fn mark_paid_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.mark_paid(OrderUuid::new(), confirmation()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn mark_delivered_stamps_delivered_at() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 5).await;
        let alice = ctx.create_user("alice@example.com").await;

        let order = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;

        let delivered = ctx.orders.mark_delivered(order.uuid).await?;

        assert!(delivered.is_delivered);
        assert!(delivered.delivered_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn list_user_orders_returns_only_that_users_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 20).await;
        let alice = ctx.create_user("alice@example.com").await;
        let bob = ctx.create_user("bob@example.com").await;

        let first = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;
        let second = ctx
            .orders
            .place_order(order_for(alice, vec![(product, 2)]))
            .await?;
        ctx.orders
            .place_order(order_for(bob, vec![(product, 1)]))
            .await?;

        let orders = ctx.orders.list_user_orders(alice).await?;

        assert_eq!(orders.len(), 2);
        // Newest first.
        assert_eq!(orders[0].uuid, second.uuid);
        assert_eq!(orders[1].uuid, first.uuid);
        assert!(orders.iter().all(|order| order.user_uuid == alice));
        assert_eq!(orders[1].items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn sales_totals_on_empty_store_is_all_zero() -> TestResult {
        let ctx = TestContext::new().await;

        let totals = ctx.orders.sales_totals().await?;

        assert_eq!(
            totals,
            SalesTotals {
                total_sales: 0,
                total_shipping: 0,
                total_tax: 0,
                profit: 0,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn sales_totals_sums_every_order() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Citrus").await;
        let product = ctx.create_product(category, 10_00, 20).await;
        let alice = ctx.create_user("alice@example.com").await;

        // 10_00 + 2_50 + 1_00 and 20_00 + 2_50 + 1_00.
        ctx.orders
            .place_order(order_for(alice, vec![(product, 1)]))
            .await?;
        ctx.orders
            .place_order(order_for(alice, vec![(product, 2)]))
            .await?;

        let totals = ctx.orders.sales_totals().await?;

        assert_eq!(totals.total_sales, 37_00);
        assert_eq!(totals.total_shipping, 5_00);
        assert_eq!(totals.total_tax, 2_00);
        assert_eq!(totals.profit, 30_00);

        Ok(())
    }
}
