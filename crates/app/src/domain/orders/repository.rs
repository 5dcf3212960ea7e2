//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    orders::models::{
        NewOrder, Order, OrderItem, OrderItemUuid, OrderUuid, PaymentResult, SalesTotals,
        ShippingAddress,
    },
    products::models::ProductUuid,
    users::models::UserUuid,
};

const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const PRODUCT_EXISTS_SQL: &str = include_str!("sql/product_exists.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const LIST_ORDER_ITEMS_FOR_ORDERS_SQL: &str = include_str!("sql/list_order_items_for_orders.sql");
const MARK_PAID_SQL: &str = include_str!("sql/mark_paid.sql");
const MARK_DELIVERED_SQL: &str = include_str!("sql/mark_delivered.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const SALES_TOTALS_SQL: &str = include_str!("sql/sales_totals.sql");

/// An `orders` row before its items are attached.
#[derive(Debug, Clone)]
pub(crate) struct OrderRow {
    order: Order,
}

impl OrderRow {
    pub(crate) fn uuid(&self) -> OrderUuid {
        self.order.uuid
    }

    pub(crate) fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            items,
            ..self.order
        }
    }
}

/// An `order_items` row, keyed by the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub(crate) order_uuid: OrderUuid,
    pub(crate) item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Atomically take `qty` units of stock, returning the current unit price
    /// when enough stock was available and `None` otherwise.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        qty: u8,
    ) -> Result<Option<u64>, sqlx::Error> {
        let price: Option<i64> = query_scalar(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i16::from(qty))
            .fetch_optional(&mut **tx)
            .await?;

        price.map(try_into_price).transpose()
    }

    pub(crate) async fn product_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(PRODUCT_EXISTS_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        items_price: u64,
        total_price: u64,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(&order.shipping.address1)
            .bind(&order.shipping.address2)
            .bind(&order.shipping.apartment)
            .bind(&order.shipping.city)
            .bind(&order.shipping.postal_code)
            .bind(&order.shipping.state)
            .bind(&order.shipping.country)
            .bind(&order.shipping.phone_number)
            .bind(&order.payment_method)
            .bind(try_into_db_price(items_price)?)
            .bind(try_into_db_price(order.shipping_price)?)
            .bind(try_into_db_price(order.tax_price)?)
            .bind(try_into_db_price(total_price)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &OrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(i16::from(item.qty))
            .bind(try_into_db_price(item.price)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.item).collect())
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRow>, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_order_items_for_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_FOR_ORDERS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        result: &PaymentResult,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(MARK_PAID_SQL)
            .bind(order.into_uuid())
            .bind(&result.provider_id)
            .bind(&result.status)
            .bind(&result.update_time)
            .bind(&result.payer_email)
            .bind(&result.currency)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_delivered(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(MARK_DELIVERED_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL).fetch_one(&mut **tx).await?;

        try_into_count(count)
    }

    pub(crate) async fn sales_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<SalesTotals, sqlx::Error> {
        let row = query(SALES_TOTALS_SQL).fetch_one(&mut **tx).await?;

        let total_sales = try_into_price(row.try_get("total_sales")?)?;
        let total_shipping = try_into_price(row.try_get("total_shipping")?)?;
        let total_tax = try_into_price(row.try_get("total_tax")?)?;

        let overhead = i64::try_from(total_shipping + total_tax).map_err(decode_error("profit"))?;
        let sales = i64::try_from(total_sales).map_err(decode_error("profit"))?;

        Ok(SalesTotals {
            total_sales,
            total_shipping,
            total_tax,
            profit: sales - overhead,
        })
    }
}

fn decode_error(
    index: &'static str,
) -> impl FnOnce(std::num::TryFromIntError) -> sqlx::Error {
    move |e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    }
}

fn try_into_price(price: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(price).map_err(decode_error("price"))
}

fn try_into_db_price(price: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(price).map_err(decode_error("price"))
}

fn try_into_count(count: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(count).map_err(decode_error("count"))
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_result = row
            .try_get::<Option<String>, _>("payment_id")?
            .map(|provider_id| -> sqlx::Result<PaymentResult> {
                sqlx::Result::Ok(PaymentResult {
                    provider_id,
                    status: row
                        .try_get::<Option<String>, _>("payment_status")?
                        .unwrap_or_default(),
                    update_time: row
                        .try_get::<Option<String>, _>("payment_update_time")?
                        .unwrap_or_default(),
                    payer_email: row
                        .try_get::<Option<String>, _>("payment_payer_email")?
                        .unwrap_or_default(),
                    currency: row
                        .try_get::<Option<String>, _>("payment_currency")?
                        .unwrap_or_default(),
                })
            })
            .transpose()?;

        let order = Order {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            shipping: ShippingAddress {
                address1: row.try_get("address1")?,
                address2: row.try_get("address2")?,
                apartment: row.try_get("apartment")?,
                city: row.try_get("city")?,
                postal_code: row.try_get("postal_code")?,
                state: row.try_get("state")?,
                country: row.try_get("country")?,
                phone_number: row.try_get("phone_number")?,
            },
            payment_method: row.try_get("payment_method")?,
            items_price: try_into_price(row.try_get("items_price")?)?,
            shipping_price: try_into_price(row.try_get("shipping_price")?)?,
            tax_price: try_into_price(row.try_get("tax_price")?)?,
            total_price: try_into_price(row.try_get("total_price")?)?,
            is_paid: row.try_get("is_paid")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            payment_result,
            is_delivered: row.try_get("is_delivered")?,
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        };

        Ok(Self { order })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let qty_i16: i16 = row.try_get("qty")?;

        let qty = u8::try_from(qty_i16).map_err(decode_error("qty"))?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                qty,
                price: try_into_price(row.try_get("price")?)?,
            },
        })
    }
}
