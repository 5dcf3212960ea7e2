//! Order Models

use jiff::Timestamp;

use crate::{
    domain::{products::models::ProductUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// A requested line of a new order: which product, how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub qty: u8,
}

/// Shipping destination captured with the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub address1: String,
    pub address2: String,
    pub apartment: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
    pub phone_number: String,
}

/// New Order Model
///
/// `shipping_price` and `tax_price` arrive from the request in minor units.
/// The items total is computed from prices captured at placement time, never
/// taken from the request.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub lines: Vec<NewOrderLine>,
    pub shipping: ShippingAddress,
    pub payment_method: String,
    pub shipping_price: u64,
    pub tax_price: u64,
}

/// A persisted order line with the unit price captured at placement time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub qty: u8,
    pub price: u64,
}

/// Normalized payment provider confirmation stored on a paid order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    pub provider_id: String,
    pub status: String,
    pub update_time: String,
    pub payer_email: String,
    pub currency: String,
}

/// Raw provider callback payload fed into the paid transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer_email: String,
}

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingAddress,
    pub payment_method: String,
    pub items_price: u64,
    pub shipping_price: u64,
    pub tax_price: u64,
    pub total_price: u64,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One-pass aggregate over all orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesTotals {
    pub total_sales: u64,
    pub total_shipping: u64,
    pub total_tax: u64,
    pub profit: i64,
}
