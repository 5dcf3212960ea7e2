//! Order Handlers

pub(crate) mod count;
pub(crate) mod create;
pub(crate) mod deliver;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod my_orders;
pub(crate) mod pay;
pub(crate) mod total_sales;
pub(crate) mod user_orders;

pub(crate) use get::OrderResponse;
