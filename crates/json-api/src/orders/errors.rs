//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use aroma_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InsufficientStock { product } => {
            StatusError::conflict().brief(format!("Insufficient stock for product {product}"))
        }
        OrdersServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Order line quantity must be positive")
        }
        OrdersServiceError::EmptyOrder => {
            StatusError::bad_request().brief("Order must have at least one line")
        }
        OrdersServiceError::PriceOverflow => {
            StatusError::bad_request().brief("Order total exceeds the supported price range")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::InvalidNumber(source) => {
            error!("orders numeric conversion failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
