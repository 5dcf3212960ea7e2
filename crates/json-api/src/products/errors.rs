//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use aroma_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::AlreadyReviewed => {
            StatusError::conflict().brief("Product already reviewed")
        }
        ProductsServiceError::InvalidRating => {
            StatusError::bad_request().brief("Rating must be between 1 and 5")
        }
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::Sql(source) => {
            error!("products storage error: {source}");

            StatusError::internal_server_error()
        }
        ProductsServiceError::InvalidNumber(source) => {
            error!("products numeric conversion failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
