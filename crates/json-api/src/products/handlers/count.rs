//! Product Count Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Count Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductCountResponse {
    pub count: u64,
}

/// Product Count Handler
#[endpoint(
    tags("products"),
    summary = "Count Products",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductCountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let count = state
        .app
        .products
        .count_products()
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductCountResponse { count }))
}
