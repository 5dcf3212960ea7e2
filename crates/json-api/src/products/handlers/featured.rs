//! Featured Products Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Featured Products Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FeaturedProductsResponse {
    pub products: Vec<ProductResponse>,
}

/// Featured Products Handler
#[endpoint(tags("products"), summary = "Featured Products")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<FeaturedProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .featured_products()
        .await
        .map_err(into_status_error)?;

    Ok(Json(FeaturedProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
