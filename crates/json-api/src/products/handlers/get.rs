//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aroma_app::domain::products::models::Product;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub image: String,
    pub images: Vec<String>,
    /// Price in minor units
    pub price: u64,
    pub category_uuid: Uuid,
    pub count_in_stock: u8,
    pub rating: f64,
    pub num_reviews: u32,
    pub is_featured: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            description: product.description,
            brand: product.brand,
            image: product.image,
            images: product.images,
            price: product.price,
            category_uuid: product.category_uuid.into_uuid(),
            count_in_stock: product.count_in_stock,
            rating: product.rating,
            num_reviews: product.num_reviews,
            is_featured: product.is_featured,
        }
    }
}

/// Get Product Handler
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
