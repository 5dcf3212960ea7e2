//! Product Review Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aroma_app::domain::products::models::{NewReview, ReviewUuid};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    /// Rating from 1 to 5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Create Review Handler
///
/// Records the caller's review and returns the product with its refreshed
/// rating fields.
#[endpoint(
    tags("products"),
    summary = "Review Product",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let request = json.into_inner();

    let product = state
        .app
        .products
        .add_review(
            uuid.into_inner().into(),
            NewReview {
                uuid: ReviewUuid::new(),
                user_uuid: identity.user_uuid,
                rating: request.rating,
                comment: request.comment,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
