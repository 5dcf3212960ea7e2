//! Deliver Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// Deliver Order Handler
#[endpoint(tags("orders"), summary = "Deliver Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .mark_delivered(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
