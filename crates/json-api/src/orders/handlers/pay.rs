//! Pay Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody, extract::PathParam},
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use aroma_app::domain::orders::models::PaymentConfirmation;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// Pay Order Request
///
/// The provider callback payload, as relayed by the storefront after
/// checkout completes.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PayOrderRequest {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer_email: String,
}

/// Pay Order Handler
#[endpoint(tags("orders"), summary = "Pay Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    body: JsonBody<PayOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let request = body.into_inner();
    let order_uuid = uuid.into_inner().into();

    // Ownership is checked before the transition so a caller can only pay
    // their own orders. Admins can settle any order.
    let existing = state
        .app
        .orders
        .get_order(order_uuid)
        .await
        .map_err(into_status_error)?;

    if !identity.is_admin && existing.user_uuid != identity.user_uuid {
        return Err(StatusError::not_found().brief("Order not found"));
    }

    let order = state
        .app
        .orders
        .mark_paid(
            order_uuid,
            PaymentConfirmation {
                id: request.id,
                status: request.status,
                update_time: request.update_time,
                payer_email: request.payer_email,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
