//! Checkout Session Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use aroma_app::payments::{CheckoutItem, PaymentsError};

use crate::{extensions::*, state::State};

/// Checkout Item Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CheckoutItemRequest {
    pub name: String,
    /// Unit price in minor units.
    pub amount: u64,
    pub quantity: u32,
}

/// Checkout Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
}

/// Checkout Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutSessionResponse {
    /// Hosted payment page to redirect the customer to.
    pub url: String,
}

/// Checkout Session Handler
#[endpoint(
    tags("payments"),
    summary = "Create Checkout Session",
    status_codes(200, 400, 502),
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    body: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutSessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let items = body
        .into_inner()
        .items
        .into_iter()
        .map(|item| CheckoutItem {
            name: item.name,
            amount: item.amount,
            quantity: item.quantity,
        })
        .collect();

    let session = state
        .app
        .payments
        .create_checkout_session(items)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CheckoutSessionResponse { url: session.url }))
}

fn into_status_error(error: PaymentsError) -> StatusError {
    match error {
        PaymentsError::EmptyCheckout => {
            StatusError::bad_request().brief("Checkout requires at least one item")
        }
        PaymentsError::Provider { status } => {
            error!("payment provider rejected the session: {status}");

            StatusError::bad_gateway().brief("Payment provider rejected the session")
        }
        PaymentsError::Http(source) => {
            error!("payment provider request failed: {source}");

            StatusError::bad_gateway().brief("Payment provider unreachable")
        }
    }
}
