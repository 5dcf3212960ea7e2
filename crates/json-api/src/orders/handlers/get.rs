//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aroma_app::domain::orders::models::{Order, OrderItem, PaymentResult, ShippingAddress};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Shipping address as it appears on the wire, both directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressBody {
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub apartment: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
    pub phone_number: String,
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(shipping: ShippingAddress) -> Self {
        Self {
            address1: shipping.address1,
            address2: shipping.address2,
            apartment: shipping.apartment,
            city: shipping.city,
            postal_code: shipping.postal_code,
            state: shipping.state,
            country: shipping.country,
            phone_number: shipping.phone_number,
        }
    }
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            address1: body.address1,
            address2: body.address2,
            apartment: body.apartment,
            city: body.city,
            postal_code: body.postal_code,
            state: body.state,
            country: body.country,
            phone_number: body.phone_number,
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub qty: u8,
    /// Unit price in minor units, captured at placement time.
    pub price: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            qty: item.qty,
            price: item.price,
        }
    }
}

/// Payment Result Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResultResponse {
    pub provider_id: String,
    pub status: String,
    pub update_time: String,
    pub payer_email: String,
    pub currency: String,
}

impl From<PaymentResult> for PaymentResultResponse {
    fn from(result: PaymentResult) -> Self {
        Self {
            provider_id: result.provider_id,
            status: result.status,
            update_time: result.update_time,
            payer_email: result.payer_email,
            currency: result.currency,
        }
    }
}

/// Order Response
///
/// Prices are in minor units; timestamps are RFC 3339 strings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub shipping: ShippingAddressBody,
    pub payment_method: String,
    pub items_price: u64,
    pub shipping_price: u64,
    pub tax_price: u64,
    pub total_price: u64,
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub payment_result: Option<PaymentResultResponse>,
    pub is_delivered: bool,
    pub delivered_at: Option<String>,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            user_uuid: order.user_uuid.into_uuid(),
            items: order.items.into_iter().map(Into::into).collect(),
            shipping: order.shipping.into(),
            payment_method: order.payment_method,
            items_price: order.items_price,
            shipping_price: order.shipping_price,
            tax_price: order.tax_price,
            total_price: order.total_price,
            is_paid: order.is_paid,
            paid_at: order.paid_at.map(|at| at.to_string()),
            payment_result: order.payment_result.map(Into::into),
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Callers only see their own orders; admins see any. Someone else's order
/// answers 404 so order UUIDs don't leak.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let order = state
        .app
        .orders
        .get_order(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !identity.is_admin && order.user_uuid != identity.user_uuid {
        return Err(StatusError::not_found().brief("Order not found"));
    }

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::domain::orders::{
        MockOrdersService,
        models::{OrderUuid, PaymentResult},
    };
    use aroma_app::domain::users::models::UserUuid;

    use crate::test_helpers::{TEST_ADMIN, TEST_USER, TestApp, admin_service, make_order, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{uuid}").get(handler)
    }

    #[tokio::test]
    async fn test_owner_sees_their_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(make_order(uuid, TEST_USER.user_uuid)));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&user_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.total_price, 33_50);
        assert_eq!(body.items.len(), 1);
        assert!(!body.is_paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_someone_elses_order_reads_as_missing() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(make_order(uuid, UserUuid::new())));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&user_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_sees_any_order() -> TestResult {
        let uuid = OrderUuid::new();
        let owner = UserUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_get_order().once().return_once(move |_| {
            let mut order = make_order(uuid, owner);
            order.is_paid = true;
            order.paid_at = Some(jiff::Timestamp::UNIX_EPOCH);
            order.payment_result = Some(PaymentResult {
                provider_id: "pi_123".to_string(),
                status: "COMPLETED".to_string(),
                update_time: "2026-01-01T00:00:00Z".to_string(),
                payer_email: "payer@example.com".to_string(),
                currency: "CAD".to_string(),
            });
            Ok(order)
        });

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&admin_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.user_uuid, owner.into_uuid());
        assert_ne!(body.user_uuid, TEST_ADMIN.user_uuid.into_uuid());
        assert!(body.is_paid);
        assert_eq!(
            body.payment_result.map(|result| result.currency),
            Some("CAD".to_string())
        );

        Ok(())
    }
}
