//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::{StatusCode, header::LOCATION},
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use aroma_app::domain::orders::models::{NewOrder, NewOrderLine, OrderItemUuid, OrderUuid};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        handlers::{OrderResponse, get::ShippingAddressBody},
    },
    state::State,
};

/// Order Line Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct OrderLineRequest {
    pub product_uuid: Uuid,
    pub qty: u8,
}

/// Create Order Request
///
/// Item prices and the order total are intentionally absent: both are
/// captured server-side at placement time.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub order_items: Vec<OrderLineRequest>,
    pub shipping: ShippingAddressBody,
    pub payment_method: String,
    /// Shipping charge in minor units.
    pub shipping_price: u64,
    /// Tax in minor units.
    pub tax_price: u64,
}

/// Place Order Handler
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    status_codes(201, 400, 404, 409),
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    body: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let request = body.into_inner();

    let order = state
        .app
        .orders
        .place_order(NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: identity.user_uuid,
            lines: request
                .order_items
                .into_iter()
                .map(|line| NewOrderLine {
                    uuid: OrderItemUuid::new(),
                    product_uuid: line.product_uuid.into(),
                    qty: line.qty,
                })
                .collect(),
            shipping: request.shipping.into(),
            payment_method: request.payment_method,
            shipping_price: request.shipping_price,
            tax_price: request.tax_price,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::domain::orders::{MockOrdersService, errors::OrdersServiceError};
    use aroma_app::domain::products::models::ProductUuid;

    use crate::test_helpers::{TEST_USER, TestApp, make_order, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders").post(handler)
    }

    fn request_body(product: ProductUuid, qty: u8) -> serde_json::Value {
        serde_json::json!({
            "order_items": [{ "product_uuid": product.into_uuid(), "qty": qty }],
            "shipping": {
                "address1": "12 Rue des Lilas",
                "city": "Montreal",
                "postal_code": "H2X 1Y4",
                "state": "QC",
                "country": "Canada",
                "phone_number": "514-555-0101",
            },
            "payment_method": "card",
            "shipping_price": 2_50,
            "tax_price": 1_00,
        })
    }

    #[tokio::test]
    async fn test_order_is_placed_for_the_caller() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(move |order| {
                order.user_uuid == TEST_USER.user_uuid
                    && order.lines.len() == 1
                    && order.lines[0].product_uuid == product
                    && order.lines[0].qty == 3
                    && order.shipping_price == 2_50
            })
            .return_once(|order| Ok(make_order(order.uuid, order.user_uuid)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&request_body(product, 3))
            .send(&user_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(location, format!("/orders/{}", body.uuid));
        assert_eq!(body.user_uuid, TEST_USER.user_uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_stock_is_a_conflict() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(move |_| Err(OrdersServiceError::InsufficientStock { product }));

        let res = TestClient::post("http://example.com/orders")
            .json(&request_body(product, 99))
            .send(&user_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::EmptyOrder));

        let res = TestClient::post("http://example.com/orders")
            .json(&serde_json::json!({
                "order_items": [],
                "shipping": {
                    "address1": "12 Rue des Lilas",
                    "city": "Montreal",
                    "postal_code": "H2X 1Y4",
                    "state": "QC",
                    "country": "Canada",
                    "phone_number": "514-555-0101",
                },
                "payment_method": "card",
                "shipping_price": 0,
                "tax_price": 0,
            }))
            .send(&user_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
