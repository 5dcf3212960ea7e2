//! Total Sales Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use aroma_app::domain::orders::models::SalesTotals;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Sales Totals Response
///
/// Amounts are in minor units. `profit` is sales minus shipping and tax and
/// can go negative.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SalesTotalsResponse {
    pub total_sales: u64,
    pub total_shipping: u64,
    pub total_tax: u64,
    pub profit: i64,
}

impl From<SalesTotals> for SalesTotalsResponse {
    fn from(totals: SalesTotals) -> Self {
        Self {
            total_sales: totals.total_sales,
            total_shipping: totals.total_shipping,
            total_tax: totals.total_tax,
            profit: totals.profit,
        }
    }
}

/// Total Sales Handler
#[endpoint(tags("orders"), summary = "Total Sales", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SalesTotalsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let totals = state
        .app
        .orders
        .sales_totals()
        .await
        .map_err(into_status_error)?;

    Ok(Json(totals.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::domain::orders::MockOrdersService;

    use crate::test_helpers::{TestApp, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_total_sales_reports_the_aggregate() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_sales_totals().once().return_once(|| {
            Ok(SalesTotals {
                total_sales: 37_00,
                total_shipping: 5_00,
                total_tax: 2_00,
                profit: 30_00,
            })
        });

        let mut res = TestClient::get("http://example.com/orders/total-sales")
            .send(&admin_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                Router::with_path("orders/total-sales").get(handler),
            ))
            .await;

        let body: SalesTotalsResponse = res.take_json().await?;

        assert_eq!(body.total_sales, 37_00);
        assert_eq!(body.profit, 30_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_orders_reads_as_zero_totals() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_sales_totals().once().return_once(|| {
            Ok(SalesTotals {
                total_sales: 0,
                total_shipping: 0,
                total_tax: 0,
                profit: 0,
            })
        });

        let mut res = TestClient::get("http://example.com/orders/total-sales")
            .send(&admin_service(
                TestApp {
                    orders,
                    ..TestApp::default()
                },
                Router::with_path("orders/total-sales").get(handler),
            ))
            .await;

        let body: SalesTotalsResponse = res.take_json().await?;

        assert_eq!(body.total_sales, 0);
        assert_eq!(body.profit, 0);

        Ok(())
    }
}
