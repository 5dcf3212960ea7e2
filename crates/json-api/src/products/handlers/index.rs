//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aroma_app::domain::products::models::ProductFilter;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Product Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductPageResponse {
    /// The page of products
    pub products: Vec<ProductResponse>,
    pub page: u32,
    pub pages: u32,
}

/// Product Index Handler
///
/// Returns a page of the catalogue. `categories` is a comma-separated list
/// of category UUIDs; `keyword` matches product names case-insensitively.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    categories: QueryParam<String, false>,
    keyword: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ProductPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = categories
        .into_inner()
        .unwrap_or_default()
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            Uuid::parse_str(part.trim())
                .map(Into::into)
                .map_err(|_ignored| StatusError::bad_request().brief("Invalid category UUID"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let filter = ProductFilter {
        categories,
        keyword: keyword.into_inner().filter(|keyword| !keyword.is_empty()),
        page: page.into_inner().unwrap_or(1),
    };

    let page = state
        .app
        .products
        .list_products(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductPageResponse {
        products: page.products.into_iter().map(Into::into).collect(),
        page: page.page,
        pages: page.pages,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::domain::products::{
        MockProductsService,
        models::{ProductPage, ProductUuid},
    };

    use crate::test_helpers::{TestApp, make_product, open_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        open_service(
            TestApp {
                products,
                ..TestApp::default()
            },
            Router::with_path("products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_page() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|filter| {
                filter.categories.is_empty() && filter.keyword.is_none() && filter.page == 1
            })
            .return_once(move |_| {
                Ok(ProductPage {
                    products: vec![make_product(uuid)],
                    page: 1,
                    pages: 1,
                })
            });

        let response: ProductPageResponse = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await
            .take_json()
            .await?;

        assert_eq!(response.products.len(), 1);
        assert_eq!(response.page, 1);
        assert_eq!(response.pages, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_passes_filters_through() -> TestResult {
        let category = Uuid::now_v7();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(move |filter| {
                filter.categories == vec![category.into()]
                    && filter.keyword.as_deref() == Some("cedar")
                    && filter.page == 2
            })
            .return_once(|_| {
                Ok(ProductPage {
                    products: vec![],
                    page: 2,
                    pages: 2,
                })
            });

        let res = TestClient::get(format!(
            "http://example.com/products?categories={category}&keyword=cedar&page=2"
        ))
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_bad_category_uuid() -> TestResult {
        let products = MockProductsService::new();

        let res = TestClient::get("http://example.com/products?categories=not-a-uuid")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
