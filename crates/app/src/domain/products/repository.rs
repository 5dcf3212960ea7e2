//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    categories::models::CategoryUuid,
    products::models::{NewProduct, NewReview, Product, ProductFilter, ProductUpdate, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_FILTERED_SQL: &str = include_str!("sql/count_products_filtered.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const FEATURED_PRODUCTS_SQL: &str = include_str!("sql/featured_products.sql");
const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const REFRESH_RATING_SQL: &str = include_str!("sql/refresh_product_rating.sql");

/// Escapes `ILIKE` metacharacters so a keyword matches them literally.
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let categories: Vec<Uuid> = filter
            .categories
            .iter()
            .copied()
            .map(CategoryUuid::into_uuid)
            .collect();

        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(categories)
            .bind(filter.keyword.as_deref().map(escape_like))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_filtered(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<u64, sqlx::Error> {
        let categories: Vec<Uuid> = filter
            .categories
            .iter()
            .copied()
            .map(CategoryUuid::into_uuid)
            .collect();

        let count: i64 = query_scalar(COUNT_FILTERED_SQL)
            .bind(categories)
            .bind(filter.keyword.as_deref().map(escape_like))
            .fetch_one(&mut **tx)
            .await?;

        try_into_count(count)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.brand)
            .bind(&product.image)
            .bind(&product.images)
            .bind(try_into_price(product.price)?)
            .bind(product.category_uuid.into_uuid())
            .bind(i16::from(product.count_in_stock))
            .bind(product.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&update.name)
            .bind(&update.description)
            .bind(&update.brand)
            .bind(&update.image)
            .bind(&update.images)
            .bind(try_into_price(update.price)?)
            .bind(update.category_uuid.into_uuid())
            .bind(i16::from(update.count_in_stock))
            .bind(update.is_featured)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .fetch_one(&mut **tx)
            .await?;

        try_into_count(count)
    }

    pub(crate) async fn featured_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(FEATURED_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        review: &NewReview,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(review.user_uuid.into_uuid())
            .bind(i16::from(review.rating))
            .bind(&review.comment)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Recompute the derived rating and review count from the reviews table.
    pub(crate) async fn refresh_product_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(REFRESH_RATING_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_into_price(price: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(price).map_err(|e| sqlx::Error::ColumnDecode {
        index: "price".to_string(),
        source: Box::new(e),
    })
}

fn try_into_count(count: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: "count".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        let stock_i16: i16 = row.try_get("count_in_stock")?;

        let count_in_stock = u8::try_from(stock_i16).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count_in_stock".to_string(),
            source: Box::new(e),
        })?;

        let num_reviews_i32: i32 = row.try_get("num_reviews")?;

        let num_reviews = u32::try_from(num_reviews_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "num_reviews".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            brand: row.try_get("brand")?,
            image: row.try_get("image")?,
            images: row.try_get("images")?,
            price,
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            count_in_stock,
            rating: row.try_get("rating")?,
            num_reviews,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
