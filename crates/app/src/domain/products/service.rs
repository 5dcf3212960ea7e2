//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{
            NewProduct, NewReview, Product, ProductFilter, ProductPage, ProductUpdate, ProductUuid,
        },
        repository::PgProductsRepository,
    },
};

/// Catalogue page size, matching the storefront's fixed page of ten.
const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<ProductPage, ProductsServiceError> {
        let page = filter.page.max(1);
        let offset = (page - 1).saturating_mul(PAGE_SIZE);

        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .list_products(&mut tx, &filter, PAGE_SIZE, offset)
            .await?;

        let count = self.repository.count_filtered(&mut tx, &filter).await?;

        tx.commit().await?;

        let pages = u32::try_from(count.div_ceil(u64::from(PAGE_SIZE)))?;

        Ok(ProductPage {
            products,
            page,
            pages,
        })
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn count_products(&self) -> Result<u64, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_products(&mut tx).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn featured_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.featured_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn add_review(
        &self,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<Product, ProductsServiceError> {
        if !(1..=5).contains(&review.rating) {
            return Err(ProductsServiceError::InvalidRating);
        }

        let mut tx = self.db.begin().await?;

        self.repository
            .create_review(&mut tx, product, &review)
            .await
            .map_err(|error| match ProductsServiceError::from(error) {
                // An unknown product surfaces as a foreign key violation.
                ProductsServiceError::InvalidReference => ProductsServiceError::NotFound,
                ProductsServiceError::AlreadyExists => ProductsServiceError::AlreadyReviewed,
                other => other,
            })?;

        let updated = self
            .repository
            .refresh_product_rating(&mut tx, product)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a page of the catalogue, optionally filtered by category and
    /// name keyword.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<ProductPage, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces a product's editable fields.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Count all products.
    async fn count_products(&self) -> Result<u64, ProductsServiceError>;

    /// Retrieve the featured products.
    async fn featured_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Record a review and return the product with refreshed rating fields.
    ///
    /// Each user may review a product once; a second attempt is
    /// `AlreadyReviewed`.
    async fn add_review(
        &self,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<Product, ProductsServiceError>;
}
