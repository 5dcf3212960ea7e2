//! Product Models

use jiff::Timestamp;

use crate::{
    domain::{categories::models::CategoryUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
///
/// Prices are integer minor units (cents). `rating` and `num_reviews` are
/// derived from the product's reviews and recomputed whenever one is added.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub image: String,
    pub images: Vec<String>,
    pub price: u64,
    pub category_uuid: CategoryUuid,
    pub count_in_stock: u8,
    pub rating: f64,
    pub num_reviews: u32,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub image: String,
    pub images: Vec<String>,
    pub price: u64,
    pub category_uuid: CategoryUuid,
    pub count_in_stock: u8,
    pub is_featured: bool,
}

/// Product Update Model
///
/// A full replacement of the editable fields; rating and review counts stay
/// derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub image: String,
    pub images: Vec<String>,
    pub price: u64,
    pub category_uuid: CategoryUuid,
    pub count_in_stock: u8,
    pub is_featured: bool,
}

/// Catalogue listing filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Restrict to these categories; empty means all.
    pub categories: Vec<CategoryUuid>,

    /// Case-insensitive substring match on the product name.
    pub keyword: Option<String>,

    /// 1-based page number; zero is treated as the first page.
    pub page: u32,
}

/// A page of the catalogue listing.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub pages: u32,
}

/// Review UUID
pub type ReviewUuid = TypedUuid<NewReview>;

/// New Review Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub user_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
}
