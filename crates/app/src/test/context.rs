//! Test context for service-level integration tests.

use crate::{
    database::Db,
    domain::{
        categories::{
            CategoriesService, PgCategoriesService,
            models::{CategoryUuid, NewCategory},
        },
        orders::PgOrdersService,
        products::{
            PgProductsService, ProductsService,
            models::{NewProduct, ProductUuid},
        },
        users::{
            PgUsersService, UsersService,
            models::{NewUser, Password, UserUuid},
        },
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub products: PgProductsService,
    pub categories: PgCategoriesService,
    pub users: PgUsersService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            products: PgProductsService::new(db.clone()),
            categories: PgCategoriesService::new(db.clone()),
            users: PgUsersService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }

    pub async fn create_category(&self, name: &str) -> CategoryUuid {
        let uuid = CategoryUuid::new();

        self.categories
            .create_category(NewCategory {
                uuid,
                name: name.to_string(),
            })
            .await
            .expect("Failed to create test category");

        uuid
    }

    pub async fn create_product(
        &self,
        category: CategoryUuid,
        price: u64,
        count_in_stock: u8,
    ) -> ProductUuid {
        self.create_named_product(category, "Cedar Noir", price, count_in_stock)
            .await
    }

    pub async fn create_named_product(
        &self,
        category: CategoryUuid,
        name: &str,
        price: u64,
        count_in_stock: u8,
    ) -> ProductUuid {
        let uuid = ProductUuid::new();

        self.products
            .create_product(NewProduct {
                uuid,
                name: name.to_string(),
                description: "A test fragrance".to_string(),
                brand: "Atelier".to_string(),
                image: String::new(),
                images: vec![],
                price,
                category_uuid: category,
                count_in_stock,
                is_featured: false,
            })
            .await
            .expect("Failed to create test product");

        uuid
    }

    pub async fn create_user(&self, email: &str) -> UserUuid {
        let uuid = UserUuid::new();

        self.users
            .register(NewUser {
                uuid,
                name: "Test User".to_string(),
                email: email.to_string(),
                password: Password::new("hunter2!".to_string()),
                is_admin: false,
            })
            .await
            .expect("Failed to create test user");

        uuid
    }
}
