//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthConfig, JwtTokenAuth, TokenAuth},
    database::{self, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
    payments::{HttpPaymentsService, PaymentsService},
    storage::{ImageStore, LocalDiskStore},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub categories: Arc<dyn CategoriesService>,
    pub users: Arc<dyn UsersService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn TokenAuth>,
    pub images: Arc<dyn ImageStore>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        auth: &AuthConfig,
        images: LocalDiskStore,
        payments: HttpPaymentsService,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db)),
            auth: Arc::new(JwtTokenAuth::new(auth)),
            images: Arc::new(images),
            payments: Arc::new(payments),
        })
    }
}
