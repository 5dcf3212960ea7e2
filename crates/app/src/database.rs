//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions, raw_sql};

const SCHEMA_SQL: &str = include_str!("../migrations/schema.sql");

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction on the shared pool.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL` with a bounded pool.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the schema to an empty database.
///
/// Statements are idempotent (`CREATE TABLE IF NOT EXISTS`) so re-running
/// against an already-migrated database is a no-op.
///
/// # Errors
///
/// Returns an error if any schema statement fails.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    raw_sql(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}
