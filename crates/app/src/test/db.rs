//! Database test utilities.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::OnceCell;

const PG_USER: &str = "aroma_test";
const PG_PASSWORD: &str = "aroma_test_password";

/// Shared PostgreSQL container that starts once and is reused across all tests.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(PG_USER)
        .with_password(PG_PASSWORD)
        .with_db_name("aroma_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// An isolated per-test database inside the shared container.
///
/// Isolation is database-level: every test gets a fresh database with the
/// schema applied, so service methods can commit normally and clean state
/// comes for free. Databases live until the container is torn down with the
/// test process.
#[derive(Debug, Clone)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
}

impl TestDb {
    /// Create an isolated test database with a unique generated name.
    pub async fn new() -> Self {
        let container = POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get container port");

        let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
            .unwrap_or_else(|_| "localhost".to_string());

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock before the epoch")
            .as_nanos();

        let thread_id = std::thread::current().id();

        let name = format!("aroma_test_{nanos}_{thread_id:?}").replace([':', ' ', '(', ')'], "");

        let base_url = format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/postgres");

        let mut conn = PgConnection::connect(&base_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let database_url = format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/{name}");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create pool for test database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to apply schema to test database");

        Self { pool, name }
    }

    /// Returns the connection pool for this test database.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_is_migrated_and_queryable() {
        let test_db = TestDb::new().await;

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM products")
            .fetch_one(test_db.pool())
            .await
            .expect("Failed to query products table");

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn each_test_db_is_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name, second.name);

        sqlx::query("INSERT INTO categories (uuid, name) VALUES (gen_random_uuid(), 'Citrus')")
            .execute(first.pool())
            .await
            .expect("Failed to insert category");

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM categories")
            .fetch_one(second.pool())
            .await
            .expect("Failed to count categories");

        assert_eq!(count, 0);
    }
}
