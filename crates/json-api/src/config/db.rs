//! Database Config

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum connections held by the pool
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "10")]
    pub max_connections: u32,
}
