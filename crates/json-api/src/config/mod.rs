//! Server configuration module

use clap::Parser;

use crate::config::{
    auth::AuthConfig, db::DatabaseConfig, payments::PaymentsConfig, server::ServerRuntimeConfig,
    uploads::UploadsConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod uploads;

/// Aroma JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "aroma-json", about = "Aroma JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Token signing settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Image upload settings.
    #[command(flatten)]
    pub uploads: UploadsConfig,

    /// Hosted checkout settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

/// Logging settings.
#[derive(Debug, clap::Args)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
