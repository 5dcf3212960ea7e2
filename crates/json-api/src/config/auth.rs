//! Auth Config

use clap::Args;

/// Token signing settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Shared secret for signing bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in seconds (three hours by default)
    #[arg(long, env = "TOKEN_TTL_SECONDS", default_value = "10800")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn to_app_config(&self) -> aroma_app::auth::AuthConfig {
        aroma_app::auth::AuthConfig {
            secret: self.jwt_secret.clone(),
            token_ttl_seconds: self.token_ttl_seconds,
        }
    }
}
