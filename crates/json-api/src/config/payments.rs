//! Payments Config

use clap::Args;

use aroma_app::payments::HttpPaymentsService;

/// Hosted checkout settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment provider session endpoint
    #[arg(long, env = "PAYMENTS_ENDPOINT")]
    pub payments_endpoint: String,

    /// Payment provider API secret
    #[arg(long, env = "PAYMENTS_SECRET", hide_env_values = true)]
    pub payments_secret: String,

    /// Redirect target after a successful payment
    #[arg(long, env = "PAYMENTS_SUCCESS_URL")]
    pub payments_success_url: String,

    /// Redirect target after an abandoned payment
    #[arg(long, env = "PAYMENTS_CANCEL_URL")]
    pub payments_cancel_url: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn to_service(&self) -> HttpPaymentsService {
        HttpPaymentsService::new(aroma_app::payments::PaymentsConfig {
            endpoint: self.payments_endpoint.clone(),
            secret: self.payments_secret.clone(),
            success_url: self.payments_success_url.clone(),
            cancel_url: self.payments_cancel_url.clone(),
        })
    }
}
