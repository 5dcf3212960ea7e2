//! HTTP payment provider client.

use async_trait::async_trait;
use serde::Serialize;

use crate::payments::{CheckoutItem, CheckoutSession, PaymentsError, PaymentsService};

/// Connection details for the hosted checkout provider.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Session-creation endpoint.
    pub endpoint: String,
    /// Bearer secret for the provider API.
    pub secret: String,
    /// Where the provider sends the customer after payment.
    pub success_url: String,
    /// Where the provider sends the customer on abandonment.
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    items: &'a [CheckoutItem],
    mode: &'static str,
    success_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpPaymentsService {
    client: reqwest::Client,
    config: PaymentsConfig,
}

impl HttpPaymentsService {
    #[must_use]
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    async fn create_checkout_session(
        &self,
        items: Vec<CheckoutItem>,
    ) -> Result<CheckoutSession, PaymentsError> {
        if items.is_empty() {
            return Err(PaymentsError::EmptyCheckout);
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.secret)
            .json(&SessionRequest {
                items: &items,
                mode: "payment",
                success_url: &self.config.success_url,
                cancel_url: &self.config.cancel_url,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PaymentsError::Provider {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
