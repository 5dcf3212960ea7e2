//! Payment sessions.
//!
//! Checkout happens on the provider's hosted page. The service posts the
//! order lines to the provider and hands back the redirect URL; everything
//! after that arrives through the paid-order confirmation flow.

pub mod errors;
mod http;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

pub use errors::PaymentsError;
pub use http::{HttpPaymentsService, PaymentsConfig};

/// One line of a checkout, priced in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutItem {
    pub name: String,
    pub amount: u64,
    pub quantity: u32,
}

/// A created provider session, ready for redirect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Create a hosted checkout session for the given lines.
    async fn create_checkout_session(
        &self,
        items: Vec<CheckoutItem>,
    ) -> Result<CheckoutSession, PaymentsError>;
}
