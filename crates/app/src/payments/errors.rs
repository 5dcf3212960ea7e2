//! Payments errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsError {
    #[error("checkout requires at least one item")]
    EmptyCheckout,

    #[error("payment provider request failed")]
    Http(#[from] reqwest::Error),

    #[error("payment provider rejected the session: {status}")]
    Provider { status: u16 },
}
