//! Auth service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token is invalid or expired")]
    InvalidToken,

    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
