//! Auth data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::users::models::UserUuid;

/// Authenticated caller attached to a request after token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: UserUuid,
    pub is_admin: bool,
}

/// Bearer token issuance result.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,

    /// Token lifetime in seconds, matching the `exp` claim.
    pub expires_in: u64,
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// User UUID.
    pub sub: Uuid,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Signing settings for bearer tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to sign and verify tokens.
    pub secret: String,

    /// Token lifetime in seconds. The original deployment used 3 hours.
    pub token_ttl_seconds: u64,
}
