//! Bearer token issuance and verification.

use jiff::Timestamp;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockall::automock;

use crate::auth::{AuthConfig, AuthServiceError, Claims, Identity, IssuedToken};

/// Signs and verifies the bearer tokens that front every protected route.
///
/// Tokens are self-contained: claims carry the user UUID and admin flag, so
/// verification needs no storage round-trip.
#[automock]
pub trait TokenAuth: Send + Sync {
    /// Issue a signed token for the given identity.
    fn issue_token(&self, identity: Identity) -> Result<IssuedToken, AuthServiceError>;

    /// Verify a bearer token and extract the identity it carries.
    fn verify_token(&self, token: &str) -> Result<Identity, AuthServiceError>;
}

#[derive(Clone)]
pub struct JwtTokenAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_seconds: u64,
}

impl std::fmt::Debug for JwtTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenAuth")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtTokenAuth {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_ttl_seconds: config.token_ttl_seconds,
        }
    }
}

impl TokenAuth for JwtTokenAuth {
    fn issue_token(&self, identity: Identity) -> Result<IssuedToken, AuthServiceError> {
        let now = Timestamp::now().as_second();

        let ttl = i64::try_from(self.token_ttl_seconds).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: identity.user_uuid.into_uuid(),
            is_admin: identity.is_admin,
            iat: now,
            exp: now.saturating_add(ttl),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthServiceError::Signing)?;

        Ok(IssuedToken {
            token,
            expires_in: self.token_ttl_seconds,
        })
    }

    fn verify_token(&self, token: &str) -> Result<Identity, AuthServiceError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AuthServiceError::InvalidToken)?;

        Ok(Identity {
            user_uuid: data.claims.sub.into(),
            is_admin: data.claims.is_admin,
        })
    }
}
