//! User Handlers

use salvo::{
    http::cookie::{Cookie, time::Duration},
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use aroma_app::{auth::IssuedToken, domain::users::models::User};

use crate::auth::middleware::TOKEN_COOKIE;

pub(crate) mod count;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod profile;
pub(crate) mod register;
pub(crate) mod update;

pub(crate) use get::UserResponse;

/// Body returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(user: User, issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_in: issued.expires_in,
            user: user.into(),
        }
    }
}

/// Attach the token as an HTTP-only cookie alongside the JSON body, with a
/// max-age matching the token lifetime.
fn set_token_cookie(res: &mut Response, issued: &IssuedToken) {
    let max_age = i64::try_from(issued.expires_in).unwrap_or(i64::MAX);

    res.add_cookie(
        Cookie::build((TOKEN_COOKIE, issued.token.clone()))
            .path("/")
            .http_only(true)
            .max_age(Duration::seconds(max_age))
            .build(),
    );
}
