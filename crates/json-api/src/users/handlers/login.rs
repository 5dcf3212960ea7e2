//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use aroma_app::{auth::Identity, domain::users::models::Password};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::AuthResponse, handlers::set_token_cookie},
};

/// Login Request
///
/// No `Debug` derive; the body carries a plaintext password.
#[derive(Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login Handler
#[endpoint(tags("users"), summary = "Login", status_codes(200, 401, 404))]
pub(crate) async fn handler(
    body: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = body.into_inner();

    let user = state
        .app
        .users
        .login(&request.email, Password::new(request.password))
        .await
        .map_err(into_status_error)?;

    let issued = state
        .app
        .auth
        .issue_token(Identity {
            user_uuid: user.uuid,
            is_admin: user.is_admin,
        })
        .or_500("issuing token at login")?;

    set_token_cookie(res, &issued);

    Ok(Json(AuthResponse::new(user, issued)))
}
