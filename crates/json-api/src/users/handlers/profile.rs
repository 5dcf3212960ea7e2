//! Profile Handlers
//!
//! The caller's own account, addressed by the identity on the request rather
//! than a path parameter.

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use aroma_app::domain::users::models::{Password, UserUpdate};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::UserResponse},
};

/// Get Profile Handler
#[endpoint(tags("users"), summary = "Get Profile", security(("bearer_auth" = [])))]
pub(crate) async fn get_handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let user = state
        .app
        .users
        .get_user(identity.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

/// Update Profile Request
///
/// Absent fields are left unchanged. No `Debug` derive; the body may carry
/// a plaintext password.
#[derive(Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Update Profile Handler
///
/// There is no `is_admin` field here; the admin flag can only change through
/// the admin user-management endpoint.
#[endpoint(tags("users"), summary = "Update Profile", security(("bearer_auth" = [])))]
pub(crate) async fn update_handler(
    body: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let request = body.into_inner();

    let user = state
        .app
        .users
        .update_user(
            identity.user_uuid,
            UserUpdate {
                name: request.name,
                email: request.email,
                password: request.password.map(Password::new),
                is_admin: None,
            },
            false,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
