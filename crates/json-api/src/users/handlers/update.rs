//! Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody, extract::PathParam},
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use aroma_app::domain::users::models::{Password, UserUpdate};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::UserResponse},
};

/// Update User Request
///
/// Absent fields are left unchanged. No `Debug` derive; the body may carry
/// a plaintext password.
#[derive(Deserialize, ToSchema)]
pub(crate) struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Update User Handler
///
/// Admin-only; this is the one place the admin flag can be changed over HTTP.
#[endpoint(tags("users"), summary = "Update User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    body: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = body.into_inner();

    let user = state
        .app
        .users
        .update_user(
            uuid.into_inner().into(),
            UserUpdate {
                name: request.name,
                email: request.email,
                password: request.password.map(Password::new),
                is_admin: request.is_admin,
            },
            true,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
