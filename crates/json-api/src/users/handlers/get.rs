//! Get User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aroma_app::domain::users::models::User;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// User Response
///
/// The password hash is never serialized.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Get User Handler
#[endpoint(tags("users"), summary = "Get User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .get_user(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
