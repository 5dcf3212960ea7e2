//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Delete User Handler
///
/// Admin accounts cannot be deleted; demote them first.
#[endpoint(
    tags("users"),
    summary = "Delete User",
    status_codes(204, 403, 404),
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .delete_user(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use aroma_app::domain::users::{MockUsersService, errors::UsersServiceError, models::UserUuid};

    use crate::test_helpers::{TestApp, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_delete_user() -> TestResult {
        let uuid = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/users/{uuid}"))
            .send(&admin_service(
                TestApp {
                    users,
                    ..TestApp::default()
                },
                Router::with_path("users/{uuid}").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_an_admin_is_forbidden() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .return_once(|_| Err(UsersServiceError::AdminUndeletable));

        let res = TestClient::delete(format!("http://example.com/users/{}", UserUuid::new()))
            .send(&admin_service(
                TestApp {
                    users,
                    ..TestApp::default()
                },
                Router::with_path("users/{uuid}").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
