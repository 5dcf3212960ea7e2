//! Register Handler

use std::sync::Arc;

use salvo::{
    http::StatusCode,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use aroma_app::{
    auth::Identity,
    domain::users::models::{NewUser, Password, UserUuid},
};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::AuthResponse, handlers::set_token_cookie},
};

/// Register Request
///
/// No `Debug` derive; the body carries a plaintext password.
#[derive(Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register Handler
///
/// Creates a regular account. Admin accounts are only created through the
/// CLI or by an existing admin editing a user.
#[endpoint(tags("users"), summary = "Register", status_codes(201, 400, 409))]
pub(crate) async fn handler(
    body: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = body.into_inner();

    let user = state
        .app
        .users
        .register(NewUser {
            uuid: UserUuid::new(),
            name: request.name,
            email: request.email,
            password: Password::new(request.password),
            is_admin: false,
        })
        .await
        .map_err(into_status_error)?;

    let issued = state
        .app
        .auth
        .issue_token(Identity {
            user_uuid: user.uuid,
            is_admin: user.is_admin,
        })
        .or_500("issuing token after registration")?;

    set_token_cookie(res, &issued);
    res.status_code(StatusCode::CREATED);

    Ok(Json(AuthResponse::new(user, issued)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::{
        auth::{IssuedToken, MockTokenAuth},
        domain::users::{MockUsersService, errors::UsersServiceError},
    };

    use crate::test_helpers::{TestApp, make_user, open_service};

    use super::*;

    fn issued() -> IssuedToken {
        IssuedToken {
            token: "signed.jwt.token".to_string(),
            expires_in: 10_800,
        }
    }

    #[tokio::test]
    async fn test_register_creates_a_non_admin_and_sets_the_cookie() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .withf(|new| new.email == "bob@example.com" && !new.is_admin)
            .return_once(|new| {
                let mut user = make_user(new.uuid);
                user.email = new.email;
                user.name = new.name;
                Ok(user)
            });

        let mut auth = MockTokenAuth::new();

        auth.expect_issue_token()
            .once()
            .withf(|identity| !identity.is_admin)
            .return_once(|_| Ok(issued()));

        let mut res = TestClient::post("http://example.com/users/register")
            .json(&serde_json::json!({
                "name": "Bob",
                "email": "bob@example.com",
                "password": "hunter2!",
            }))
            .send(&open_service(
                TestApp {
                    users,
                    auth,
                    ..TestApp::default()
                },
                Router::with_path("users/register").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let cookie = res
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        assert!(cookie.contains("token=signed.jwt.token"), "{cookie}");
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("Max-Age=10800"), "{cookie}");

        let body: AuthResponse = res.take_json().await?;

        assert_eq!(body.token, "signed.jwt.token");
        assert_eq!(body.user.email, "bob@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_a_conflict() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .return_once(|_| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/users/register")
            .json(&serde_json::json!({
                "name": "Bob",
                "email": "taken@example.com",
                "password": "hunter2!",
            }))
            .send(&open_service(
                TestApp {
                    users,
                    ..TestApp::default()
                },
                Router::with_path("users/register").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
