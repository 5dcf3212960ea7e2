//! Logout Handler

use salvo::prelude::*;

use crate::auth::middleware::TOKEN_COOKIE;

/// Logout Handler
///
/// Tokens are stateless, so logout only clears the cookie; a token the
/// client kept elsewhere stays valid until it expires.
#[endpoint(tags("users"), summary = "Logout", status_codes(204))]
pub(crate) async fn handler(res: &mut Response) {
    res.remove_cookie(TOKEN_COOKIE);
    res.status_code(StatusCode::NO_CONTENT);
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{TestApp, open_service};

    use super::*;

    #[tokio::test]
    async fn test_logout_clears_the_token_cookie() -> TestResult {
        let res = TestClient::post("http://example.com/users/logout")
            .send(&open_service(
                TestApp::default(),
                Router::with_path("users/logout").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        let cookie = res
            .headers()
            .get("set-cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        assert!(cookie.starts_with("token="), "{cookie}");

        Ok(())
    }
}
