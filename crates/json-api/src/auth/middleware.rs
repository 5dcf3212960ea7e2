//! Auth middleware.
//!
//! `protect` accepts a bearer token from the `auth-token` header, the
//! standard `Authorization` header, or the `token` cookie, and attaches the
//! verified identity to the depot. `require_admin` layers an admin check on
//! top and answers 403 for authenticated non-admin callers.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};

use crate::{extensions::*, state::State};

/// Header the storefront client sends its token in.
pub(crate) const AUTH_TOKEN_HEADER: &str = "auth-token";

/// Cookie set on login and register.
pub(crate) const TOKEN_COOKIE: &str = "token";

#[salvo::handler]
pub(crate) async fn protect(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing authentication token"));

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let identity = match state.app.auth.verify_token(&token) {
        Ok(identity) => identity,
        Err(error) => {
            tracing::debug!("rejected bearer token: {error}");

            res.render(StatusError::unauthorized().brief("Invalid or expired token"));

            return;
        }
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.identity_or_401() {
        Ok(identity) if identity.is_admin => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_identity) => {
            res.render(StatusError::forbidden().brief("Administrator access required"));
        }
        Err(error) => {
            res.render(error);
        }
    }
}

fn extract_token(req: &Request) -> Option<String> {
    if let Some(value) = req.headers().get(AUTH_TOKEN_HEADER)
        && let Ok(token) = value.to_str()
        && !token.trim().is_empty()
    {
        return Some(token.trim().to_string());
    }

    if let Some(token) = extract_bearer_token(req) {
        return Some(token.to_string());
    }

    req.cookies()
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
