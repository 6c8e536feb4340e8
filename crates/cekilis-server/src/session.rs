//! Session cookie handling and the auth middleware.
//!
//! The session token lives in the `cekilis_session` cookie. Two
//! middlewares gate access:
//!
//! - [`require_session`] guards the `/protected` pages.
//! - [`guard_writes`] guards the JSON API, letting reads through.
//!
//! Either way an unauthenticated caller is redirected to `/sign-in`.
//! On success the resolved [`CurrentSession`] is placed in the request
//! extensions for handlers to pick up.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use cekilis_auth::Identity;
use tracing::{debug, error};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "cekilis_session";

/// Where unauthenticated callers are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// The signed-in operator behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// Token from the session cookie.
    pub token: String,
    /// Whom the token belongs to.
    pub identity: Identity,
}

/// Session token from the request's cookies, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value storing `token`.
///
/// `secure` adds the `Secure` attribute, for sites served over https.
pub fn session_cookie(token: &str, secure: bool) -> Option<HeaderValue> {
    let secure = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/{secure}"
    ))
    .ok()
}

/// `Set-Cookie` value expiring the session cookie.
pub const fn cleared_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("cekilis_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("cekilis_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
    }
}

/// Resolve the caller's session, if they have a live one.
pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Option<CurrentSession> {
    let token = session_token(headers)?;
    match state.auth.current_identity(token).await {
        Ok(Some(identity)) => Some(CurrentSession {
            token: token.to_owned(),
            identity,
        }),
        Ok(None) => {
            debug!("Session cookie no longer valid");
            None
        }
        Err(e) => {
            error!(error = %e, backend = state.auth.name(), "Session lookup failed");
            None
        }
    }
}

/// Redirect to the sign-in page, dropping any stale cookie.
fn to_sign_in(secure: bool) -> Response {
    let mut response = Redirect::to(SIGN_IN_PATH).into_response();
    response.headers_mut().insert(SET_COOKIE, cleared_cookie(secure));
    response
}

/// Let the request through only with a live session.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = resolve(&state, request.headers()).await else {
        return to_sign_in(state.secure_cookies);
    };
    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Let reads through; require a live session for everything else.
pub async fn guard_writes(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return next.run(request).await;
    }
    require_session(State(state), request, next).await
}
