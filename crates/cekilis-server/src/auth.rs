//! Account form actions and the email link callback.
//!
//! Every action answers with a redirect. Outcomes are reported to the
//! target page through an `error` or `success` query parameter, which the
//! page renders as a banner.

use std::sync::Arc;

use axum::Extension;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use reqwest::Url;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::session::{CurrentSession, SIGN_IN_PATH, cleared_cookie, session_cookie, session_token};
use crate::state::AppState;

/// Landing page after signing in.
pub const HOME_PATH: &str = "/protected";

/// Password reset form, reached through the emailed link.
pub const RESET_PASSWORD_PATH: &str = "/protected/reset-password";

/// Base used only to resolve relative paths.
const LOCAL_ORIGIN: &str = "http://localhost/";

/// Email and password, as posted by the sign-in and sign-up forms.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

/// Body of the forgot-password form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordForm {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Where to go instead of the confirmation banner.
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Body of the reset-password form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    /// New password.
    #[serde(default)]
    pub password: String,
    /// The same password again.
    #[serde(default)]
    pub confirm_password: String,
}

/// Query of `/auth/callback`, the target of emailed links.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    /// One-time token from the email.
    #[serde(default)]
    pub token_hash: Option<String>,
    /// Link kind (`signup`, `recovery`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Where to land afterwards.
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// `path` with `key=value` appended to its query string.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    match Url::parse(LOCAL_ORIGIN).and_then(|base| base.join(path)) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(key, value);
            match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_owned(),
            }
        }
        Err(_) => path.to_owned(),
    }
}

/// Redirect to `path` with a banner message of the given kind
/// (`error` or `success`).
pub fn encoded_redirect(kind: &str, path: &str, message: &str) -> Redirect {
    Redirect::to(&with_query(path, kind, message))
}

/// `target` if it is a path on this site.
pub fn local_path(target: &str) -> Option<&str> {
    let target = target.trim();
    let local = target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\");
    local.then_some(target)
}

/// Absolute URL of the email callback, landing on `redirect_to` if given.
fn callback_url(state: &AppState, redirect_to: Option<&str>) -> String {
    let base = format!("{}/auth/callback", state.site_url);
    match (redirect_to, Url::parse(&base)) {
        (Some(target), Ok(mut url)) => {
            url.query_pairs_mut().append_pair("redirect_to", target);
            url.into()
        }
        _ => base,
    }
}

/// Redirect that also stores the session cookie.
fn signed_in(state: &AppState, target: &str, token: &str) -> Response {
    let mut response = Redirect::to(target).into_response();
    if let Some(cookie) = session_cookie(token, state.secure_cookies) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

/// `POST /sign-up`
pub async fn sign_up(State(state): State<Arc<AppState>>, Form(form): Form<CredentialsForm>) -> Redirect {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return encoded_redirect("error", "/sign-up", "Email and password are required");
    }

    match state
        .auth
        .sign_up(email, &form.password, &callback_url(&state, None))
        .await
    {
        Ok(()) => {
            info!(email, "Account registered");
            encoded_redirect(
                "success",
                "/sign-up",
                "Thanks for signing up! Please check your email for a verification link.",
            )
        }
        Err(e) => {
            warn!(email, error = %e, "Sign-up refused");
            encoded_redirect("error", "/sign-up", &e.to_string())
        }
    }
}

/// `POST /sign-in`
pub async fn sign_in(State(state): State<Arc<AppState>>, Form(form): Form<CredentialsForm>) -> Response {
    match state.auth.sign_in(form.email.trim(), &form.password).await {
        Ok(session) => signed_in(&state, HOME_PATH, &session.access_token),
        Err(e) => encoded_redirect("error", SIGN_IN_PATH, &e.to_string()).into_response(),
    }
}

/// `POST /forgot-password`
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ForgotPasswordForm>,
) -> Redirect {
    let email = form.email.trim();
    if email.is_empty() {
        return encoded_redirect("error", "/forgot-password", "Email is required");
    }

    let redirect_to = callback_url(&state, Some(RESET_PASSWORD_PATH));
    if let Err(e) = state.auth.request_password_reset(email, &redirect_to).await {
        error!(email, error = %e, "Password reset request failed");
        return encoded_redirect("error", "/forgot-password", "Could not reset password");
    }

    if let Some(target) = form.callback_url.as_deref().and_then(local_path) {
        return Redirect::to(target);
    }
    encoded_redirect(
        "success",
        "/forgot-password",
        "Check your email for a link to reset your password.",
    )
}

/// `POST /protected/reset-password`
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<ResetPasswordForm>,
) -> Redirect {
    if form.password.is_empty() || form.confirm_password.is_empty() {
        return encoded_redirect(
            "error",
            RESET_PASSWORD_PATH,
            "Password and confirm password are required",
        );
    }
    if form.password != form.confirm_password {
        return encoded_redirect("error", RESET_PASSWORD_PATH, "Passwords do not match");
    }

    if let Err(e) = state
        .auth
        .update_password(&session.token, &form.password)
        .await
    {
        warn!(user_id = %session.identity.id, error = %e, "Password update failed");
        return encoded_redirect("error", RESET_PASSWORD_PATH, "Password update failed");
    }
    info!(user_id = %session.identity.id, "Password updated");
    encoded_redirect("success", RESET_PASSWORD_PATH, "Password updated")
}

/// `POST /sign-out`
pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let revoked = match session_token(&headers) {
        Some(token) => state.auth.sign_out(token).await,
        None => Ok(()),
    };
    if let Err(e) = revoked {
        warn!(error = %e, "Sign-out not acknowledged by provider");
    }
    let mut response = Redirect::to(SIGN_IN_PATH).into_response();
    response.headers_mut().insert(SET_COOKIE, cleared_cookie(state.secure_cookies));
    response
}

/// `GET /auth/callback`
///
/// Redeems the one-time token from a confirmation or recovery email and
/// signs the operator in.
pub async fn callback(State(state): State<Arc<AppState>>, Query(query): Query<CallbackQuery>) -> Response {
    let target = query
        .redirect_to
        .as_deref()
        .and_then(local_path)
        .unwrap_or(HOME_PATH)
        .to_owned();

    let Some(token_hash) = query.token_hash.as_deref().filter(|t| !t.is_empty()) else {
        return Redirect::to(&target).into_response();
    };
    let kind = query.kind.as_deref().unwrap_or("email");

    match state.auth.verify_otp(token_hash, kind).await {
        Ok(session) => {
            info!(user_id = %session.identity.id, kind, "Email link redeemed");
            signed_in(&state, &target, &session.access_token)
        }
        Err(e) => {
            warn!(kind, error = %e, "Email link rejected");
            encoded_redirect("error", SIGN_IN_PATH, &e.to_string()).into_response()
        }
    }
}
