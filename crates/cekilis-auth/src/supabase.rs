//! Hosted auth backend (GoTrue REST API).
//!
//! Endpoints live under `{url}/auth/v1`. Every request carries the
//! project's anon key in the `apikey` header; requests on behalf of a
//! signed-in operator additionally send their access token as a bearer.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::identity::{Identity, Session};

/// Auth backend talking to a hosted GoTrue instance.
pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: Identity,
}

/// The shapes GoTrue uses for error bodies, merged.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SupabaseAuth {
    /// Create a backend for the project at `url`.
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/auth/v1", url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("apikey", &self.api_key)
    }

    pub(crate) async fn current_identity(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .request(reqwest::Method::GET, "/user")
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Session token rejected by provider");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(
                response
                    .json()
                    .await
                    .map_err(|e| AuthError::Transport(format!("user parse failed: {e}")))?,
            )),
            _ => Err(failure(response).await),
        }
    }

    pub(crate) async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        session(checked(response).await?).await
    }

    pub(crate) async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/logout")
            .bearer_auth(token)
            .send()
            .await?;
        // An already expired token has nothing left to revoke.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        checked(response).await.map(drop)
    }

    pub(crate) async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/signup")
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        checked(response).await.map(drop)
    }

    pub(crate) async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await?;
        checked(response).await.map(drop)
    }

    pub(crate) async fn update_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::PUT, "/user")
            .bearer_auth(token)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::Unauthenticated);
        }
        checked(response).await.map(drop)
    }

    pub(crate) async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<Session, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/verify")
            .json(&json!({ "type": kind, "token_hash": token_hash }))
            .send()
            .await?;
        session(checked(response).await?).await
    }
}

/// Pass successful responses through; turn the rest into errors.
async fn checked(response: Response) -> Result<Response, AuthError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(failure(response).await)
    }
}

async fn session(response: Response) -> Result<Session, AuthError> {
    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Transport(format!("token parse failed: {e}")))?;
    Ok(Session {
        access_token: token.access_token,
        identity: token.user,
    })
}

async fn failure(response: Response) -> AuthError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    classify(status, &body)
}

/// Client errors are the provider saying no; anything else is an outage.
fn classify(status: StatusCode, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("auth provider returned {status}"));

    if status.is_client_error() {
        AuthError::Rejected(message)
    } else {
        warn!(%status, body, "Auth provider failure");
        AuthError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let auth = SupabaseAuth::new("https://abc.supabase.co/", "anon");
        assert_eq!(auth.base_url, "https://abc.supabase.co/auth/v1");
    }

    #[test]
    fn gotrue_msg_is_preferred() {
        let err = classify(
            StatusCode::BAD_REQUEST,
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid login credentials"));
    }

    #[test]
    fn oauth_style_error_is_understood() {
        let err = classify(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#,
        );
        assert_eq!(err.to_string(), "Email not confirmed");
    }

    #[test]
    fn server_errors_are_transport_failures() {
        let err = classify(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(err, AuthError::Transport(ref m) if m.contains("502")));
    }
}
