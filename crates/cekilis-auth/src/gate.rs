//! The auth gate: one enum over every auth backend.

use tracing::{info, warn};

use crate::error::AuthError;
use crate::fixed::StaticAuth;
use crate::identity::{Identity, Session};
use crate::supabase::SupabaseAuth;

/// An auth backend that resolves session tokens to identities.
///
/// Enum dispatch instead of trait objects because async methods are not
/// dyn-compatible.
pub enum AuthGate {
    /// Hosted GoTrue API.
    Supabase(SupabaseAuth),
    /// In-memory account table.
    Static(StaticAuth),
}

impl AuthGate {
    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Supabase(_) => "supabase",
            Self::Static(_) => "static",
        }
    }

    /// The identity behind `token`, or `None` if the token is unknown or
    /// expired.
    ///
    /// # Errors
    ///
    /// [`AuthError::Transport`] if the provider cannot be asked.
    pub async fn current_identity(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        match self {
            Self::Supabase(auth) => auth.current_identity(token).await,
            Self::Static(auth) => Ok(auth.current_identity(token).await),
        }
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::Rejected`] with the provider's message on bad
    /// credentials.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let result = match self {
            Self::Supabase(auth) => auth.sign_in(email, password).await,
            Self::Static(auth) => auth.sign_in(email, password).await,
        };
        match &result {
            Ok(session) => info!(user_id = %session.identity.id, "Signed in"),
            Err(e) => warn!(error = %e, "Sign-in refused"),
        }
        result
    }

    /// Revoke `token`.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        match self {
            Self::Supabase(auth) => auth.sign_out(token).await,
            Self::Static(auth) => {
                auth.sign_out(token).await;
                Ok(())
            }
        }
    }

    /// Register a new account. The provider emails a confirmation link
    /// pointing at `redirect_to`.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        match self {
            Self::Supabase(auth) => auth.sign_up(email, password, redirect_to).await,
            Self::Static(auth) => auth.sign_up(email, password).await,
        }
    }

    /// Email a password reset link pointing at `redirect_to`.
    pub async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        match self {
            Self::Supabase(auth) => auth.request_password_reset(email, redirect_to).await,
            // Unknown addresses are not revealed, and there is no mailer.
            Self::Static(_) => Ok(()),
        }
    }

    /// Set a new password for the account behind `token`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] if the token is not a live session.
    pub async fn update_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        match self {
            Self::Supabase(auth) => auth.update_password(token, password).await,
            Self::Static(auth) => auth.update_password(token, password).await,
        }
    }

    /// Redeem an emailed link (`token_hash` of the given `kind`, such as
    /// `signup` or `recovery`) for a session.
    pub async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<Session, AuthError> {
        match self {
            Self::Supabase(auth) => auth.verify_otp(token_hash, kind).await,
            Self::Static(_) => Err(AuthError::Rejected(
                "Email link is invalid or has expired".to_owned(),
            )),
        }
    }
}

impl From<SupabaseAuth> for AuthGate {
    fn from(auth: SupabaseAuth) -> Self {
        Self::Supabase(auth)
    }
}

impl From<StaticAuth> for AuthGate {
    fn from(auth: StaticAuth) -> Self {
        Self::Static(auth)
    }
}
