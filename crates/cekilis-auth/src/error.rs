//! Error types for the auth gate.

/// Errors returned by auth operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the request (bad credentials, duplicate
    /// account, expired link). The message is safe to show the user.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or answered with garbage.
    #[error("auth provider unavailable: {0}")]
    Transport(String),

    /// The operation needs a signed-in session and there is none.
    #[error("not signed in")]
    Unauthenticated,
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
