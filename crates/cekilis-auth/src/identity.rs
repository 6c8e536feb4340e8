//! Who is signed in.

use serde::{Deserialize, Serialize};

/// The signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user id.
    pub id: String,
    /// Account email.
    #[serde(default)]
    pub email: String,
}

/// A signed-in session: the bearer token plus whom it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token stored in the session cookie.
    pub access_token: String,
    /// The account the token was issued for.
    pub identity: Identity,
}

/// One account of the static backend, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAccount {
    /// Login email.
    pub email: String,
    /// Plain-text password. Development and tests only.
    pub password: String,
}
