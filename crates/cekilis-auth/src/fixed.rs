//! In-process auth backend.
//!
//! Accounts come from configuration and live in memory alongside the
//! issued session tokens. Nothing is persisted and no email is ever sent,
//! so links that would normally arrive by email cannot be verified.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::{Identity, Session, StaticAccount};

/// Message for a failed password sign-in.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Debug)]
struct Account {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default)]
struct Accounts {
    /// Keyed by lowercase email.
    by_email: HashMap<String, Account>,
    /// Live session tokens.
    sessions: HashMap<String, Identity>,
}

/// Auth backend holding a fixed account table in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    accounts: Arc<Mutex<Accounts>>,
}

impl StaticAuth {
    /// Create a backend seeded with `accounts`.
    pub fn new(accounts: &[StaticAccount]) -> Self {
        let by_email = accounts
            .iter()
            .map(|account| {
                let email = account.email.trim().to_lowercase();
                let entry = Account {
                    identity: Identity {
                        id: Uuid::new_v4().to_string(),
                        email: email.clone(),
                    },
                    password: account.password.clone(),
                };
                (email, entry)
            })
            .collect();
        Self {
            accounts: Arc::new(Mutex::new(Accounts {
                by_email,
                sessions: HashMap::new(),
            })),
        }
    }

    pub(crate) async fn current_identity(&self, token: &str) -> Option<Identity> {
        self.accounts.lock().await.sessions.get(token).cloned()
    }

    pub(crate) async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let mut accounts = self.accounts.lock().await;
        let identity = accounts
            .by_email
            .get(&email.trim().to_lowercase())
            .filter(|account| account.password == password)
            .map(|account| account.identity.clone())
            .ok_or_else(|| AuthError::Rejected(INVALID_CREDENTIALS.to_owned()))?;

        let access_token = Uuid::new_v4().to_string();
        accounts
            .sessions
            .insert(access_token.clone(), identity.clone());
        Ok(Session {
            access_token,
            identity,
        })
    }

    pub(crate) async fn sign_out(&self, token: &str) {
        self.accounts.lock().await.sessions.remove(token);
    }

    pub(crate) async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock().await;
        if accounts.by_email.contains_key(&email) {
            return Err(AuthError::Rejected("User already registered".to_owned()));
        }
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
        };
        info!(email = %identity.email, "Static account registered");
        accounts.by_email.insert(
            email,
            Account {
                identity,
                password: password.to_owned(),
            },
        );
        Ok(())
    }

    pub(crate) async fn update_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().await;
        let email = accounts
            .sessions
            .get(token)
            .map(|identity| identity.email.clone())
            .ok_or(AuthError::Unauthenticated)?;
        let account = accounts
            .by_email
            .get_mut(&email)
            .ok_or(AuthError::Unauthenticated)?;
        password.clone_into(&mut account.password);
        Ok(())
    }
}
