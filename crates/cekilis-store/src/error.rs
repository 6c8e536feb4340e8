//! Error types for the store adapter.
//!
//! Every backend reports failures through [`StoreError`]. Constraint
//! violations are surfaced as their own variants so the ledger can turn
//! them into domain errors; everything else is passed through as a
//! backend message.

/// Errors that can occur in the store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write violated the unique handle constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The write referenced a giveaway that does not exist.
    #[error("foreign key violated: {0}")]
    ForeignKey(String),

    /// Any other backend failure (network, permissions, malformed rows).
    #[error("{0}")]
    Backend(String),

    /// A `PostgreSQL` migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            if db.is_unique_violation() {
                return Self::UniqueViolation(db.message().to_owned());
            }
            if db.is_foreign_key_violation() {
                return Self::ForeignKey(db.message().to_owned());
            }
        }
        Self::Backend(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Backend(format!("store request failed: {err}"))
    }
}
