//! Error taxonomy of the ledger and registry.
//!
//! Callers match on the kind instead of inspecting messages. The HTTP
//! layer maps each kind onto a status code.

use cekilis_store::StoreError;

/// Message for a missing or blank handle.
pub const HANDLE_REQUIRED: &str = "handle required";

/// Message for a handle already held by another winner.
pub const HANDLE_TAKEN: &str = "handle already used in another giveaway";

/// Message for a winner that references a giveaway the store does not have.
pub const GIVEAWAY_MISSING: &str = "giveaway not found";

/// Message for a giveaway missing its name or date.
pub const GIVEAWAY_FIELDS_REQUIRED: &str = "name and date are required";

/// Errors returned by ledger and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A required field is missing or empty. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The handle is already held by another winner. Never retried.
    #[error("{0}")]
    Conflict(String),

    /// The targeted record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The underlying store failed; its message is passed through.
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Short machine-readable kind, used in logs and response bodies.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store",
        }
    }
}
