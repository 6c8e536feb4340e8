//! Store adapter for the giveaway administration panel.
//!
//! Persistence is delegated to a relational backend. This crate provides
//! the typed row-level operations the ledger needs and three ways of
//! reaching the data:
//!
//! ```text
//! Ledger / Registry
//!     |
//!     +-- Store (enum dispatch)
//!         |-- PostgresStore   (sqlx pool, direct SQL)
//!         |-- PostgrestStore  (hosted REST interface over reqwest)
//!         +-- MemoryStore     (in-process tables, tests and local dev)
//! ```
//!
//! All backends enforce the same constraints: a handle appears at most
//! once across `kazananlar`, and every winner references an existing
//! giveaway.
//!
//! # Modules
//!
//! - [`store`] -- The [`Store`] dispatch type and [`WinnerFilter`]
//! - [`postgres`] -- `PostgreSQL` pool, configuration, and queries
//! - [`postgrest`] -- Hosted REST backend
//! - [`memory`] -- In-memory backend
//! - [`rows`] -- Table row shapes
//! - [`error`] -- Shared error type

pub mod error;
pub mod memory;
pub mod postgres;
pub mod postgrest;
pub mod rows;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};
pub use postgrest::PostgrestStore;
pub use rows::{GiveawayRow, WinnerRow};
pub use store::{Store, WinnerFilter};
