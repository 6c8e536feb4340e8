//! HTTP surface of the giveaway administration panel.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **JSON API** (`/giveaways`, `/winners`) over the ledger and the
//!   giveaway registry. Reads are open; writes need a session.
//! - **Pages** under `/protected` for managing giveaways and winners,
//!   searching winners, copying the announcement message and exporting
//!   a giveaway's winners as CSV.
//! - **Account actions** (sign in, sign up, sign out, password reset)
//!   backed by the configured auth gate.
//!
//! Configuration comes from `cekilis-config.yaml` plus environment
//! overrides (see [`config`]). [`startup::build_state`] turns it into
//! an [`AppState`], and [`start_server`] serves [`build_router`].

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod giveaways;
pub mod pages;
pub mod router;
pub mod server;
pub mod session;
pub mod startup;
pub mod state;
pub mod winners;

// Re-export primary types for convenience.
pub use config::AppConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
