//! Shared type definitions for the giveaway administration panel.
//!
//! This crate is the single source of truth for the records exchanged
//! between the store, the ledger, and the HTTP layer. Types flow
//! downstream to `TypeScript` via `ts-rs` for the browser side of the
//! admin pages.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for giveaway and winner identifiers
//! - [`structs`] -- Entities, raw request bodies, and validated inputs

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{GiveawayId, WinnerId};
pub use structs::{
    Giveaway, GiveawayInput, GiveawayUpdate, NewGiveaway, NewWinner, Winner, WinnerInput,
    WinnerUpdate, WinnerView,
};
