//! Giveaway domain logic.
//!
//! - [`WinnerLedger`] records winners and keeps every trimmed handle
//!   unique across all giveaways.
//! - [`GiveawayRegistry`] is plain CRUD over giveaways.
//! - [`filter_and_sort`] and [`announcement_message`] back the winner
//!   management page.
//! - [`export`] renders a giveaway's winners as a spreadsheet.
//!
//! Both the ledger and the registry borrow a [`cekilis_store::Store`]; they
//! hold no state of their own and are built per request.

pub mod collation;
pub mod error;
pub mod export;
pub mod giveaways;
pub mod message;
pub mod search;
pub mod winners;

pub use error::LedgerError;
pub use export::{ExportError, export_csv, export_file_name, utc_offset};
pub use giveaways::GiveawayRegistry;
pub use message::announcement_message;
pub use search::filter_and_sort;
pub use winners::WinnerLedger;
