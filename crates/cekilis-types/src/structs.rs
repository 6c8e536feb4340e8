//! Entity and request payload structs.
//!
//! Entities ([`Giveaway`], [`Winner`]) are what the store returns.
//! Inputs ([`GiveawayInput`], [`WinnerInput`]) are the raw request bodies
//! accepted over HTTP, before validation. The validated forms
//! ([`NewGiveaway`], [`NewWinner`]) are what the store writes.
//!
//! Wire field names are camelCase. The original column names
//! (`ad`, `tarih`, `hesap_adi`, ...) are accepted as input aliases so
//! older clients keep working.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{GiveawayId, WinnerId};

// ---------------------------------------------------------------------------
// Giveaway
// ---------------------------------------------------------------------------

/// A named, dated giveaway event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Giveaway {
    /// Store-assigned identifier.
    pub id: GiveawayId,
    /// Display name.
    pub name: String,
    /// Calendar date of the draw.
    pub date: NaiveDate,
}

/// Raw create/update body for a giveaway.
///
/// Both fields default to empty so that a missing field surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GiveawayInput {
    /// Display name.
    #[serde(default, alias = "ad")]
    pub name: String,
    /// Draw date as `YYYY-MM-DD`.
    #[serde(default, alias = "tarih")]
    pub date: String,
}

/// Body of `PUT /giveaways`: the target id plus the new field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GiveawayUpdate {
    /// The giveaway to update.
    #[serde(default)]
    pub id: Option<GiveawayId>,
    /// Replacement field values.
    #[serde(flatten)]
    pub input: GiveawayInput,
}

/// A validated giveaway ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGiveaway {
    /// Trimmed, non-empty name.
    pub name: String,
    /// Parsed draw date.
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Winner
// ---------------------------------------------------------------------------

/// One contestant recorded as the winner of a giveaway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Winner {
    /// Store-assigned identifier.
    pub id: WinnerId,
    /// The giveaway this winner belongs to.
    pub giveaway_id: GiveawayId,
    /// Contestant handle, stored trimmed. Unique across all giveaways.
    pub handle: String,
    /// Contact name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Free-form operator notes.
    pub notes: Option<String>,
    /// Store-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// Raw create body for a winner (and the field part of an update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WinnerInput {
    /// The owning giveaway.
    #[serde(default, alias = "cekilis_id")]
    pub giveaway_id: Option<GiveawayId>,
    /// Contestant handle; surrounding whitespace is ignored.
    #[serde(default, alias = "hesap_adi")]
    pub handle: String,
    /// Contact name.
    #[serde(default, alias = "ad_soyad")]
    pub full_name: String,
    /// Contact phone.
    #[serde(default, alias = "tel")]
    pub phone: String,
    /// Postal address.
    #[serde(default, alias = "adres")]
    pub address: String,
    /// Free-form operator notes.
    #[serde(default, alias = "notlar")]
    pub notes: Option<String>,
}

/// Body of `PUT /winners`: the target id plus the full replacement record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WinnerUpdate {
    /// The winner to update.
    #[serde(default)]
    pub id: Option<WinnerId>,
    /// Replacement field values. All fields are overwritten.
    #[serde(flatten)]
    pub input: WinnerInput,
}

/// A validated winner ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWinner {
    /// The owning giveaway.
    pub giveaway_id: GiveawayId,
    /// Trimmed, non-empty handle.
    pub handle: String,
    /// Contact name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Notes, `None` when blank.
    pub notes: Option<String>,
}

/// A winner with its owning giveaway embedded, as returned by `GET /winners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WinnerView {
    /// The winner record.
    #[serde(flatten)]
    pub winner: Winner,
    /// The owning giveaway, if it still exists.
    pub giveaway: Option<Giveaway>,
}
