//! Row shapes of the `cekilisler` and `kazananlar` tables.
//!
//! The same structs decode `sqlx` rows and the hosted backend's JSON
//! rows, since both use the original column names.

use cekilis_types::{Giveaway, GiveawayId, Winner, WinnerId};
use chrono::{DateTime, NaiveDate, Utc};

/// Column list selected for giveaways.
pub(crate) const GIVEAWAY_COLUMNS: &str = "id, ad, tarih";

/// Column list selected for winners.
pub(crate) const WINNER_COLUMNS: &str =
    "id, cekilis_id, hesap_adi, ad_soyad, tel, adres, notlar, created_at";

/// A row from the `cekilisler` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Deserialize)]
pub struct GiveawayRow {
    /// Giveaway key.
    pub id: i64,
    /// Giveaway name.
    pub ad: String,
    /// Draw date.
    pub tarih: NaiveDate,
}

impl From<GiveawayRow> for Giveaway {
    fn from(row: GiveawayRow) -> Self {
        Self {
            id: GiveawayId(row.id),
            name: row.ad,
            date: row.tarih,
        }
    }
}

/// A row from the `kazananlar` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Deserialize)]
pub struct WinnerRow {
    /// Winner key.
    pub id: i64,
    /// Owning giveaway key.
    pub cekilis_id: i64,
    /// Contestant handle.
    pub hesap_adi: String,
    /// Contact name.
    #[serde(default)]
    pub ad_soyad: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub tel: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub adres: Option<String>,
    /// Operator notes.
    #[serde(default)]
    pub notlar: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<WinnerRow> for Winner {
    fn from(row: WinnerRow) -> Self {
        Self {
            id: WinnerId(row.id),
            giveaway_id: GiveawayId(row.cekilis_id),
            handle: row.hesap_adi,
            full_name: row.ad_soyad.unwrap_or_default(),
            phone: row.tel.unwrap_or_default(),
            address: row.adres.unwrap_or_default(),
            notes: row.notlar,
            created_at: row.created_at,
        }
    }
}
