//! Hosted REST backend.
//!
//! The managed database exposes its tables through a `PostgREST`
//! endpoint at `{url}/rest/v1/{table}`. Filters are query parameters of
//! the form `column=op.value`; writes ask for the affected rows back via
//! `Prefer: return=representation` so zero-row updates and deletes can
//! be detected.
//!
//! Constraint violations arrive as `PostgreSQL` error codes in the JSON
//! error body (`23505` unique, `23503` foreign key) and are mapped onto
//! the matching [`StoreError`] variants.

use cekilis_types::{Giveaway, GiveawayId, NewGiveaway, NewWinner, Winner, WinnerId};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::rows::{GIVEAWAY_COLUMNS, GiveawayRow, WINNER_COLUMNS, WinnerRow};
use crate::store::WinnerFilter;

/// `PostgreSQL` error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// `PostgreSQL` error code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Store backend over the hosted database's REST interface.
#[derive(Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Error body returned by the REST interface.
#[derive(Debug, Default, serde::Deserialize)]
struct RestErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Insert/update payload for `cekilisler`.
#[derive(Serialize)]
struct GiveawayPayload<'a> {
    ad: &'a str,
    tarih: chrono::NaiveDate,
}

/// Insert/update payload for `kazananlar`.
#[derive(Serialize)]
struct WinnerPayload<'a> {
    cekilis_id: i64,
    hesap_adi: &'a str,
    ad_soyad: &'a str,
    tel: &'a str,
    adres: &'a str,
    notlar: Option<&'a str>,
}

impl<'a> From<&'a NewWinner> for WinnerPayload<'a> {
    fn from(winner: &'a NewWinner) -> Self {
        Self {
            cekilis_id: winner.giveaway_id.into_inner(),
            hesap_adi: &winner.handle,
            ad_soyad: &winner.full_name,
            tel: &winner.phone,
            adres: &winner.address,
            notlar: winner.notes.as_deref(),
        }
    }
}

impl PostgrestStore {
    /// Create a backend for the project at `url` using the given API key.
    ///
    /// The URL is the project root (e.g. `https://xyz.supabase.co`); the
    /// `/rest/v1` prefix is added here.
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Send a request and decode the JSON row array it returns.
    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>, StoreError> {
        let response = self.authorized(request).send().await?;
        let response = check_status(response).await?;
        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Backend(format!("store response parse failed: {e}")))?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // cekilisler
    // -----------------------------------------------------------------------

    pub(crate) async fn list_giveaways(&self) -> Result<Vec<Giveaway>, StoreError> {
        let request = self.client.get(self.table_url("cekilisler")).query(&[
            ("select", GIVEAWAY_COLUMNS.replace(' ', "")),
            ("order", String::from("tarih.desc,id.desc")),
        ]);
        let rows: Vec<GiveawayRow> = self.rows(request).await?;
        Ok(rows.into_iter().map(Giveaway::from).collect())
    }

    pub(crate) async fn get_giveaway(&self, id: GiveawayId) -> Result<Option<Giveaway>, StoreError> {
        let request = self.client.get(self.table_url("cekilisler")).query(&[
            ("select", GIVEAWAY_COLUMNS.replace(' ', "")),
            ("id", format!("eq.{id}")),
        ]);
        let rows: Vec<GiveawayRow> = self.rows(request).await?;
        Ok(rows.into_iter().next().map(Giveaway::from))
    }

    pub(crate) async fn insert_giveaway(&self, giveaway: &NewGiveaway) -> Result<Giveaway, StoreError> {
        let payload = GiveawayPayload {
            ad: &giveaway.name,
            tarih: giveaway.date,
        };
        let request = self
            .client
            .post(self.table_url("cekilisler"))
            .query(&[("select", GIVEAWAY_COLUMNS.replace(' ', ""))])
            .header("Prefer", "return=representation")
            .json(&[payload]);
        let rows: Vec<GiveawayRow> = self.rows(request).await?;
        rows.into_iter()
            .next()
            .map(Giveaway::from)
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_owned()))
    }

    pub(crate) async fn update_giveaway(
        &self,
        id: GiveawayId,
        giveaway: &NewGiveaway,
    ) -> Result<Option<Giveaway>, StoreError> {
        let payload = GiveawayPayload {
            ad: &giveaway.name,
            tarih: giveaway.date,
        };
        let request = self
            .client
            .patch(self.table_url("cekilisler"))
            .query(&[
                ("select", GIVEAWAY_COLUMNS.replace(' ', "")),
                ("id", format!("eq.{id}")),
            ])
            .header("Prefer", "return=representation")
            .json(&payload);
        let rows: Vec<GiveawayRow> = self.rows(request).await?;
        Ok(rows.into_iter().next().map(Giveaway::from))
    }

    pub(crate) async fn delete_giveaway(&self, id: GiveawayId) -> Result<bool, StoreError> {
        let request = self
            .client
            .delete(self.table_url("cekilisler"))
            .query(&[("select", String::from("id")), ("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let rows: Vec<serde_json::Value> = self.rows(request).await?;
        Ok(!rows.is_empty())
    }

    // -----------------------------------------------------------------------
    // kazananlar
    // -----------------------------------------------------------------------

    pub(crate) async fn select_winners(&self, filter: &WinnerFilter) -> Result<Vec<Winner>, StoreError> {
        let mut params = vec![
            ("select", WINNER_COLUMNS.replace(' ', "")),
            ("order", String::from("created_at.desc,id.desc")),
        ];
        if let Some(giveaway_id) = filter.giveaway_id {
            params.push(("cekilis_id", format!("eq.{giveaway_id}")));
        }
        // Handles are stored trimmed, so an equality filter matches the
        // trimmed comparison the constraint uses.
        if let Some(handle) = &filter.handle {
            params.push(("hesap_adi", format!("eq.{handle}")));
        }
        if let Some(exclude_id) = filter.exclude_id {
            params.push(("id", format!("neq.{exclude_id}")));
        }

        let request = self.client.get(self.table_url("kazananlar")).query(&params);
        let rows: Vec<WinnerRow> = self.rows(request).await?;
        Ok(rows.into_iter().map(Winner::from).collect())
    }

    pub(crate) async fn insert_winner(&self, winner: &NewWinner) -> Result<Winner, StoreError> {
        let request = self
            .client
            .post(self.table_url("kazananlar"))
            .query(&[("select", WINNER_COLUMNS.replace(' ', ""))])
            .header("Prefer", "return=representation")
            .json(&[WinnerPayload::from(winner)]);
        let rows: Vec<WinnerRow> = self.rows(request).await?;
        rows.into_iter()
            .next()
            .map(Winner::from)
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_owned()))
    }

    pub(crate) async fn update_winner(
        &self,
        id: WinnerId,
        winner: &NewWinner,
    ) -> Result<Option<Winner>, StoreError> {
        let request = self
            .client
            .patch(self.table_url("kazananlar"))
            .query(&[
                ("select", WINNER_COLUMNS.replace(' ', "")),
                ("id", format!("eq.{id}")),
            ])
            .header("Prefer", "return=representation")
            .json(&WinnerPayload::from(winner));
        let rows: Vec<WinnerRow> = self.rows(request).await?;
        Ok(rows.into_iter().next().map(Winner::from))
    }

    pub(crate) async fn delete_winner(&self, id: WinnerId) -> Result<bool, StoreError> {
        let request = self
            .client
            .delete(self.table_url("kazananlar"))
            .query(&[("select", String::from("id")), ("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let rows: Vec<serde_json::Value> = self.rows(request).await?;
        Ok(!rows.is_empty())
    }
}

/// Turn a non-success response into the matching [`StoreError`].
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    Err(classify_error(status.as_u16(), &text))
}

/// Map an error response body onto a [`StoreError`].
fn classify_error(status: u16, body: &str) -> StoreError {
    let parsed: RestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = match (parsed.message, parsed.details) {
        (Some(message), Some(details)) => format!("{message} ({details})"),
        (Some(message), None) => message,
        _ => format!("store returned {status}: {body}"),
    };

    match parsed.code.as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation(message),
        Some(FOREIGN_KEY_VIOLATION) => StoreError::ForeignKey(message),
        _ => StoreError::Backend(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_rest_prefix() {
        let store = PostgrestStore::new("https://example.supabase.co/", "key");
        assert_eq!(
            store.table_url("kazananlar"),
            "https://example.supabase.co/rest/v1/kazananlar"
        );
    }

    #[test]
    fn unique_violation_code_is_classified() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"kazananlar_hesap_adi_key\"","details":null,"hint":null}"#;
        assert!(matches!(classify_error(409, body), StoreError::UniqueViolation(_)));
    }

    #[test]
    fn foreign_key_code_is_classified() {
        let body = r#"{"code":"23503","message":"insert or update violates foreign key","details":"Key (cekilis_id)=(9) is not present"}"#;
        let err = classify_error(409, body);
        assert!(matches!(err, StoreError::ForeignKey(ref m) if m.contains("cekilis_id")));
    }

    #[test]
    fn unparseable_body_is_passed_through() {
        let err = classify_error(502, "Bad Gateway");
        assert!(matches!(err, StoreError::Backend(ref m) if m.contains("502") && m.contains("Bad Gateway")));
    }

    #[test]
    fn winner_payload_uses_column_names() {
        let winner = NewWinner {
            giveaway_id: GiveawayId(4),
            handle: String::from("ayse_k"),
            full_name: String::from("Ayşe K."),
            phone: String::from("5551112233"),
            address: String::from("İstanbul"),
            notes: None,
        };
        let json = serde_json::to_value(WinnerPayload::from(&winner)).unwrap_or_default();
        assert_eq!(json["cekilis_id"], 4);
        assert_eq!(json["hesap_adi"], "ayse_k");
        assert_eq!(json["adres"], "İstanbul");
        assert!(json["notlar"].is_null());
    }
}
