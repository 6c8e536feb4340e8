//! JSON endpoints for winners.
//!
//! | Method | Path | Body / Query | Success |
//! |--------|------|--------------|---------|
//! | `GET` | `/winners?giveawayId=` | optional filter | array of winners, newest first |
//! | `POST` | `/winners` | winner fields | created winner |
//! | `PUT` | `/winners` | `{id, ...winner fields}` | updated winner |
//! | `DELETE` | `/winners?id=` | | `{success: true}` |
//!
//! Listed winners carry their giveaway under `giveaway`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use cekilis_types::{GiveawayId, Winner, WinnerId, WinnerInput, WinnerUpdate, WinnerView};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::{IdQuery, ID_REQUIRED, json_body, required_id};
use crate::state::AppState;

/// Query of `GET /winners`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnersQuery {
    /// Restrict to one giveaway.
    #[serde(default, alias = "cekilisId", alias = "cekilis_id")]
    pub giveaway_id: Option<String>,
}

/// `GET /winners`
pub async fn list_winners(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WinnersQuery>,
) -> Result<Json<Vec<WinnerView>>, ApiError> {
    let giveaway_id: Option<GiveawayId> = match query.giveaway_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(required_id(Some(raw))?),
    };
    Ok(Json(state.ledger().list_with_giveaway(giveaway_id).await?))
}

/// `POST /winners`
pub async fn create_winner(
    State(state): State<Arc<AppState>>,
    body: Result<Json<WinnerInput>, JsonRejection>,
) -> Result<Json<Winner>, ApiError> {
    let input = json_body(body)?;
    Ok(Json(state.ledger().create(&input).await?))
}

/// `PUT /winners`
pub async fn update_winner(
    State(state): State<Arc<AppState>>,
    body: Result<Json<WinnerUpdate>, JsonRejection>,
) -> Result<Json<Winner>, ApiError> {
    let update = json_body(body)?;
    let id = update
        .id
        .ok_or_else(|| ApiError::BadRequest(ID_REQUIRED.to_owned()))?;
    Ok(Json(state.ledger().update(id, &update.input).await?))
}

/// `DELETE /winners?id=`
pub async fn delete_winner(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id: WinnerId = required_id(query.id.as_deref())?;
    state.ledger().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
