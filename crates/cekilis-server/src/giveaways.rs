//! JSON endpoints for giveaways.
//!
//! | Method | Path | Body / Query | Success |
//! |--------|------|--------------|---------|
//! | `GET` | `/giveaways` | | array of giveaways, latest date first |
//! | `POST` | `/giveaways` | `{name, date}` | created giveaway |
//! | `PUT` | `/giveaways` | `{id, name, date}` | updated giveaway |
//! | `DELETE` | `/giveaways?id=` | | `{message}` |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use cekilis_types::{Giveaway, GiveawayId, GiveawayInput, GiveawayUpdate};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::{IdQuery, ID_REQUIRED, json_body, required_id};
use crate::state::AppState;

/// Confirmation returned by `DELETE /giveaways`.
pub const DELETED_MESSAGE: &str = "Çekiliş başarıyla silindi";

/// `GET /giveaways`
pub async fn list_giveaways(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Giveaway>>, ApiError> {
    Ok(Json(state.registry().list().await?))
}

/// `POST /giveaways`
pub async fn create_giveaway(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GiveawayInput>, JsonRejection>,
) -> Result<Json<Giveaway>, ApiError> {
    let input = json_body(body)?;
    Ok(Json(state.registry().create(&input).await?))
}

/// `PUT /giveaways`
pub async fn update_giveaway(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GiveawayUpdate>, JsonRejection>,
) -> Result<Json<Giveaway>, ApiError> {
    let update = json_body(body)?;
    let id = update
        .id
        .ok_or_else(|| ApiError::BadRequest(ID_REQUIRED.to_owned()))?;
    Ok(Json(state.registry().update(id, &update.input).await?))
}

/// `DELETE /giveaways?id=`
pub async fn delete_giveaway(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Value>, ApiError> {
    let id: GiveawayId = required_id(query.id.as_deref())?;
    state.registry().delete(id).await?;
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}
