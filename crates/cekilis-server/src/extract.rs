//! Request parsing shared by the JSON endpoints.

use std::fmt::Display;
use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use crate::error::ApiError;

/// Message for a missing `id`.
pub const ID_REQUIRED: &str = "ID parametresi gereklidir";

/// `?id=` query of the delete endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    /// Raw id; parsed by [`required_id`].
    #[serde(default)]
    pub id: Option<String>,
}

/// Parse a required id, from a query string or a body field.
///
/// # Errors
///
/// [`ApiError::BadRequest`] if the id is absent, blank or not a number.
pub fn required_id<T>(raw: Option<&str>) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ApiError::BadRequest(ID_REQUIRED.to_owned()))?;
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid id {raw:?}: {e}")))
}

/// Unwrap a JSON body, reporting rejections as a bad request.
///
/// # Errors
///
/// [`ApiError::BadRequest`] with the extractor's explanation.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use cekilis_types::GiveawayId;

    use super::*;

    #[test]
    fn id_is_trimmed_and_parsed() {
        let id: Result<GiveawayId, _> = required_id(Some(" 42 "));
        assert_eq!(id.ok(), Some(GiveawayId(42)));
    }

    #[test]
    fn missing_or_bad_id_is_bad_request() {
        for raw in [None, Some(""), Some("  "), Some("abc")] {
            let id: Result<GiveawayId, _> = required_id(raw);
            assert!(matches!(id, Err(ApiError::BadRequest(_))), "{raw:?}");
        }
    }
}
