//! The giveaway registry.
//!
//! Plain CRUD over giveaways. The only rule is that both name and date
//! are present, and the date parses as `YYYY-MM-DD`.

use cekilis_store::Store;
use cekilis_types::{Giveaway, GiveawayId, GiveawayInput, NewGiveaway};
use chrono::NaiveDate;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{GIVEAWAY_FIELDS_REQUIRED, LedgerError};

/// Wire format of a giveaway date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trimmed giveaway fields, checked before parsing.
#[derive(Debug, Validate)]
struct GiveawayForm {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    date: String,
}

/// Giveaway operations bound to a store.
pub struct GiveawayRegistry<'a> {
    store: &'a Store,
}

impl<'a> GiveawayRegistry<'a> {
    /// Create a registry over `store`.
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Every giveaway, most recent date first.
    pub async fn list(&self) -> Result<Vec<Giveaway>, LedgerError> {
        Ok(self.store.list_giveaways().await?)
    }

    /// Fetch one giveaway.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] if no giveaway has this id.
    pub async fn get(&self, id: GiveawayId) -> Result<Giveaway, LedgerError> {
        self.store
            .get_giveaway(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create a giveaway.
    pub async fn create(&self, input: &GiveawayInput) -> Result<Giveaway, LedgerError> {
        let giveaway = validate(input)?;
        let created = self.store.insert_giveaway(&giveaway).await?;
        info!(giveaway_id = %created.id, name = %created.name, "Giveaway created");
        Ok(created)
    }

    /// Overwrite the name and date of giveaway `id`.
    pub async fn update(
        &self,
        id: GiveawayId,
        input: &GiveawayInput,
    ) -> Result<Giveaway, LedgerError> {
        let giveaway = validate(input)?;
        let updated = self
            .store
            .update_giveaway(id, &giveaway)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(giveaway_id = %id, name = %updated.name, "Giveaway updated");
        Ok(updated)
    }

    /// Delete giveaway `id`. Its winners go with it (schema cascade).
    pub async fn delete(&self, id: GiveawayId) -> Result<(), LedgerError> {
        if !self.store.delete_giveaway(id).await? {
            return Err(not_found(id));
        }
        info!(giveaway_id = %id, "Giveaway deleted");
        Ok(())
    }
}

/// Check required fields and parse the date.
///
/// # Errors
///
/// [`LedgerError::Validation`] if the name or date is blank, or the date
/// is not a valid `YYYY-MM-DD` calendar date.
pub fn validate(input: &GiveawayInput) -> Result<NewGiveaway, LedgerError> {
    let form = GiveawayForm {
        name: input.name.trim().to_owned(),
        date: input.date.trim().to_owned(),
    };
    if let Err(errors) = form.validate() {
        warn!(fields = ?errors.field_errors().keys().collect::<Vec<_>>(), "Giveaway rejected");
        return Err(LedgerError::Validation(GIVEAWAY_FIELDS_REQUIRED.to_owned()));
    }

    let date = NaiveDate::parse_from_str(&form.date, DATE_FORMAT).map_err(|e| {
        LedgerError::Validation(format!("invalid date {:?}: {e}", form.date))
    })?;

    Ok(NewGiveaway {
        name: form.name,
        date,
    })
}

fn not_found(id: GiveawayId) -> LedgerError {
    LedgerError::NotFound(format!("giveaway {id} not found"))
}
