//! The winner ledger.
//!
//! CRUD over winner records with one invariant: a trimmed handle is held
//! by at most one winner across every giveaway.
//!
//! Create and update first scan the store for another holder of the
//! handle and refuse with [`LedgerError::Conflict`] if one exists. The
//! scan and the write are two separate store calls, so two concurrent
//! writers can both pass the scan. The schema's unique index catches that
//! case: a [`StoreError::UniqueViolation`] from the write is reported as
//! the same conflict.

use std::collections::BTreeMap;

use cekilis_store::{Store, StoreError, WinnerFilter};
use cekilis_types::{GiveawayId, NewWinner, Winner, WinnerId, WinnerInput, WinnerView};
use tracing::{info, warn};

use crate::error::{GIVEAWAY_MISSING, HANDLE_REQUIRED, HANDLE_TAKEN, LedgerError};

/// Winner operations bound to a store.
pub struct WinnerLedger<'a> {
    store: &'a Store,
}

impl<'a> WinnerLedger<'a> {
    /// Create a ledger over `store`.
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Record a new winner.
    ///
    /// The handle is trimmed before the uniqueness scan and stored in its
    /// trimmed form. Performs one read and one write; a rejected input
    /// performs neither.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if the handle is blank or the
    ///   giveaway is missing.
    /// - [`LedgerError::Conflict`] if another winner holds the handle.
    /// - [`LedgerError::Store`] on any other store failure.
    pub async fn create(&self, candidate: &WinnerInput) -> Result<Winner, LedgerError> {
        let winner = normalize(candidate)?;
        self.ensure_handle_free(&winner.handle, None).await?;

        let created = self
            .store
            .insert_winner(&winner)
            .await
            .map_err(|e| write_error(e, &winner))?;

        info!(
            winner_id = %created.id,
            giveaway_id = %created.giveaway_id,
            handle = %created.handle,
            "Winner recorded"
        );
        Ok(created)
    }

    /// Replace every field of winner `id` with `patch`.
    ///
    /// The uniqueness scan ignores the record being updated, so keeping
    /// the current handle always passes.
    ///
    /// # Errors
    ///
    /// As [`WinnerLedger::create`], plus [`LedgerError::NotFound`] when no
    /// winner has this id.
    pub async fn update(&self, id: WinnerId, patch: &WinnerInput) -> Result<Winner, LedgerError> {
        let winner = normalize(patch)?;
        self.ensure_handle_free(&winner.handle, Some(id)).await?;

        let updated = self
            .store
            .update_winner(id, &winner)
            .await
            .map_err(|e| write_error(e, &winner))?
            .ok_or_else(|| LedgerError::NotFound(format!("winner {id} not found")))?;

        info!(winner_id = %id, handle = %updated.handle, "Winner updated");
        Ok(updated)
    }

    /// Delete winner `id` unconditionally.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] when no winner has this id, or
    /// [`LedgerError::Store`] on store failure.
    pub async fn delete(&self, id: WinnerId) -> Result<(), LedgerError> {
        if !self.store.delete_winner(id).await? {
            return Err(LedgerError::NotFound(format!("winner {id} not found")));
        }
        info!(winner_id = %id, "Winner deleted");
        Ok(())
    }

    /// Winners of `giveaway_id` (or of every giveaway), most recent first.
    pub async fn list(&self, giveaway_id: Option<GiveawayId>) -> Result<Vec<Winner>, LedgerError> {
        let winners = self
            .store
            .select_winners(&WinnerFilter::for_giveaway(giveaway_id))
            .await?;
        Ok(winners)
    }

    /// Like [`WinnerLedger::list`], with each winner's giveaway embedded.
    pub async fn list_with_giveaway(
        &self,
        giveaway_id: Option<GiveawayId>,
    ) -> Result<Vec<WinnerView>, LedgerError> {
        let winners = self.list(giveaway_id).await?;

        let giveaways: BTreeMap<_, _> = match giveaway_id {
            Some(id) => self
                .store
                .get_giveaway(id)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect(),
            None => self
                .store
                .list_giveaways()
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect(),
        };

        Ok(winners
            .into_iter()
            .map(|winner| {
                let giveaway = giveaways.get(&winner.giveaway_id).cloned();
                WinnerView { winner, giveaway }
            })
            .collect())
    }

    /// Fail with a conflict if anyone other than `own_id` holds `handle`.
    async fn ensure_handle_free(
        &self,
        handle: &str,
        own_id: Option<WinnerId>,
    ) -> Result<(), LedgerError> {
        let holders = self
            .store
            .select_winners(&WinnerFilter::holding_handle(handle, own_id))
            .await?;

        if let Some(holder) = holders.first() {
            warn!(
                handle,
                held_by = %holder.id,
                giveaway_id = %holder.giveaway_id,
                "Handle already won"
            );
            return Err(LedgerError::Conflict(HANDLE_TAKEN.to_owned()));
        }
        Ok(())
    }
}

/// Validate a raw input and produce the record to write.
///
/// # Errors
///
/// [`LedgerError::Validation`] if the trimmed handle is empty or the
/// giveaway id is absent.
pub fn normalize(input: &WinnerInput) -> Result<NewWinner, LedgerError> {
    let handle = input.handle.trim();
    if handle.is_empty() {
        return Err(LedgerError::Validation(HANDLE_REQUIRED.to_owned()));
    }
    let giveaway_id = input
        .giveaway_id
        .ok_or_else(|| LedgerError::Validation("giveawayId required".to_owned()))?;

    Ok(NewWinner {
        giveaway_id,
        handle: handle.to_owned(),
        full_name: input.full_name.clone(),
        phone: input.phone.clone(),
        address: input.address.clone(),
        notes: input
            .notes
            .as_deref()
            .filter(|notes| !notes.trim().is_empty())
            .map(ToOwned::to_owned),
    })
}

/// Map a failed winner write onto the ledger taxonomy.
fn write_error(err: StoreError, winner: &NewWinner) -> LedgerError {
    match err {
        StoreError::UniqueViolation(detail) => {
            warn!(handle = %winner.handle, %detail, "Unique index rejected handle");
            LedgerError::Conflict(HANDLE_TAKEN.to_owned())
        }
        StoreError::ForeignKey(detail) => {
            warn!(giveaway_id = %winner.giveaway_id, %detail, "Winner references missing giveaway");
            LedgerError::Validation(GIVEAWAY_MISSING.to_owned())
        }
        other => LedgerError::Store(other),
    }
}
