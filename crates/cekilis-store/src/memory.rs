//! In-process backend.
//!
//! Holds both tables behind a single async mutex. Every operation runs
//! entirely under the lock, so the unique handle constraint and the
//! foreign key are enforced atomically, the same way the `PostgreSQL`
//! schema enforces them. Deleting a giveaway cascades to its winners.
//!
//! Used by tests and for running the panel locally without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use cekilis_types::{Giveaway, GiveawayId, NewGiveaway, NewWinner, Winner, WinnerId};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::WinnerFilter;

/// Both tables plus their id sequences.
#[derive(Debug, Default)]
struct Tables {
    giveaways: BTreeMap<GiveawayId, Giveaway>,
    winners: BTreeMap<WinnerId, Winner>,
    last_giveaway_id: i64,
    last_winner_id: i64,
}

impl Tables {
    fn next_giveaway_id(&mut self) -> GiveawayId {
        self.last_giveaway_id = self.last_giveaway_id.saturating_add(1);
        GiveawayId(self.last_giveaway_id)
    }

    fn next_winner_id(&mut self) -> WinnerId {
        self.last_winner_id = self.last_winner_id.saturating_add(1);
        WinnerId(self.last_winner_id)
    }

    /// Enforce the foreign key and the unique handle constraint for a
    /// write of `winner` into row `own_id` (if it already exists).
    fn check_winner_constraints(
        &self,
        winner: &NewWinner,
        own_id: Option<WinnerId>,
    ) -> Result<(), StoreError> {
        if !self.giveaways.contains_key(&winner.giveaway_id) {
            return Err(StoreError::ForeignKey(format!(
                "Key (cekilis_id)=({}) is not present in table \"cekilisler\"",
                winner.giveaway_id
            )));
        }

        let handle = winner.handle.trim();
        let taken = self
            .winners
            .values()
            .any(|existing| Some(existing.id) != own_id && existing.handle.trim() == handle);
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "Key (btrim(hesap_adi))=({handle}) already exists"
            )));
        }

        Ok(())
    }
}

/// Store backend holding all rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // cekilisler
    // -----------------------------------------------------------------------

    pub(crate) async fn list_giveaways(&self) -> Vec<Giveaway> {
        let tables = self.tables.lock().await;
        let mut giveaways: Vec<Giveaway> = tables.giveaways.values().cloned().collect();
        giveaways.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        giveaways
    }

    pub(crate) async fn get_giveaway(&self, id: GiveawayId) -> Option<Giveaway> {
        self.tables.lock().await.giveaways.get(&id).cloned()
    }

    pub(crate) async fn insert_giveaway(&self, giveaway: &NewGiveaway) -> Giveaway {
        let mut tables = self.tables.lock().await;
        let id = tables.next_giveaway_id();
        let row = Giveaway {
            id,
            name: giveaway.name.clone(),
            date: giveaway.date,
        };
        tables.giveaways.insert(id, row.clone());
        row
    }

    pub(crate) async fn update_giveaway(
        &self,
        id: GiveawayId,
        giveaway: &NewGiveaway,
    ) -> Option<Giveaway> {
        let mut tables = self.tables.lock().await;
        let row = tables.giveaways.get_mut(&id)?;
        row.name.clone_from(&giveaway.name);
        row.date = giveaway.date;
        Some(row.clone())
    }

    pub(crate) async fn delete_giveaway(&self, id: GiveawayId) -> bool {
        let mut tables = self.tables.lock().await;
        let removed = tables.giveaways.remove(&id).is_some();
        if removed {
            tables.winners.retain(|_, winner| winner.giveaway_id != id);
        }
        removed
    }

    // -----------------------------------------------------------------------
    // kazananlar
    // -----------------------------------------------------------------------

    pub(crate) async fn select_winners(&self, filter: &WinnerFilter) -> Vec<Winner> {
        let tables = self.tables.lock().await;
        let mut winners: Vec<Winner> = tables
            .winners
            .values()
            .filter(|winner| filter.matches(winner))
            .cloned()
            .collect();
        winners.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        winners
    }

    pub(crate) async fn insert_winner(&self, winner: &NewWinner) -> Result<Winner, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check_winner_constraints(winner, None)?;

        let id = tables.next_winner_id();
        let row = Winner {
            id,
            giveaway_id: winner.giveaway_id,
            handle: winner.handle.clone(),
            full_name: winner.full_name.clone(),
            phone: winner.phone.clone(),
            address: winner.address.clone(),
            notes: winner.notes.clone(),
            created_at: Utc::now(),
        };
        tables.winners.insert(id, row.clone());
        Ok(row)
    }

    pub(crate) async fn update_winner(
        &self,
        id: WinnerId,
        winner: &NewWinner,
    ) -> Result<Option<Winner>, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.winners.contains_key(&id) {
            return Ok(None);
        }
        tables.check_winner_constraints(winner, Some(id))?;

        let Some(row) = tables.winners.get_mut(&id) else {
            return Ok(None);
        };
        row.giveaway_id = winner.giveaway_id;
        row.handle.clone_from(&winner.handle);
        row.full_name.clone_from(&winner.full_name);
        row.phone.clone_from(&winner.phone);
        row.address.clone_from(&winner.address);
        row.notes.clone_from(&winner.notes);
        Ok(Some(row.clone()))
    }

    pub(crate) async fn delete_winner(&self, id: WinnerId) -> bool {
        self.tables.lock().await.winners.remove(&id).is_some()
    }
}
