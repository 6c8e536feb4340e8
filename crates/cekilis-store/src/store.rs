//! The store capability consumed by the ledger and registry.
//!
//! [`Store`] uses enum dispatch instead of a trait object because async
//! methods are not dyn-compatible. Each backend exposes the same set of
//! typed operations; this type only forwards to the selected one.

use cekilis_types::{Giveaway, GiveawayId, NewGiveaway, NewWinner, Winner, WinnerId};

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::postgres::PostgresStore;
use crate::postgrest::PostgrestStore;

/// Conjunctive filter for winner selection. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnerFilter {
    /// Only winners of this giveaway.
    pub giveaway_id: Option<GiveawayId>,
    /// Only winners whose trimmed handle equals this value.
    pub handle: Option<String>,
    /// Skip this winner (self-exclusion on update).
    pub exclude_id: Option<WinnerId>,
}

impl WinnerFilter {
    /// Winners of a single giveaway, or all winners when `None`.
    pub const fn for_giveaway(giveaway_id: Option<GiveawayId>) -> Self {
        Self {
            giveaway_id,
            handle: None,
            exclude_id: None,
        }
    }

    /// Winners holding `handle` in any giveaway, other than `exclude_id`.
    pub fn holding_handle(handle: &str, exclude_id: Option<WinnerId>) -> Self {
        Self {
            giveaway_id: None,
            handle: Some(handle.trim().to_owned()),
            exclude_id,
        }
    }

    /// Whether `winner` passes this filter.
    pub(crate) fn matches(&self, winner: &Winner) -> bool {
        self.giveaway_id.is_none_or(|id| winner.giveaway_id == id)
            && self
                .handle
                .as_deref()
                .is_none_or(|handle| winner.handle.trim() == handle)
            && self.exclude_id.is_none_or(|id| winner.id != id)
    }
}

/// Row-level access to the giveaway and winner tables.
///
/// Constructed once at startup and shared read-only by every request.
#[derive(Clone)]
pub enum Store {
    /// Direct `PostgreSQL` connection pool.
    Postgres(PostgresStore),
    /// Hosted database over its REST interface.
    Postgrest(PostgrestStore),
    /// In-process tables.
    Memory(MemoryStore),
}

impl Store {
    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Postgrest(_) => "postgrest",
            Self::Memory(_) => "memory",
        }
    }

    /// All giveaways, newest draw date first.
    pub async fn list_giveaways(&self) -> Result<Vec<Giveaway>, StoreError> {
        match self {
            Self::Postgres(store) => store.list_giveaways().await,
            Self::Postgrest(store) => store.list_giveaways().await,
            Self::Memory(store) => Ok(store.list_giveaways().await),
        }
    }

    /// A single giveaway by id.
    pub async fn get_giveaway(&self, id: GiveawayId) -> Result<Option<Giveaway>, StoreError> {
        match self {
            Self::Postgres(store) => store.get_giveaway(id).await,
            Self::Postgrest(store) => store.get_giveaway(id).await,
            Self::Memory(store) => Ok(store.get_giveaway(id).await),
        }
    }

    /// Insert a giveaway; the store assigns its id.
    pub async fn insert_giveaway(&self, giveaway: &NewGiveaway) -> Result<Giveaway, StoreError> {
        match self {
            Self::Postgres(store) => store.insert_giveaway(giveaway).await,
            Self::Postgrest(store) => store.insert_giveaway(giveaway).await,
            Self::Memory(store) => Ok(store.insert_giveaway(giveaway).await),
        }
    }

    /// Overwrite a giveaway. `None` when no row has this id.
    pub async fn update_giveaway(
        &self,
        id: GiveawayId,
        giveaway: &NewGiveaway,
    ) -> Result<Option<Giveaway>, StoreError> {
        match self {
            Self::Postgres(store) => store.update_giveaway(id, giveaway).await,
            Self::Postgrest(store) => store.update_giveaway(id, giveaway).await,
            Self::Memory(store) => Ok(store.update_giveaway(id, giveaway).await),
        }
    }

    /// Delete a giveaway. `false` when no row had this id.
    pub async fn delete_giveaway(&self, id: GiveawayId) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(store) => store.delete_giveaway(id).await,
            Self::Postgrest(store) => store.delete_giveaway(id).await,
            Self::Memory(store) => Ok(store.delete_giveaway(id).await),
        }
    }

    /// Winners matching `filter`, most recently created first.
    pub async fn select_winners(&self, filter: &WinnerFilter) -> Result<Vec<Winner>, StoreError> {
        match self {
            Self::Postgres(store) => store.select_winners(filter).await,
            Self::Postgrest(store) => store.select_winners(filter).await,
            Self::Memory(store) => Ok(store.select_winners(filter).await),
        }
    }

    /// Insert a winner; the store assigns `id` and `created_at`.
    pub async fn insert_winner(&self, winner: &NewWinner) -> Result<Winner, StoreError> {
        match self {
            Self::Postgres(store) => store.insert_winner(winner).await,
            Self::Postgrest(store) => store.insert_winner(winner).await,
            Self::Memory(store) => store.insert_winner(winner).await,
        }
    }

    /// Overwrite every field of a winner. `None` when no row has this id.
    pub async fn update_winner(
        &self,
        id: WinnerId,
        winner: &NewWinner,
    ) -> Result<Option<Winner>, StoreError> {
        match self {
            Self::Postgres(store) => store.update_winner(id, winner).await,
            Self::Postgrest(store) => store.update_winner(id, winner).await,
            Self::Memory(store) => store.update_winner(id, winner).await,
        }
    }

    /// Delete a winner. `false` when no row had this id.
    pub async fn delete_winner(&self, id: WinnerId) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(store) => store.delete_winner(id).await,
            Self::Postgrest(store) => store.delete_winner(id).await,
            Self::Memory(store) => Ok(store.delete_winner(id).await),
        }
    }
}

impl From<MemoryStore> for Store {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PostgresStore> for Store {
    fn from(store: PostgresStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<PostgrestStore> for Store {
    fn from(store: PostgrestStore) -> Self {
        Self::Postgrest(store)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn winner(id: i64, giveaway: i64, handle: &str) -> Winner {
        Winner {
            id: WinnerId(id),
            giveaway_id: GiveawayId(giveaway),
            handle: handle.to_owned(),
            full_name: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(WinnerFilter::default().matches(&winner(1, 1, "alice")));
    }

    #[test]
    fn handle_filter_compares_trimmed_values() {
        let filter = WinnerFilter::holding_handle("  alice ", None);
        assert_eq!(filter.handle.as_deref(), Some("alice"));
        assert!(filter.matches(&winner(1, 1, "alice")));
        assert!(!filter.matches(&winner(2, 1, "Alice")));
    }

    #[test]
    fn exclusion_skips_own_row() {
        let filter = WinnerFilter::holding_handle("alice", Some(WinnerId(1)));
        assert!(!filter.matches(&winner(1, 1, "alice")));
        assert!(filter.matches(&winner(2, 2, "alice")));
    }

    #[test]
    fn giveaway_filter_scopes_rows() {
        let filter = WinnerFilter::for_giveaway(Some(GiveawayId(2)));
        assert!(filter.matches(&winner(1, 2, "a")));
        assert!(!filter.matches(&winner(2, 3, "b")));
    }
}
