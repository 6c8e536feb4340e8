//! Shared application state.
//!
//! [`AppState`] is built once at startup and handed to every handler
//! behind an [`Arc`](std::sync::Arc). It holds the store and auth
//! backends, the page templates and the few settings handlers need.
//! Nothing in it is mutated after construction.

use cekilis_auth::AuthGate;
use cekilis_ledger::{GiveawayRegistry, WinnerLedger};
use cekilis_store::Store;
use chrono::FixedOffset;

use crate::pages::Pages;

/// Shared state available to all handlers.
pub struct AppState {
    /// Backing store for giveaways and winners.
    pub store: Store,
    /// Session and account backend.
    pub auth: AuthGate,
    /// Compiled page templates.
    pub pages: Pages,
    /// Public origin, for links that leave the site (emails).
    pub site_url: String,
    /// Whether session cookies carry `Secure`; set when `site_url` is https.
    pub secure_cookies: bool,
    /// Offset used to print dates in exports.
    pub export_offset: FixedOffset,
}

impl AppState {
    /// Assemble the state.
    ///
    /// # Errors
    ///
    /// Fails if a bundled page template does not compile.
    pub fn new(
        store: Store,
        auth: AuthGate,
        site_url: &str,
        export_offset: FixedOffset,
    ) -> Result<Self, minijinja::Error> {
        let site_url = site_url.trim().trim_end_matches('/');
        Ok(Self {
            store,
            auth,
            pages: Pages::new()?,
            secure_cookies: site_url.starts_with("https://"),
            site_url: site_url.to_owned(),
            export_offset,
        })
    }

    /// Winner ledger over the store.
    pub const fn ledger(&self) -> WinnerLedger<'_> {
        WinnerLedger::new(&self.store)
    }

    /// Giveaway registry over the store.
    pub const fn registry(&self) -> GiveawayRegistry<'_> {
        GiveawayRegistry::new(&self.store)
    }
}
