//! Turning configuration into running backends.
//!
//! [`build_state`] connects the configured store and auth backends and
//! assembles the [`AppState`]. For `PostgreSQL` it also runs pending
//! migrations before the server starts taking requests.

use cekilis_auth::{AuthGate, StaticAuth, SupabaseAuth};
use cekilis_ledger::{ExportError, utc_offset};
use cekilis_store::{MemoryStore, PostgresConfig, PostgresStore, PostgrestStore, Store, StoreError};
use tracing::{info, warn};

use crate::config::{AppConfig, AuthBackend, AuthSection, StoreBackend, StoreSection};
use crate::state::AppState;

/// Errors that can occur while wiring the application together.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The store could not be reached or migrated.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A backend is selected but its settings are missing.
    #[error("missing config: {0}")]
    Missing(&'static str),

    /// The export offset is out of range.
    #[error("export config: {0}")]
    Export(#[from] ExportError),

    /// A bundled template failed to compile.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Connect the configured store backend.
///
/// # Errors
///
/// [`StartupError::Missing`] if the REST backend has no URL or key,
/// [`StartupError::Store`] if `PostgreSQL` is unreachable or a migration
/// fails.
pub async fn build_store(config: &StoreSection) -> Result<Store, StartupError> {
    let store = match config.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Store::from(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let pg_config =
                PostgresConfig::new(&config.postgres_url).with_max_connections(config.max_connections);
            let store = PostgresStore::connect(&pg_config).await?;
            store.run_migrations().await?;
            Store::from(store)
        }
        StoreBackend::Postgrest => {
            if config.rest_url.is_empty() {
                return Err(StartupError::Missing("store.rest_url"));
            }
            if config.api_key.is_empty() {
                return Err(StartupError::Missing("store.api_key"));
            }
            Store::from(PostgrestStore::new(&config.rest_url, &config.api_key))
        }
    };
    info!(backend = store.name(), "Store ready");
    Ok(store)
}

/// Build the configured auth backend.
///
/// # Errors
///
/// [`StartupError::Missing`] if the hosted backend has no URL or key.
pub fn build_auth(config: &AuthSection) -> Result<AuthGate, StartupError> {
    let auth = match config.backend {
        AuthBackend::Static => {
            if config.accounts.is_empty() {
                warn!("Static auth has no accounts; nobody can sign in until one signs up");
            }
            AuthGate::from(StaticAuth::new(&config.accounts))
        }
        AuthBackend::Supabase => {
            if config.url.is_empty() {
                return Err(StartupError::Missing("auth.url"));
            }
            if config.api_key.is_empty() {
                return Err(StartupError::Missing("auth.api_key"));
            }
            AuthGate::from(SupabaseAuth::new(&config.url, &config.api_key))
        }
    };
    info!(backend = auth.name(), "Auth ready");
    Ok(auth)
}

/// Assemble the application state from configuration.
///
/// # Errors
///
/// Any failure of [`build_store`] or [`build_auth`], an out-of-range
/// export offset, or a broken bundled template.
pub async fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let export_offset = utc_offset(config.export.utc_offset_minutes)?;
    let auth = build_auth(&config.auth)?;
    let store = build_store(&config.store).await?;
    Ok(AppState::new(
        store,
        auth,
        &config.server.site_url,
        export_offset,
    )?)
}
