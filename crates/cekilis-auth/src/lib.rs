//! Session-derived identity.
//!
//! [`AuthGate`] answers one question for the HTTP layer: who, if anyone,
//! owns this session token. It also drives the account flows behind the
//! sign-in, sign-up and password reset forms.
//!
//! Two backends:
//!
//! - [`SupabaseAuth`]: the hosted GoTrue REST API.
//! - [`StaticAuth`]: a fixed in-memory account table for local
//!   development and tests.

pub mod error;
pub mod fixed;
pub mod gate;
pub mod identity;
pub mod supabase;

pub use error::AuthError;
pub use fixed::StaticAuth;
pub use gate::AuthGate;
pub use identity::{Identity, Session, StaticAccount};
pub use supabase::SupabaseAuth;
