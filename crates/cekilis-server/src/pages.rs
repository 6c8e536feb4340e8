//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with `minijinja`.
//! Every page shares `base.html`, which shows the signed-in operator and
//! any `error` / `success` banner passed in the query string.
//!
//! Failures to load a list do not fail the page: the page renders with an
//! empty list and an error banner instead.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use cekilis_auth::Identity;
use cekilis_ledger::{announcement_message, export_csv, export_file_name, filter_and_sort};
use cekilis_types::{Giveaway, GiveawayId, Winner};
use chrono::Utc;
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::session::{CurrentSession, resolve};
use crate::state::AppState;

/// Banner shown when a list cannot be loaded.
const LOAD_ERROR: &str = "Veriler yüklenirken bir hata oluştu";

/// Bundled templates, by name.
const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("sign_in.html", include_str!("../templates/sign_in.html")),
    ("sign_up.html", include_str!("../templates/sign_up.html")),
    ("forgot_password.html", include_str!("../templates/forgot_password.html")),
    ("reset_password.html", include_str!("../templates/reset_password.html")),
    ("giveaways.html", include_str!("../templates/giveaways.html")),
    ("winners.html", include_str!("../templates/winners.html")),
];

/// Compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    /// Compile the bundled templates.
    ///
    /// # Errors
    ///
    /// Fails if a template has a syntax error.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render template `name` with `ctx`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Internal`] if the template is unknown or fails to render.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, ApiError> {
        Ok(Html(self.env.get_template(name)?.render(ctx)?))
    }
}

/// `error` / `success` banner parameters.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Flash {
    /// Error banner text.
    #[serde(default)]
    pub error: Option<String>,
    /// Success banner text.
    #[serde(default)]
    pub success: Option<String>,
}

/// Search box of the winner page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text filter.
    #[serde(default)]
    pub q: String,
}

/// A giveaway as the pages show it.
#[derive(Debug, Serialize)]
struct GiveawayCard {
    id: GiveawayId,
    name: String,
    /// `YYYY-MM-DD`, for the date input.
    date: String,
    /// `dd.mm.yyyy`, for display.
    label: String,
}

impl From<&Giveaway> for GiveawayCard {
    fn from(giveaway: &Giveaway) -> Self {
        Self {
            id: giveaway.id,
            name: giveaway.name.clone(),
            date: giveaway.date.format("%Y-%m-%d").to_string(),
            label: giveaway.date.format("%d.%m.%Y").to_string(),
        }
    }
}

/// A winner plus the text shown next to it.
#[derive(Debug, Serialize)]
struct WinnerRow {
    winner: Winner,
    message: String,
    won_on: String,
}

async fn render_open_page(
    state: &AppState,
    headers: &HeaderMap,
    name: &str,
    flash: &Flash,
) -> Result<Html<String>, ApiError> {
    let user: Option<Identity> = resolve(state, headers).await.map(|s| s.identity);
    state.pages.render(name, context! { user, flash })
}

/// `GET /healthz`
pub async fn healthz() -> &'static str {
    "ok"
}

/// `GET /`
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    render_open_page(&state, &headers, "index.html", &flash).await
}

/// `GET /sign-in`
pub async fn sign_in_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    render_open_page(&state, &headers, "sign_in.html", &flash).await
}

/// `GET /sign-up`
pub async fn sign_up_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    render_open_page(&state, &headers, "sign_up.html", &flash).await
}

/// `GET /forgot-password`
pub async fn forgot_password_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    render_open_page(&state, &headers, "forgot_password.html", &flash).await
}

/// `GET /protected/reset-password`
pub async fn reset_password_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    state.pages.render(
        "reset_password.html",
        context! { user => session.identity, flash },
    )
}

/// `GET /protected`: the giveaway list.
pub async fn giveaways_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, ApiError> {
    let (giveaways, load_error) = match state.registry().list().await {
        Ok(giveaways) => (giveaways.iter().map(GiveawayCard::from).collect(), None),
        Err(e) => {
            error!(error = %e, "Giveaway list failed");
            (Vec::new(), Some(format!("{LOAD_ERROR}: {e}")))
        }
    };

    state.pages.render(
        "giveaways.html",
        context! { user => session.identity, flash, giveaways, load_error },
    )
}

/// `GET /protected/giveaways/{id}`: winners of one giveaway.
pub async fn winners_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
    Query(search): Query<SearchQuery>,
) -> Result<Html<String>, ApiError> {
    let giveaway = state.registry().get(GiveawayId(id)).await?;

    let (winners, load_error) = match state.ledger().list(Some(giveaway.id)).await {
        Ok(winners) => (winners, None),
        Err(e) => {
            error!(giveaway_id = %giveaway.id, error = %e, "Winner list failed");
            (Vec::new(), Some(format!("{LOAD_ERROR}: {e}")))
        }
    };
    let total = winners.len();

    let rows: Vec<WinnerRow> = filter_and_sort(winners, &search.q)
        .into_iter()
        .map(|winner| WinnerRow {
            message: announcement_message(&winner.handle),
            won_on: winner
                .created_at
                .with_timezone(&state.export_offset)
                .format("%d.%m.%Y")
                .to_string(),
            winner,
        })
        .collect();

    state.pages.render(
        "winners.html",
        context! {
            user => session.identity,
            flash => Flash::default(),
            giveaway => GiveawayCard::from(&giveaway),
            query => search.q,
            rows,
            total,
            load_error,
        },
    )
}

/// `GET /protected/giveaways/{id}/export`: CSV download.
pub async fn export_winners(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let giveaway = state.registry().get(GiveawayId(id)).await?;
    let winners = state.ledger().list(Some(giveaway.id)).await?;

    let csv = export_csv(&winners, state.export_offset)?;
    let today = Utc::now().with_timezone(&state.export_offset).date_naive();
    let file_name = export_file_name(&giveaway, today);
    info!(giveaway_id = %giveaway.id, rows = winners.len(), %file_name, "Winners exported");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| ApiError::Internal(format!("bad file name: {e}")))?;
    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
