//! Axum router construction.
//!
//! Assembles the JSON API, the pages and the account actions into a
//! single [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, giveaways, pages, session, winners};

/// Build the complete router.
///
/// Open routes:
/// - `GET /`, `GET /healthz`
/// - `GET|POST /sign-in`, `/sign-up`, `/forgot-password`
/// - `POST /sign-out`, `GET /auth/callback`
///
/// JSON API (writes need a session):
/// - `GET|POST|PUT|DELETE /giveaways`
/// - `GET|POST|PUT|DELETE /winners`
///
/// Pages behind a session:
/// - `GET /protected`
/// - `GET|POST /protected/reset-password`
/// - `GET /protected/giveaways/{id}`
/// - `GET /protected/giveaways/{id}/export`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/giveaways",
            get(giveaways::list_giveaways)
                .post(giveaways::create_giveaway)
                .put(giveaways::update_giveaway)
                .delete(giveaways::delete_giveaway),
        )
        .route(
            "/winners",
            get(winners::list_winners)
                .post(winners::create_winner)
                .put(winners::update_winner)
                .delete(winners::delete_winner),
        )
        .route_layer(from_fn_with_state(Arc::clone(&state), session::guard_writes));

    let protected = Router::new()
        .route("/protected", get(pages::giveaways_page))
        .route(
            "/protected/reset-password",
            get(pages::reset_password_page).post(auth::reset_password),
        )
        .route("/protected/giveaways/{id}", get(pages::winners_page))
        .route("/protected/giveaways/{id}/export", get(pages::export_winners))
        .route_layer(from_fn_with_state(Arc::clone(&state), session::require_session));

    Router::new()
        .route("/", get(pages::index))
        .route("/healthz", get(pages::healthz))
        .route("/sign-in", get(pages::sign_in_page).post(auth::sign_in))
        .route("/sign-up", get(pages::sign_up_page).post(auth::sign_up))
        .route(
            "/forgot-password",
            get(pages::forgot_password_page).post(auth::forgot_password),
        )
        .route("/sign-out", post(auth::sign_out))
        .route("/auth/callback", get(auth::callback))
        .merge(api)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
