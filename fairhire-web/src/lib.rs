//! fairhire-web library - HTTP service for the FairHire backend
//!
//! Serves the candidate dataset and country demographics, proxies scoring
//! requests to the external scoring service, runs the bias-fixer batch
//! pipeline, and handles login/signup with a durable audit log.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

pub mod adjuster;
pub mod api;
pub mod fixtures;
pub mod scoring;

use fixtures::FixtureStore;
use scoring::ScoringClient;

/// Application state shared across HTTP handlers
///
/// Constructed once in `main` and passed into the router; no process-wide
/// globals. The fixture store is read-only after load, so sharing it across
/// handlers needs no locking.
#[derive(Clone)]
pub struct AppState {
    /// In-memory fixture datasets (read-only after load)
    pub store: Arc<FixtureStore>,
    /// Database connection pool (audit log, users, sessions)
    pub db: SqlitePool,
    /// Outbound client for the scoring service
    pub scorer: Arc<ScoringClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: FixtureStore, db: SqlitePool, scorer: ScoringClient) -> Self {
        Self {
            store: Arc::new(store),
            db,
            scorer: Arc::new(scorer),
        }
    }
}

/// Build application router
///
/// Every /api response carries `Cache-Control: no-store, max-age=0`; the
/// dataset endpoints must never be cached by intermediaries.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/individuals", get(api::candidates::list_individuals))
        .route("/summary", get(api::candidates::summary))
        .route("/countries", get(api::candidates::list_countries))
        .route("/country-stats/:country", get(api::candidates::country_stats))
        .route("/login", post(api::auth::login))
        .route("/signup", post(api::auth::signup))
        .route("/logout", get(api::auth::logout))
        .route("/logs", get(api::auth::logs))
        .route("/export", get(api::export::export_csv))
        .route("/predict", post(api::score::predict))
        .route("/bias-fixer", post(api::score::bias_fixer))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ));

    Router::new()
        .nest("/api", api)
        .route("/", get(api::ui::serve_index))
        .merge(api::health_routes())
        .fallback(api::ui::serve_index)
        .with_state(state)
}
