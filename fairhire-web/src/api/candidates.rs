//! Candidate dataset read endpoints
//!
//! All reads come straight from the in-memory fixture store; no database
//! access and no auth gating on this surface.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::fixtures::{Candidate, CountryStats, Summary};
use crate::AppState;

/// GET /api/individuals
///
/// Returns the full normalized candidate collection in load order.
pub async fn list_individuals(State(state): State<AppState>) -> Json<Vec<Candidate>> {
    Json(state.store.get_all().to_vec())
}

/// GET /api/summary
pub async fn summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.store.summarize())
}

/// GET /api/countries
///
/// Sorted, duplicate-free list of every country with statistics.
pub async fn list_countries(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.list_countries())
}

/// GET /api/country-stats/:country
///
/// Case-insensitive lookup; an unknown country is a 404, not a default
/// object.
pub async fn country_stats(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<CountryStats>, CountryNotFound> {
    match state.store.country_stats(&country) {
        Some(stats) => Ok(Json(stats.clone())),
        None => Err(CountryNotFound(country)),
    }
}

/// 404 response for an unknown country
#[derive(Debug)]
pub struct CountryNotFound(pub String);

impl IntoResponse for CountryNotFound {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": format!("Country not found: {}", self.0),
        }));
        (StatusCode::NOT_FOUND, body).into_response()
    }
}
