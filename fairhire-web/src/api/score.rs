//! Scoring endpoints: single-payload pass-through and the bias-fixer batch

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use fairhire_common::Error;

use crate::adjuster::{self, AdjustedCandidate, DEFAULT_CONCURRENCY};
use crate::AppState;

/// POST /api/predict
///
/// Forwards one payload to the scoring service and returns the upstream
/// JSON body verbatim. Upstream failures keep the upstream status code when
/// one was received.
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ScoreError> {
    let response = state
        .scorer
        .predict(&payload)
        .await
        .map_err(ScoreError::from_upstream)?;

    Ok(Json(response))
}

/// Bias-fixer parameters; both are required
#[derive(Debug, Deserialize)]
pub struct BiasFixerRequest {
    #[serde(rename = "minScore")]
    pub min_score: Option<f64>,
    pub tolerance: Option<f64>,
}

/// POST /api/bias-fixer
///
/// Runs the batch adjustment over the whole candidate collection. The batch
/// is all-or-nothing: any upstream failure is a 500, never a partial array.
pub async fn bias_fixer(
    State(state): State<AppState>,
    Json(request): Json<BiasFixerRequest>,
) -> Result<Json<Vec<AdjustedCandidate>>, ScoreError> {
    let min_score = request
        .min_score
        .ok_or_else(|| ScoreError::MissingParam("minScore".to_string()))?;
    let tolerance = request
        .tolerance
        .ok_or_else(|| ScoreError::MissingParam("tolerance".to_string()))?;

    let results = adjuster::run_batch(
        &state.store,
        state.scorer.as_ref(),
        min_score,
        tolerance,
        DEFAULT_CONCURRENCY,
    )
    .await
    .map_err(|e| ScoreError::BatchFailed(e.to_string()))?;

    Ok(Json(results))
}

/// Scoring endpoint error types for HTTP responses
#[derive(Debug)]
pub enum ScoreError {
    MissingParam(String),
    /// Pass-through failure: carries the upstream status when available
    Upstream {
        status: Option<u16>,
        message: String,
    },
    BatchFailed(String),
}

impl ScoreError {
    fn from_upstream(e: Error) -> Self {
        match e {
            Error::Upstream { status, message } => ScoreError::Upstream { status, message },
            other => ScoreError::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ScoreError::MissingParam(name) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required parameter: {}", name),
            ),
            ScoreError::Upstream { status, message } => {
                let code = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (code, message)
            }
            ScoreError::BatchFailed(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
