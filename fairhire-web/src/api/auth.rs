//! Authentication, signup, logout, and the admin-only audit log
//!
//! Sessions are durable rows in the sessions table, carried by an HttpOnly
//! cookie; every gated request performs a store lookup. The audit insert on
//! login is best-effort by design: its failure is logged and the login still
//! succeeds.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use fairhire_common::db::{audit, sessions, users};

use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "fairhire_session";

/// Login request fields; both are required
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Signup request fields; role defaults to `user`
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let username = non_empty(request.username)
        .ok_or_else(|| AuthError::MissingFields("username".to_string()))?;
    let password = non_empty(request.password)
        .ok_or_else(|| AuthError::MissingFields("password".to_string()))?;

    let user = users::verify_login(&state.db, &username, &password)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::InvalidCredentials)?;

    let token = sessions::create(&state.db, &user.username, &user.role)
        .await
        .map_err(AuthError::internal)?;

    // Best-effort audit: fire, log failure, continue. Login already
    // succeeded; a lost audit row must not turn it into a 500.
    let ip = client_ip(&headers);
    if let Err(e) = audit::record_login(&state.db, &user.username, &ip).await {
        warn!("Audit insert failed for '{}': {}", user.username, e);
    }

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );
    let body = Json(json!({
        "status": "ok",
        "user": { "username": user.username, "role": user.role },
    }));

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), body).into_response())
}

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    let username = non_empty(request.username)
        .ok_or_else(|| AuthError::MissingFields("username".to_string()))?;
    let password = non_empty(request.password)
        .ok_or_else(|| AuthError::MissingFields("password".to_string()))?;

    let role = request.role.unwrap_or_else(|| "user".to_string());
    if role != "admin" && role != "user" {
        return Err(AuthError::MissingFields(format!("invalid role '{}'", role)));
    }

    let created = users::create_user(&state.db, &username, &password, &role)
        .await
        .map_err(AuthError::internal)?;
    if !created {
        return Err(AuthError::UsernameTaken(username));
    }

    Ok(Json(json!({ "status": "created" })))
}

/// GET /api/logout
///
/// Destroys the session row if one exists; idempotent either way.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    if let Some(token) = session_token(&headers) {
        sessions::delete(&state.db, &token)
            .await
            .map_err(AuthError::internal)?;
    }

    // Expire the cookie on the client regardless
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    let body = Json(json!({ "status": "ok" }));

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), body).into_response())
}

/// GET /api/logs
///
/// Admin-only: the full login audit log, most recent first.
pub async fn logs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<audit::LoginEvent>>, AuthError> {
    let session = current_session(&state, &headers)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    if session.role != "admin" {
        return Err(AuthError::Forbidden);
    }

    let events = audit::recent_logins(&state.db)
        .await
        .map_err(AuthError::internal)?;
    Ok(Json(events))
}

/// Resolve the session carried by the request cookie, if any
pub async fn current_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<sessions::Session>, AuthError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    sessions::find(&state.db, &token)
        .await
        .map_err(AuthError::internal)
}

/// Extract the session token from the Cookie header
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Requesting IP: first X-Forwarded-For entry, else "unknown"
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingFields(String),
    InvalidCredentials,
    UsernameTaken(String),
    Unauthorized,
    Forbidden,
    Internal(String),
}

impl AuthError {
    fn internal(e: fairhire_common::Error) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingFields(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing or invalid field: {}", field))
            }
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AuthError::UsernameTaken(name) => {
                (StatusCode::CONFLICT, format!("Username taken: {}", name))
            }
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Admin only".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
