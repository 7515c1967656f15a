//! UI serving routes
//!
//! Serves the bundled single-page frontend. Non-API paths fall back to the
//! same page so client-side routing works after a reload.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// GET / (and any non-API fallback)
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
