//! Static dashboard page.
//!
//! The page carries no server-side data; its script polls `/api/data` every
//! two seconds and renders the readings newest-first.

use axum::response::{Html, IntoResponse};

/// Dashboard markup, served verbatim.
pub const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Dashboard handler - returns the polling HTML view.
pub async fn dashboard() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}
