//! Liveness probe and the stylesheet

use axum::response::IntoResponse;
use http::header;

const STYLESHEET: &str = include_str!("../../static/admin.css");

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// `GET /static/admin.css`
pub async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLESHEET,
    )
}
