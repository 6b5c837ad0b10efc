//! Web server setup and configuration

use crate::{pages::not_found, routes::build_routes, state::AppState};
use axum::Router;
use roomspa_core::{Config, Result};
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Build the complete web application with all routes and state
///
/// Pages wait on the backend, so the request timeout sits a little above the
/// backend client's own timeout.
///
/// # Errors
///
/// Returns an error if the backend client cannot be constructed.
pub fn build_app(config: Config) -> Result<Router> {
    let timeout = config.backend.timeout() + std::time::Duration::from_secs(5);
    let state = Arc::new(AppState::new(config)?);
    info!(backend = %state.client.base_url(), "Admin dashboard routes ready");

    Ok(build_routes()
        .fallback(not_found::fallback)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http()))
}
