//! Template rendering into responses

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// Render a full page; a template failure is logged and becomes a 500
pub fn page<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render template");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Render a page with a non-200 status
pub fn page_with_status<T: Template>(status: StatusCode, template: &T) -> Response {
    let mut response = page(template);
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}

/// Render a fragment for a live push; `None` when rendering fails
pub fn fragment<T: Template>(template: &T) -> Option<String> {
    template
        .render()
        .map_err(|e| error!(error = %e, "Failed to render live fragment"))
        .ok()
}
