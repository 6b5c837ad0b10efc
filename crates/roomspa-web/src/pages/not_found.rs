//! 404 page and the router fallback

use askama::Template;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;

/// Page shown for unknown admin paths
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    /// Layout
    pub shell: Shell,
    /// Requested path
    pub path: String,
}

/// Router fallback
///
/// Unknown admin paths follow the same guard as known ones: anonymous visitors
/// go to `/login`, signed-in admins get the 404 page inside the layout.
pub async fn fallback(jar: CookieJar, uri: Uri) -> Response {
    let path = uri.path().to_string();
    match SessionContext::from_jar(&jar) {
        Some(session) => {
            debug!(%path, "No route for path");
            render::page_with_status(
                StatusCode::NOT_FOUND,
                &NotFoundPage {
                    shell: Shell::new(&session, &path),
                    path,
                },
            )
        }
        None if path.starts_with("/admin") => Redirect::to("/login").into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
