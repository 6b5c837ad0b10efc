//! Shared helpers for router tests: a mock backend and request builders

#![allow(dead_code, unreachable_pub, clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use roomspa_core::Config;
use roomspa_web::build_app;
use std::sync::Once;
use tower::ServiceExt;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Backend root the dashboard talks to
pub const API_ROOT: &str = "/api/admin";

/// Cookie header of a signed-in admin
pub const SESSION_COOKIE: &str = "adminToken=test-token";

/// Dashboard router pointed at `backend`
pub fn app_for(backend: &MockServer) -> Router {
    let mut config = Config::default();
    config.backend.base_url = format!("{}{API_ROOT}", backend.uri());
    config.backend.timeout_secs = 5;
    build_app(config).unwrap()
}

/// Backend path for an endpoint such as `coupons/`
pub fn api(endpoint: &str) -> String {
    format!("{API_ROOT}/{endpoint}")
}

/// Signed-in `GET`
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, SESSION_COOKIE)
        .body(Body::empty())
        .unwrap()
}

/// `GET` without cookies
pub fn anonymous_get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// Signed-in form `POST`
pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, SESSION_COOKIE)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

/// Send one request through a fresh clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `Location` of a 303 response
pub fn redirect_target(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}
