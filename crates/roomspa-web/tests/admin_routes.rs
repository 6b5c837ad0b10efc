//! Router tests driving the dashboard against a mock backend

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::{StatusCode, header};
use common::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wiremock::matchers::{any, header as header_is, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
}

#[tokio::test]
async fn test_anonymous_admin_request_never_reaches_backend() {
    init_test_logging();
    let backend = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(&app, anonymous_get("/admin/users")).await;
    assert_eq!(redirect_target(&response), "/login");

    let response = send(&app, anonymous_get("/admin/coupons/new")).await;
    assert_eq!(redirect_target(&response), "/login");
}

#[tokio::test]
async fn test_health_and_stylesheet_are_public() {
    let backend = MockServer::start().await;
    let app = app_for(&backend);

    let response = send(&app, anonymous_get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let response = send(&app, anonymous_get("/static/admin.css")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css; charset=utf-8"
    );
}

#[tokio::test]
async fn test_login_stores_session_and_redirects() {
    init_test_logging();
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("auth/login/")))
        .respond_with(envelope(json!({
            "token": "fresh-token",
            "user": {"name": "Ada Lovelace", "email": "ada@roomspa.com", "role": "admin"}
        })))
        .expect(1)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let request = axum::http::Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("email=ada%40roomspa.com&password=secret"))
        .unwrap();
    let response = send(&app, request).await;

    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(redirect_target(&response), "/admin");
    assert!(cookies.iter().any(|c| c.starts_with("adminToken=fresh-token")));
    assert!(cookies.iter().any(|c| c.starts_with("adminUser=")));
}

#[tokio::test]
async fn test_rejected_login_shows_generic_message() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("auth/login/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "No active account"})))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let request = axum::http::Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("email=ada%40roomspa.com&password=wrong"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = body_text(response).await;
    assert!(html.contains("Invalid email or password"));
    assert!(html.contains("ada@roomspa.com"));
}

#[tokio::test]
async fn test_coupon_row_shows_discount_and_status() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("coupons/")))
        .and(header_is("authorization", "Bearer test-token"))
        .respond_with(envelope(json!({
            "coupons": [{
                "id": 7,
                "code": "SPRING40",
                "name": "Spring sale",
                "discount_type": "percentage",
                "discount_value": "40",
                "minimum_order_amount": 50,
                "usage_limit": 100,
                "used_count": 25,
                "is_active": true
            }],
            "pagination": {"page": 1, "num_pages": 1, "total": 1}
        })))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(&app, get("/admin/coupons")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("SPRING40"));
    assert!(html.contains("40% off"));
    assert!(html.contains(r#"<span class="badge ok">Active</span>"#));
    assert!(html.contains("25 / 100"));
}

#[tokio::test]
async fn test_status_filter_applies_to_fetched_coupons() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("coupons/")))
        .respond_with(envelope(json!({
            "coupons": [
                {"id": 1, "code": "SPRING40", "discount_type": "percentage", "discount_value": 40, "is_active": true},
                {"id": 2, "code": "WINTER15", "discount_type": "percentage", "discount_value": 15, "is_active": false}
            ]
        })))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let html = body_text(send(&app, get("/admin/coupons?status=inactive")).await).await;
    assert!(html.contains("WINTER15"));
    assert!(!html.contains("SPRING40"));

    let html = body_text(send(&app, get("/admin/coupons?status=active")).await).await;
    assert!(html.contains("SPRING40"));
    assert!(!html.contains("WINTER15"));
}

/// Coupon backend whose `is_active` flips on every toggle
struct ToggleableCoupon {
    active: Arc<AtomicBool>,
}

impl Respond for ToggleableCoupon {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if request.url.path().ends_with("/toggle-status/") {
            self.active.fetch_xor(true, Ordering::SeqCst);
            return ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Coupon status updated"}));
        }
        envelope(json!({
            "coupons": [{
                "id": 7,
                "code": "SPRING40",
                "discount_type": "percentage",
                "discount_value": 40,
                "is_active": self.active.load(Ordering::SeqCst)
            }]
        }))
    }
}

#[tokio::test]
async fn test_toggling_twice_restores_status() {
    init_test_logging();
    let backend = MockServer::start().await;
    let active = Arc::new(AtomicBool::new(true));
    Mock::given(any())
        .and(path(api("coupons/")))
        .respond_with(ToggleableCoupon { active: Arc::clone(&active) })
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path(api("coupons/7/toggle-status/")))
        .respond_with(ToggleableCoupon { active: Arc::clone(&active) })
        .expect(2)
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(&app, post_form("/admin/coupons/7/toggle", "back=%2Fadmin%2Fcoupons")).await;
    let target = redirect_target(&response);
    assert!(target.starts_with("/admin/coupons?"));
    assert!(target.contains("notice="));

    let html = body_text(send(&app, get(&target)).await).await;
    assert!(html.contains(r#"<span class="badge bad">Inactive</span>"#));
    assert!(html.contains("Coupon status updated"));

    let response = send(&app, post_form("/admin/coupons/7/toggle", "back=%2Fadmin%2Fcoupons")).await;
    let html = body_text(send(&app, get(&redirect_target(&response))).await).await;
    assert!(html.contains(r#"<span class="badge ok">Active</span>"#));
}

#[tokio::test]
async fn test_toggle_refuses_foreign_return_path() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("coupons/7/toggle-status/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(&app, post_form("/admin/coupons/7/toggle", "back=https%3A%2F%2Fevil.test")).await;
    assert!(redirect_target(&response).starts_with("/admin/coupons?"));
}

#[tokio::test]
async fn test_failed_analytics_shows_unavailable_state() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("analytics/bookings/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Analytics service offline"})),
        )
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(&app, get("/admin/analytics/bookings?period=week")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Analytics Data Not Available"));
    assert!(html.contains("Analytics service offline"));
}

#[tokio::test]
async fn test_approved_request_leaves_pending_filter() {
    init_test_logging();
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("pending-requests/1/action/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path(api("pending-requests/")))
        .respond_with(envelope(json!({
            "requests": [
                {"id": 1, "customer_name": "Jane Doe", "status": "pending"},
                {"id": 2, "customer_name": "Ana Lima", "status": "pending"}
            ]
        })))
        .mount(&backend)
        .await;
    let app = app_for(&backend);

    let response = send(
        &app,
        post_form(
            "/admin/pending-requests/1/action",
            "action=approve&back=%2Fadmin%2Fpending-requests%3Fstatus%3Dpending",
        ),
    )
    .await;
    let target = redirect_target(&response);
    assert!(target.contains("updated=1"));

    let html = body_text(send(&app, get(&target)).await).await;
    assert!(html.contains("Ana Lima"));
    assert!(!html.contains("Jane Doe"));
}

#[tokio::test]
async fn test_unknown_admin_path_is_404_for_signed_in_admin() {
    let backend = MockServer::start().await;
    let app = app_for(&backend);

    let response = send(&app, get("/admin/nowhere")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("/admin/nowhere"));

    let response = send(&app, anonymous_get("/admin/nowhere")).await;
    assert_eq!(redirect_target(&response), "/login");
}
