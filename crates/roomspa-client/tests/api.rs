//! Integration tests for the admin REST client against a mock backend
#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]

mod common;

use common::{backend, ok, rejected};
use pretty_assertions::assert_eq;
use roomspa_client::{CouponPayload, ExportKind, ExportParams, ListParams, NotificationRequest, Period};
use roomspa_core::Error;
use roomspa_core::types::BookingStatus;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_returns_session() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login/"))
        .and(body_json(json!({"email": "admin@roomspa.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "abc123",
            "user": {"name": "Ada", "email": "admin@roomspa.com", "role": "admin"}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let session = client
        .auth()
        .login("admin@roomspa.com", "secret")
        .await
        .unwrap();

    assert_eq!(session.token, "abc123");
    assert_eq!(session.user.name, "Ada");
}

#[tokio::test]
async fn test_login_rejection_keeps_backend_message() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(rejected("Invalid credentials")))
        .mount(&server)
        .await;

    let err = client.auth().login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn test_requests_carry_bearer_token_and_paging() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(query_param("search", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "users": [{"id": 1, "name": "Ada Lovelace", "email": "ada@example.com", "is_active": true}],
            "pagination": {"current_page": 2, "total_pages": 3}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .users()
        .list(&ListParams::new(2, 20).search("ada"))
        .await
        .unwrap();

    assert_eq!(page.users.len(), 1);
    assert_eq!(page.users[0].id, "1");
    assert_eq!(page.pagination.pages(), 3);
}

#[tokio::test]
async fn test_pending_requests_use_page_size_and_status() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/pending-requests/"))
        .and(query_param("page_size", "20"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "requests": [{"id": "r1", "customer_name": "Emily", "status": "pending",
                          "services": {"Swedish Massage": 60}}]
        }))))
        .mount(&server)
        .await;

    let page = client
        .pending_requests()
        .list(&ListParams::new(1, 20).status("pending"))
        .await
        .unwrap();

    assert_eq!(page.requests[0].status, BookingStatus::Pending);
    assert_eq!(page.requests[0].services.summary(), "Swedish Massage");
}

#[tokio::test]
async fn test_action_posts_action_body() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/pending-requests/r1/action/"))
        .and(body_json(json!({"action": "approve"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Request approved"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = client.pending_requests().action("r1", "approve").await.unwrap();
    assert_eq!(message.as_deref(), Some("Request approved"));
}

#[tokio::test]
async fn test_coupon_filter_and_mutations() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/coupons/"))
        .and(query_param("is_active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "coupons": [{"id": 5, "code": "SAVE10", "is_active": true, "usage_limit": 100, "used_count": 40}],
            "pagination": {"total_pages": 1}
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/coupons/5/toggle-status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/coupons/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .coupons()
        .list(&ListParams::new(1, 10).status("active"))
        .await
        .unwrap();
    assert_eq!(page.coupons[0].usage_percent(), 40.0);

    client.coupons().toggle_status("5").await.unwrap();
    client.coupons().delete("5").await.unwrap();
}

#[tokio::test]
async fn test_coupon_update_uses_put() {
    let (server, client) = backend().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/coupons/9/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(rejected("Code already exists")))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CouponPayload {
        code: "SAVE10".to_string(),
        name: "Ten off".to_string(),
        description: String::new(),
        discount_type: "percentage".to_string(),
        discount_value: 10.0,
        minimum_order_amount: 0.0,
        maximum_discount_amount: None,
        usage_limit: None,
        valid_from: None,
        valid_until: None,
        is_active: true,
    };

    let err = client.coupons().update("9", &payload).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { ref message } if message == "Code already exists"));
}

#[tokio::test]
async fn test_analytics_rejection() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/analytics/bookings/"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rejected("unavailable")))
        .mount(&server)
        .await;

    let err = client.analytics().bookings(Period::Week).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { .. }));
}

#[tokio::test]
async fn test_non_envelope_error_maps_to_status() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Forbidden"})))
        .mount(&server)
        .await;

    let err = client.dashboard().overview().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_garbage_success_body_is_decode_error() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/monitoring/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.monitoring().live().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = roomspa_client::ApiClient::new(
        "http://127.0.0.1:9/api/admin",
        std::time::Duration::from_secs(2),
    )
    .unwrap();

    let err = client.settings().get().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_notification_send_body() {
    let (server, client) = backend().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/notifications/send/"))
        .and(body_json(json!({"title": "Hi", "message": "Spa day", "user_type": "customers"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .notifications()
        .send(&NotificationRequest {
            title: "Hi".to_string(),
            message: "Spa day".to_string(),
            user_type: "customers".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_export_download_uses_disposition_filename() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/export/"))
        .and(query_param("type", "bookings"))
        .and(query_param("date_from", "2024-01-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"bookings.csv\"")
                .set_body_raw(b"id,status\n1,completed\n".to_vec(), "text/csv"),
        )
        .mount(&server)
        .await;

    let download = client
        .export()
        .data(&ExportParams {
            kind: ExportKind::Bookings,
            date_from: Some("2024-01-01".to_string()),
            date_to: None,
        })
        .await
        .unwrap();

    assert_eq!(download.filename, "bookings.csv");
    assert_eq!(download.content_type, "text/csv");
    assert!(download.bytes.starts_with(b"id,status"));
}

#[tokio::test]
async fn test_export_refusal_in_json() {
    let (server, client) = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/export/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rejected("No data in range")))
        .mount(&server)
        .await;

    let err = client
        .export()
        .data(&ExportParams {
            kind: ExportKind::Revenue,
            date_from: None,
            date_to: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "No data in range");
}
