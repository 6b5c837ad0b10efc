//! Route definitions for the admin dashboard

use crate::{
    handlers::{assets, auth, live},
    pages::{analytics, bookings, conversations, coupons, dashboard, operations, people, reports},
    session::require_session,
    state::SharedState,
};
use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

/// Routes behind the session guard
fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route("/admin", get(dashboard::index))
        // People
        .route("/admin/users", get(people::users))
        .route("/admin/users/:id", get(people::user_detail))
        .route("/admin/users/:id/action", post(people::user_action))
        .route("/admin/customers", get(people::customers))
        .route("/admin/therapists", get(people::therapists))
        .route("/admin/therapists/:id/action", post(people::therapist_action))
        // Bookings
        .route("/admin/bookings", get(bookings::index))
        .route("/admin/bookings/:id", get(bookings::detail))
        .route("/admin/bookings/:id/action", post(bookings::action))
        .route("/admin/pending-requests", get(bookings::pending))
        .route("/admin/pending-requests/:id/action", post(bookings::pending_action))
        // Conversations
        .route("/admin/conversations", get(conversations::index))
        .route("/admin/conversations/:id", get(conversations::detail))
        // Coupons
        .route("/admin/coupons", get(coupons::index).post(coupons::create))
        .route("/admin/coupons/new", get(coupons::new_form))
        .route("/admin/coupons/:id", post(coupons::update))
        .route("/admin/coupons/:id/edit", get(coupons::edit_form))
        .route("/admin/coupons/:id/toggle", post(coupons::toggle))
        .route(
            "/admin/coupons/:id/delete",
            get(coupons::confirm_delete).post(coupons::delete),
        )
        // Analytics and reports
        .route("/admin/analytics", get(analytics::overview))
        .route("/admin/analytics/bookings", get(analytics::bookings))
        .route("/admin/analytics/therapists", get(analytics::therapists))
        .route("/admin/analytics/advanced", get(analytics::advanced))
        .route("/admin/reports", get(reports::index))
        .route("/admin/reports/financial", get(reports::financial))
        .route(
            "/admin/reports/export",
            get(reports::export_form).post(reports::export),
        )
        // Operations
        .route("/admin/monitoring", get(operations::monitoring))
        .route("/admin/monitoring/live", get(live::monitoring))
        .route("/admin/system", get(operations::system))
        .route("/admin/system/live", get(live::system))
        .route(
            "/admin/notifications",
            get(operations::notifications).post(operations::send_notification),
        )
        .route(
            "/admin/settings",
            get(operations::settings).post(operations::save_settings),
        )
        .route_layer(middleware::from_fn(require_session))
}

/// Build the complete router, without state
pub fn build_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin") }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/health", get(assets::health_check))
        .route("/static/admin.css", get(assets::stylesheet))
        .merge(admin_routes())
}
