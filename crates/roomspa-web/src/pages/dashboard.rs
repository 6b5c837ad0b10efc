//! Landing page: headline figures and recent bookings

use askama::Template;
use axum::{
    Extension,
    extract::{Query, State},
    response::Response,
};
use roomspa_core::format::{format_currency, format_number};
use roomspa_core::types::Booking;
use serde_json::Value;

use super::bookings::BookingRow;
use super::{Kpi, count_at, number_at, records_at};
use crate::list::{self, ListQuery, LoadState};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const PATH: &str = "/admin";

/// `/admin`
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    /// Layout
    pub shell: Shell,
    /// Headline figures
    pub kpis: Vec<Kpi>,
    /// Latest bookings, may be empty
    pub recent: Vec<BookingRow>,
    /// Why the figures are zero, when the overview failed
    pub error: Option<String>,
}

/// Headline figures from the overview payload; absent values read as zero
#[must_use]
pub fn kpis(overview: &Value) -> Vec<Kpi> {
    vec![
        Kpi::new("Total Users", format_number(count_at(overview, "users.total"))).hint(format!(
            "{} new today",
            format_number(count_at(overview, "users.new_today"))
        )),
        Kpi::new("Active Bookings", format_number(count_at(overview, "bookings.active"))).hint(
            format!("{} pending", format_number(count_at(overview, "bookings.pending"))),
        ),
        Kpi::new("Today's Revenue", format_currency(number_at(overview, "revenue.today"))).hint(
            format!("{} bookings today", format_number(count_at(overview, "bookings.today"))),
        ),
        Kpi::new(
            "Available Therapists",
            format_number(count_at(overview, "therapists.available")),
        )
        .hint(format!(
            "{} verified",
            format_number(count_at(overview, "therapists.verified"))
        )),
    ]
}

/// `GET /admin`
pub async fn index(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let client = state.client_for(&session);
    let (overview, error) = match list::load(client.dashboard().overview()).await {
        LoadState::Loaded(overview) => (overview, None),
        LoadState::Failed(message) => (Value::Null, Some(message)),
        LoadState::Idle | LoadState::Loading => (Value::Null, None),
    };

    let recent = records_at::<Booking>(&overview, "recent_bookings")
        .into_iter()
        .take(5)
        .map(BookingRow::from)
        .collect();

    let (notice, flash_error) = query.flash();
    render::page(&DashboardPage {
        shell: Shell::new(&session, PATH).with_flash(notice, flash_error),
        kpis: kpis(&overview),
        recent,
        error,
    })
}
