//! Bookings, booking detail and pending booking requests

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::Response,
};
use roomspa_client::ListParams;
use roomspa_core::format::{format_currency, format_date, format_datetime};
use roomspa_core::types::{Booking, BookingStatus, PendingRequest};
use serde::Deserialize;
use tracing::{info, warn};

use super::{Choice, error_redirect, notice_redirect, with_query};
use crate::forms::ActionForm;
use crate::list::{self, ListQuery, ListView, Projection};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const BOOKINGS: &str = "/admin/bookings";
const PENDING: &str = "/admin/pending-requests";

const BOOKING_STATUSES: [(&str, &str); 6] = [
    ("all", "All statuses"),
    ("pending", "Pending"),
    ("accepted", "Accepted"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("rejected", "Rejected"),
];

const REQUEST_STATUSES: [(&str, &str); 5] = [
    ("all", "All requests"),
    ("pending", "Pending"),
    ("approved", "Approved"),
    ("rejected", "Rejected"),
    ("cancelled", "Cancelled"),
];

const BOOKING_ACTIONS: [&str; 3] = ["confirm", "cancel", "complete"];
const REQUEST_ACTIONS: [&str; 3] = ["approve", "reject", "cancel"];

/// A booking as the tables show it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    /// Backend id
    pub id: String,
    /// Customer name
    pub customer: String,
    /// Therapist name
    pub therapist: String,
    /// Booked services
    pub services: String,
    /// Slot start
    pub starts: String,
    /// Slot end
    pub ends: String,
    /// Status wire value, used as a CSS modifier
    pub status: String,
    /// Status label
    pub status_label: String,
    /// Address or coordinates
    pub location: String,
    /// Booking total
    pub amount: String,
    /// Created timestamp
    pub created: String,
}

fn or_dash(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() { "—".to_string() } else { text.to_string() }
}

impl From<Booking> for BookingRow {
    fn from(booking: Booking) -> Self {
        Self {
            customer: or_dash(&booking.customer_name),
            therapist: or_dash(&booking.therapist_name),
            services: booking.services.summary(),
            starts: format_datetime(booking.timeslot_from.as_deref()),
            ends: format_datetime(booking.timeslot_to.as_deref()),
            status: booking.status.as_str().to_string(),
            status_label: booking.status.label(),
            location: booking.location.summary(),
            amount: format_currency(booking.total_amount),
            created: format_datetime(booking.created_at.as_deref()),
            id: booking.id,
        }
    }
}

const BOOKING_FIELDS: [Projection<Booking>; 3] = [
    |b| b.customer_name.clone(),
    |b| b.therapist_name.clone(),
    |b| b.services.summary(),
];

/// `/admin/bookings`
#[derive(Template)]
#[template(path = "bookings.html")]
pub struct BookingsPage {
    /// Layout
    pub shell: Shell,
    /// Rows
    pub view: ListView<BookingRow>,
    /// Search box value
    pub search: String,
    /// Status options
    pub statuses: Vec<Choice>,
    /// Return path for row actions
    pub back: String,
}

/// `GET /admin/bookings`
pub async fn index(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size())
        .search(query.search.as_str())
        .status(query.status_or_all());
    let client = state.client_for(&session);
    let loaded = list::load(client.bookings().list(&params)).await;

    let view = ListView::build(
        loaded,
        |page| (page.bookings, page.pagination),
        &query,
        BOOKINGS,
        &BOOKING_FIELDS,
        "No bookings found",
    )
    .map(BookingRow::from);

    let (notice, error) = query.flash();
    render::page(&BookingsPage {
        shell: Shell::new(&session, BOOKINGS).with_flash(notice, error),
        view,
        search: query.search.clone(),
        statuses: Choice::list(&BOOKING_STATUSES, query.status_or_all()),
        back: query.href(BOOKINGS, query.page()),
    })
}

/// `/admin/bookings/{id}`
#[derive(Template)]
#[template(path = "booking_detail.html")]
pub struct BookingDetailPage {
    /// Layout
    pub shell: Shell,
    /// Record, absent when the fetch failed
    pub booking: Option<BookingRow>,
    /// Fetch failure
    pub error: Option<String>,
    /// Action endpoint
    pub action_url: String,
    /// Return path after an action
    pub back: String,
    /// Available actions
    pub actions: &'static [&'static str],
}

/// `GET /admin/bookings/{id}`
pub async fn detail(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let client = state.client_for(&session);
    let (booking, error) = match list::load(client.bookings().get(&id)).await {
        list::LoadState::Loaded(booking) => (Some(BookingRow::from(booking)), None),
        list::LoadState::Failed(message) => (None, Some(message)),
        list::LoadState::Idle | list::LoadState::Loading => (None, None),
    };

    let (notice, flash_error) = query.flash();
    render::page(&BookingDetailPage {
        shell: Shell::new(&session, BOOKINGS).with_flash(notice, flash_error),
        booking,
        error,
        action_url: format!("{BOOKINGS}/{id}/action"),
        back: format!("{BOOKINGS}/{id}"),
        actions: &BOOKING_ACTIONS,
    })
}

/// `POST /admin/bookings/{id}/action`
pub async fn action(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let back = form.back_or(BOOKINGS).to_string();
    if !form.is_one_of(&BOOKING_ACTIONS) {
        return error_redirect(&back, "Unknown booking action");
    }

    let client = state.client_for(&session);
    match client.bookings().action(&id, &form.action, form.reason()).await {
        Ok(message) => {
            info!(booking = %id, action = %form.action, "Booking updated");
            notice_redirect(&back, message.as_deref().unwrap_or("Booking updated"))
        }
        Err(e) => {
            warn!(booking = %id, action = %form.action, error = %e, "Booking action failed");
            error_redirect(&back, &e.user_message())
        }
    }
}

/// A booking request awaiting review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    /// Backend id
    pub id: String,
    /// Customer name
    pub customer: String,
    /// Preferred therapist
    pub therapist: String,
    /// Requested services
    pub services: String,
    /// Requested date
    pub date: String,
    /// Requested time
    pub time: String,
    /// Duration in minutes
    pub duration: String,
    /// Status wire value
    pub status: String,
    /// Status label
    pub status_label: String,
    /// Whether approve/reject still apply
    pub is_pending: bool,
    /// Address
    pub location: String,
    /// Customer notes
    pub notes: String,
}

impl From<PendingRequest> for RequestRow {
    fn from(request: PendingRequest) -> Self {
        Self {
            customer: or_dash(&request.customer_name),
            therapist: if request.therapist_preference.trim().is_empty() {
                "Any therapist".to_string()
            } else {
                request.therapist_preference.clone()
            },
            services: request.services.summary(),
            date: format_date(request.requested_date.as_deref()),
            time: or_dash(request.requested_time.as_deref().unwrap_or_default()),
            duration: request
                .duration
                .map_or_else(|| "—".to_string(), |m| format!("{m} min")),
            status: request.status.as_str().to_string(),
            status_label: request.status.label(),
            is_pending: request.status == BookingStatus::Pending,
            location: request.location.summary(),
            notes: request.notes,
            id: request.id,
        }
    }
}

const REQUEST_FIELDS: [Projection<PendingRequest>; 3] = [
    |r| r.customer_name.clone(),
    |r| r.therapist_preference.clone(),
    |r| r.services.summary(),
];

/// Query string of the pending requests page
///
/// `updated`/`applied` carry the outcome of the action that redirected here
/// so the row shows its new status even before the backend reflects it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PendingQuery {
    /// Requested page
    pub page: Option<String>,
    /// Search text
    pub search: String,
    /// Status filter
    pub status: String,
    /// Flash notice
    pub notice: Option<String>,
    /// Flash error
    pub error: Option<String>,
    /// Id of the request just acted on
    pub updated: Option<String>,
    /// Status the action moved it to
    pub applied: Option<String>,
}

impl PendingQuery {
    /// The shared list inputs
    #[must_use]
    pub fn list(&self) -> ListQuery {
        ListQuery {
            page: self.page.clone(),
            search: self.search.clone(),
            status: self.status.clone(),
            notice: self.notice.clone(),
            error: self.error.clone(),
        }
    }
}

/// Overwrite the status of the request just acted on
pub fn patch_status(requests: &mut [PendingRequest], id: &str, status: &BookingStatus) {
    for request in requests.iter_mut().filter(|r| r.id == id) {
        request.status = status.clone();
    }
}

/// Keep requests matching the status filter; `all` keeps everything
#[must_use]
pub fn retain_status(requests: Vec<PendingRequest>, filter: &str) -> Vec<PendingRequest> {
    if filter == "all" {
        return requests;
    }
    let wanted: BookingStatus = filter.parse().unwrap_or_default();
    requests.into_iter().filter(|r| r.status == wanted).collect()
}

/// `/admin/pending-requests`
#[derive(Template)]
#[template(path = "pending_requests.html")]
pub struct PendingRequestsPage {
    /// Layout
    pub shell: Shell,
    /// Rows
    pub view: ListView<RequestRow>,
    /// Search box value
    pub search: String,
    /// Status options
    pub statuses: Vec<Choice>,
    /// Return path for row actions
    pub back: String,
}

/// `GET /admin/pending-requests`
pub async fn pending(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(pending): Query<PendingQuery>,
) -> Response {
    let query = pending.list();
    let status = query.status_or_all().to_string();
    let params = ListParams::new(query.page(), state.page_size()).status(status.as_str());
    let client = state.client_for(&session);
    let loaded = list::load(client.pending_requests().list(&params)).await;

    let patch = pending
        .updated
        .as_deref()
        .zip(pending.applied.as_deref().map(|s| s.parse::<BookingStatus>().unwrap_or_default()));

    let view = ListView::build(
        loaded,
        |mut page| {
            if let Some((id, applied)) = &patch {
                patch_status(&mut page.requests, id, applied);
            }
            (retain_status(page.requests, &status), page.pagination)
        },
        &query,
        PENDING,
        &REQUEST_FIELDS,
        "No pending requests found",
    )
    .map(RequestRow::from);

    let (notice, error) = query.flash();
    render::page(&PendingRequestsPage {
        shell: Shell::new(&session, PENDING).with_flash(notice, error),
        view,
        search: query.search.clone(),
        statuses: Choice::list(&REQUEST_STATUSES, &status),
        back: query.href(PENDING, query.page()),
    })
}

/// `POST /admin/pending-requests/{id}/action`
pub async fn pending_action(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let back = form.back_or(PENDING).to_string();
    let Some(applied) = BookingStatus::after_action(&form.action).filter(|_| form.is_one_of(&REQUEST_ACTIONS))
    else {
        return error_redirect(&back, "Unknown request action");
    };

    let client = state.client_for(&session);
    match client.pending_requests().action(&id, &form.action).await {
        Ok(message) => {
            info!(request = %id, action = %form.action, "Pending request updated");
            let notice = message.unwrap_or_else(|| format!("Request {}", applied.as_str()));
            let target = with_query(&back, &[("updated", id.as_str()), ("applied", applied.as_str())]);
            notice_redirect(&target, &notice)
        }
        Err(e) => {
            warn!(request = %id, action = %form.action, error = %e, "Pending request action failed");
            error_redirect(&back, &e.user_message())
        }
    }
}
