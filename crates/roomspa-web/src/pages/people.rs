//! Users, customers and therapists

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::Response,
};
use roomspa_client::ListParams;
use roomspa_core::format::{format_currency, format_date, format_datetime, format_number, format_rating};
use roomspa_core::types::{CustomerRecord, TherapistRecord, UserRecord};
use tracing::{info, warn};

use super::{error_redirect, notice_redirect};
use crate::forms::ActionForm;
use crate::list::{self, ListQuery, ListView, LoadState, Projection};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const USERS: &str = "/admin/users";
const CUSTOMERS: &str = "/admin/customers";
const THERAPISTS: &str = "/admin/therapists";

const USER_ACTIONS: [&str; 4] = ["activate", "deactivate", "verify", "suspend"];
const THERAPIST_ACTIONS: [&str; 3] = ["verify", "activate", "deactivate"];

fn or_dash(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() { "—".to_string() } else { text.to_string() }
}

/// A user account row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// Backend id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// Phone
    pub phone: String,
    /// Role
    pub role: String,
    /// Email/phone verified
    pub verified: bool,
    /// Account enabled
    pub active: bool,
    /// Number of bookings
    pub bookings: String,
    /// Lifetime spend
    pub spent: String,
    /// Last seen
    pub last_activity: String,
    /// Signup date
    pub joined: String,
}

impl From<UserRecord> for UserRow {
    fn from(user: UserRecord) -> Self {
        Self {
            name: or_dash(&user.name),
            email: user.email,
            phone: or_dash(&user.phone),
            role: if user.role.trim().is_empty() { "customer".to_string() } else { user.role },
            verified: user.is_verified,
            active: user.is_active,
            bookings: format_number(user.booking_count),
            spent: format_currency(user.total_spent),
            last_activity: format_datetime(user.last_activity.as_deref()),
            joined: format_date(user.created_at.as_deref()),
            id: user.id,
        }
    }
}

const USER_FIELDS: [Projection<UserRecord>; 3] =
    [|u| u.name.clone(), |u| u.email.clone(), |u| u.phone.clone()];

/// `/admin/users`
#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPage {
    /// Layout
    pub shell: Shell,
    /// Rows
    pub view: ListView<UserRow>,
    /// Search box value
    pub search: String,
    /// Return path for row actions
    pub back: String,
}

/// `GET /admin/users`
pub async fn users(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size()).search(query.search.as_str());
    let client = state.client_for(&session);
    let loaded = list::load(client.users().list(&params)).await;

    let view = ListView::build(
        loaded,
        |page| (page.users, page.pagination),
        &query,
        USERS,
        &USER_FIELDS,
        "No users found",
    )
    .map(UserRow::from);

    let (notice, error) = query.flash();
    render::page(&UsersPage {
        shell: Shell::new(&session, USERS).with_flash(notice, error),
        view,
        search: query.search.clone(),
        back: query.href(USERS, query.page()),
    })
}

/// `/admin/users/{id}`
#[derive(Template)]
#[template(path = "user_detail.html")]
pub struct UserDetailPage {
    /// Layout
    pub shell: Shell,
    /// Record, absent when the fetch failed
    pub user: Option<UserRow>,
    /// Fetch failure
    pub error: Option<String>,
    /// Action endpoint
    pub action_url: String,
    /// Return path after an action
    pub back: String,
    /// Available actions
    pub actions: &'static [&'static str],
}

/// `GET /admin/users/{id}`
pub async fn user_detail(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let client = state.client_for(&session);
    let (user, error) = match list::load(client.users().get(&id)).await {
        LoadState::Loaded(user) => (Some(UserRow::from(user)), None),
        LoadState::Failed(message) => (None, Some(message)),
        LoadState::Idle | LoadState::Loading => (None, None),
    };

    let (notice, flash_error) = query.flash();
    render::page(&UserDetailPage {
        shell: Shell::new(&session, USERS).with_flash(notice, flash_error),
        user,
        error,
        action_url: format!("{USERS}/{id}/action"),
        back: format!("{USERS}/{id}"),
        actions: &USER_ACTIONS,
    })
}

/// `POST /admin/users/{id}/action`
pub async fn user_action(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let back = form.back_or(USERS).to_string();
    if !form.is_one_of(&USER_ACTIONS) {
        return error_redirect(&back, "Unknown user action");
    }

    let client = state.client_for(&session);
    match client.users().action(&id, &form.action, form.reason()).await {
        Ok(message) => {
            info!(user = %id, action = %form.action, "User updated");
            notice_redirect(&back, message.as_deref().unwrap_or("User updated"))
        }
        Err(e) => {
            warn!(user = %id, action = %form.action, error = %e, "User action failed");
            error_redirect(&back, &e.user_message())
        }
    }
}

/// A customer row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    /// Backend id
    pub id: String,
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Phone
    pub phone: String,
    /// Account enabled
    pub active: bool,
    /// Verified
    pub verified: bool,
    /// Number of bookings
    pub bookings: String,
    /// Lifetime spend
    pub spent: String,
    /// Most recent booking
    pub last_booking: String,
    /// Signup date
    pub joined: String,
}

impl From<CustomerRecord> for CustomerRow {
    fn from(customer: CustomerRecord) -> Self {
        Self {
            name: or_dash(&customer.name),
            email: customer.email,
            phone: or_dash(&customer.phone),
            active: customer.is_active,
            verified: customer.is_verified,
            bookings: format_number(customer.booking_count),
            spent: format_currency(customer.total_spent),
            last_booking: format_date(customer.last_booking.as_deref()),
            joined: format_date(customer.created_at.as_deref()),
            id: customer.id,
        }
    }
}

const CUSTOMER_FIELDS: [Projection<CustomerRecord>; 3] =
    [|c| c.name.clone(), |c| c.email.clone(), |c| c.phone.clone()];

/// `/admin/customers`
#[derive(Template)]
#[template(path = "customers.html")]
pub struct CustomersPage {
    /// Layout
    pub shell: Shell,
    /// Rows
    pub view: ListView<CustomerRow>,
    /// Search box value
    pub search: String,
}

/// `GET /admin/customers`
pub async fn customers(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size()).search(query.search.as_str());
    let client = state.client_for(&session);
    let loaded = list::load(client.customers().list(&params)).await;

    let view = ListView::build(
        loaded,
        |page| (page.customers, page.pagination),
        &query,
        CUSTOMERS,
        &CUSTOMER_FIELDS,
        "No customers found",
    )
    .map(CustomerRow::from);

    let (notice, error) = query.flash();
    render::page(&CustomersPage {
        shell: Shell::new(&session, CUSTOMERS).with_flash(notice, error),
        view,
        search: query.search.clone(),
    })
}

/// A therapist row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TherapistRow {
    /// Backend id
    pub id: String,
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Phone
    pub phone: String,
    /// Average rating
    pub rating: String,
    /// Number of reviews
    pub reviews: String,
    /// Specialties, comma separated
    pub specialties: String,
    /// Taking bookings now
    pub available: bool,
    /// Credentials checked
    pub verified: bool,
    /// Account enabled
    pub active: bool,
    /// Number of bookings
    pub bookings: String,
}

impl From<TherapistRecord> for TherapistRow {
    fn from(therapist: TherapistRecord) -> Self {
        Self {
            name: or_dash(&therapist.name),
            email: therapist.email,
            phone: or_dash(&therapist.phone),
            rating: format_rating(therapist.rating),
            reviews: format_number(therapist.review_count),
            specialties: or_dash(&therapist.specialties.join(", ")),
            available: therapist.is_available,
            verified: therapist.is_verified,
            active: therapist.is_active,
            bookings: format_number(therapist.booking_count),
            id: therapist.id,
        }
    }
}

const THERAPIST_FIELDS: [Projection<TherapistRecord>; 3] = [
    |t| t.name.clone(),
    |t| t.email.clone(),
    |t| t.specialties.join(" "),
];

/// `/admin/therapists`
#[derive(Template)]
#[template(path = "therapists.html")]
pub struct TherapistsPage {
    /// Layout
    pub shell: Shell,
    /// Rows
    pub view: ListView<TherapistRow>,
    /// Search box value
    pub search: String,
    /// Return path for row actions
    pub back: String,
}

/// `GET /admin/therapists`
pub async fn therapists(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size()).search(query.search.as_str());
    let client = state.client_for(&session);
    let loaded = list::load(client.therapists().list(&params)).await;

    let view = ListView::build(
        loaded,
        |page| (page.therapists, page.pagination),
        &query,
        THERAPISTS,
        &THERAPIST_FIELDS,
        "No therapists found",
    )
    .map(TherapistRow::from);

    let (notice, error) = query.flash();
    render::page(&TherapistsPage {
        shell: Shell::new(&session, THERAPISTS).with_flash(notice, error),
        view,
        search: query.search.clone(),
        back: query.href(THERAPISTS, query.page()),
    })
}

/// `POST /admin/therapists/{id}/action`
pub async fn therapist_action(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<ActionForm>,
) -> Response {
    let back = form.back_or(THERAPISTS).to_string();
    if !form.is_one_of(&THERAPIST_ACTIONS) {
        return error_redirect(&back, "Unknown therapist action");
    }

    let client = state.client_for(&session);
    match client.therapists().action(&id, &form.action).await {
        Ok(message) => {
            info!(therapist = %id, action = %form.action, "Therapist updated");
            notice_redirect(&back, message.as_deref().unwrap_or("Therapist updated"))
        }
        Err(e) => {
            warn!(therapist = %id, action = %form.action, error = %e, "Therapist action failed");
            error_redirect(&back, &e.user_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::filter_items;
    use pretty_assertions::assert_eq;

    fn user(name: &str, email: &str) -> UserRecord {
        UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            ..UserRecord::default()
        }
    }

    #[test]
    fn test_user_search_matches_name_or_email() {
        let users = vec![user("Mia Wong", "mia@roomspa.com"), user("Leo Park", "leo@mail.io")];

        assert_eq!(filter_items(&users, "wong", &USER_FIELDS).len(), 1);
        assert_eq!(filter_items(&users, "MAIL.IO", &USER_FIELDS).len(), 1);
        assert_eq!(filter_items(&users, "", &USER_FIELDS).len(), 2);
    }

    #[test]
    fn test_user_row_defaults() {
        let row = UserRow::from(user("", "x@y.z"));
        assert_eq!(row.name, "—");
        assert_eq!(row.role, "customer");
        assert_eq!(row.spent, "$0.00");
        assert_eq!(row.last_activity, "—");
    }

    #[test]
    fn test_therapist_row_lists_specialties() {
        let row = TherapistRow::from(TherapistRecord {
            name: "Kai".to_string(),
            rating: 4.83,
            specialties: vec!["Swedish".to_string(), "Deep tissue".to_string()],
            ..TherapistRecord::default()
        });
        assert_eq!(row.specialties, "Swedish, Deep tissue");
        assert_eq!(row.rating, "4.8");
    }
}
