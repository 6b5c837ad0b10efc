//! Coupon list, stats, create/edit form, toggle and delete

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use roomspa_client::{CouponPayload, ListParams};
use roomspa_core::format::{
    discount_label, format_currency, format_date, format_number, format_percent,
};
use roomspa_core::types::{Coupon, CouponStats};
use serde::Deserialize;
use tracing::{info, warn};

use super::{Choice, Kpi, error_redirect, notice_redirect, with_query};
use crate::forms::CouponForm;
use crate::list::{self, ListQuery, ListView, LoadState, Projection};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const PATH: &str = "/admin/coupons";

const STATUSES: [(&str, &str); 3] = [("all", "All coupons"), ("active", "Active"), ("inactive", "Inactive")];

/// A coupon row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRow {
    /// Backend id
    pub id: String,
    /// Redeemable code
    pub code: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// "15% off", "$10.00 off"
    pub discount: String,
    /// Minimum order
    pub minimum_order: String,
    /// "40 / 100" or "12 / unlimited"
    pub usage: String,
    /// Usage share as text, "40%"
    pub usage_percent: String,
    /// Usage bar width
    pub usage_width: String,
    /// Enabled
    pub active: bool,
    /// "Active" or "Inactive"
    pub status_label: &'static str,
    /// Start of validity
    pub valid_from: String,
    /// End of validity
    pub valid_until: String,
    /// Edit link with the form pre-seeded
    pub edit_href: String,
    /// Delete confirmation link
    pub delete_href: String,
}

impl From<Coupon> for CouponRow {
    fn from(coupon: Coupon) -> Self {
        let percent = coupon.usage_percent();
        let seeded = serde_urlencoded::to_string(CouponForm::from_coupon(&coupon)).unwrap_or_default();
        let base = format!("{PATH}/{}", coupon.id);
        Self {
            discount: discount_label(&coupon),
            minimum_order: format_currency(coupon.minimum_order_amount),
            usage: match coupon.usage_limit {
                Some(limit) => format!("{} / {}", format_number(coupon.used_count), format_number(limit)),
                None => format!("{} / unlimited", format_number(coupon.used_count)),
            },
            usage_percent: format_percent(percent),
            usage_width: format!("{percent:.0}"),
            active: coupon.is_active,
            status_label: coupon.status_label(),
            valid_from: format_date(coupon.valid_from.as_deref()),
            valid_until: format_date(coupon.valid_until.as_deref()),
            edit_href: format!("{base}/edit?{seeded}"),
            delete_href: with_query(&format!("{base}/delete"), &[("code", coupon.code.as_str())]),
            id: coupon.id,
            code: coupon.code,
            name: coupon.name,
            description: coupon.description,
        }
    }
}

const FIELDS: [Projection<Coupon>; 3] = [|c| c.code.clone(), |c| c.name.clone(), |c| c.description.clone()];

/// Stat tiles; a failed stats fetch reads as zeros
#[must_use]
pub fn stat_tiles(stats: &CouponStats) -> Vec<Kpi> {
    vec![
        Kpi::new("Total Coupons", format_number(stats.total_coupons)),
        Kpi::new("Active", format_number(stats.active_coupons))
            .hint(format!("{} inactive", format_number(stats.inactive_coupons))),
        Kpi::new("Total Usage", format_number(stats.total_usage)),
        Kpi::new("Discount Given", format_currency(stats.total_discount_given)),
    ]
}

/// `/admin/coupons`
#[derive(Template)]
#[template(path = "coupons.html")]
pub struct CouponsPage {
    /// Layout
    pub shell: Shell,
    /// Stat tiles
    pub tiles: Vec<Kpi>,
    /// Rows
    pub view: ListView<CouponRow>,
    /// Search box value
    pub search: String,
    /// Status options
    pub statuses: Vec<Choice>,
    /// Return path for toggles
    pub back: String,
}

/// `GET /admin/coupons`
pub async fn index(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.config.pages.coupon_page_size)
        .search(query.search.as_str())
        .status(query.status_or_all());
    let client = state.client_for(&session);
    let coupons = client.coupons();
    let (loaded, stats) = tokio::join!(list::load(coupons.list(&params)), list::load(coupons.stats()));

    let stats = match stats {
        LoadState::Loaded(stats) => stats,
        _ => CouponStats::default(),
    };
    let status = query.status_or_all();
    let view = ListView::build(
        loaded,
        |page| {
            let rows = page
                .coupons
                .into_iter()
                .filter(|coupon| matches_status(coupon, status))
                .collect();
            (rows, page.pagination)
        },
        &query,
        PATH,
        &FIELDS,
        "No coupons found",
    )
    .map(CouponRow::from);

    let (notice, error) = query.flash();
    render::page(&CouponsPage {
        shell: Shell::new(&session, PATH).with_flash(notice, error),
        tiles: stat_tiles(&stats),
        view,
        search: query.search.clone(),
        statuses: Choice::list(&STATUSES, query.status_or_all()),
        back: query.href(PATH, query.page()),
    })
}

/// Whether `coupon` belongs under the status filter; `all` keeps everything
fn matches_status(coupon: &Coupon, status: &str) -> bool {
    match status {
        "active" => coupon.is_active,
        "inactive" => !coupon.is_active,
        _ => true,
    }
}

/// Create and edit form
#[derive(Template)]
#[template(path = "coupon_form.html")]
pub struct CouponFormPage {
    /// Layout
    pub shell: Shell,
    /// "Create Coupon" or "Edit Coupon"
    pub heading: &'static str,
    /// Submit target
    pub action_url: String,
    /// Current input
    pub form: CouponForm,
    /// Inline failure, input kept
    pub error: Option<String>,
}

impl CouponFormPage {
    fn respond(session: &SessionContext, heading: &'static str, action_url: String, form: CouponForm, error: Option<String>) -> Response {
        let page = Self {
            shell: Shell::new(session, PATH),
            heading,
            action_url,
            form,
            error,
        };
        if page.error.is_some() {
            render::page_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page)
        } else {
            render::page(&page)
        }
    }
}

/// `GET /admin/coupons/new`
pub async fn new_form(Extension(session): Extension<SessionContext>) -> Response {
    CouponFormPage::respond(&session, "Create Coupon", PATH.to_string(), CouponForm::default(), None)
}

/// `GET /admin/coupons/{id}/edit`, seeded from the list row's query string
pub async fn edit_form(
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(form): Query<CouponForm>,
) -> Response {
    CouponFormPage::respond(&session, "Edit Coupon", format!("{PATH}/{id}"), form, None)
}

/// `POST /admin/coupons`
pub async fn create(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<CouponForm>,
) -> Response {
    let payload = match form.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            return CouponFormPage::respond(&session, "Create Coupon", PATH.to_string(), form, Some(e.user_message()));
        }
    };

    let client = state.client_for(&session);
    match client.coupons().create(&payload).await {
        Ok(_) => {
            info!(code = %payload.code, "Coupon created");
            notice_redirect(PATH, &format!("Coupon {} created", payload.code))
        }
        Err(e) => {
            warn!(code = %payload.code, error = %e, "Coupon creation failed");
            CouponFormPage::respond(&session, "Create Coupon", PATH.to_string(), form, Some(e.user_message()))
        }
    }
}

/// `POST /admin/coupons/{id}`
pub async fn update(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<CouponForm>,
) -> Response {
    let action_url = format!("{PATH}/{id}");
    let payload: CouponPayload = match form.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            return CouponFormPage::respond(&session, "Edit Coupon", action_url, form, Some(e.user_message()));
        }
    };

    let client = state.client_for(&session);
    match client.coupons().update(&id, &payload).await {
        Ok(message) => {
            info!(coupon = %id, "Coupon updated");
            notice_redirect(PATH, message.as_deref().unwrap_or("Coupon updated"))
        }
        Err(e) => {
            warn!(coupon = %id, error = %e, "Coupon update failed");
            CouponFormPage::respond(&session, "Edit Coupon", action_url, form, Some(e.user_message()))
        }
    }
}

/// Return path posted by list buttons
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackForm {
    /// Page to return to
    pub back: String,
}

impl BackForm {
    fn target(&self) -> &str {
        if self.back.starts_with(PATH) { &self.back } else { PATH }
    }
}

/// `POST /admin/coupons/{id}/toggle`
pub async fn toggle(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<BackForm>,
) -> Response {
    let client = state.client_for(&session);
    match client.coupons().toggle_status(&id).await {
        Ok(message) => {
            info!(coupon = %id, "Coupon status toggled");
            notice_redirect(form.target(), message.as_deref().unwrap_or("Coupon status updated"))
        }
        Err(e) => {
            warn!(coupon = %id, error = %e, "Coupon toggle failed");
            error_redirect(form.target(), &e.user_message())
        }
    }
}

/// Query of the delete confirmation page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteQuery {
    /// Code shown in the prompt
    pub code: String,
}

/// `/admin/coupons/{id}/delete`
#[derive(Template)]
#[template(path = "coupon_delete.html")]
pub struct DeleteCouponPage {
    /// Layout
    pub shell: Shell,
    /// Coupon code, may be empty
    pub code: String,
    /// Confirm target
    pub action_url: String,
}

/// `GET /admin/coupons/{id}/delete`
pub async fn confirm_delete(
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    render::page(&DeleteCouponPage {
        shell: Shell::new(&session, PATH),
        code: query.code,
        action_url: format!("{PATH}/{id}/delete"),
    })
}

/// `POST /admin/coupons/{id}/delete`
pub async fn delete(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Response {
    let client = state.client_for(&session);
    match client.coupons().delete(&id).await {
        Ok(message) => {
            info!(coupon = %id, "Coupon deleted");
            notice_redirect(PATH, message.as_deref().unwrap_or("Coupon deleted"))
        }
        Err(e) => {
            warn!(coupon = %id, error = %e, "Coupon deletion failed");
            error_redirect(PATH, &e.user_message())
        }
    }
}
