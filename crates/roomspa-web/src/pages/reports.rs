//! Financial report and data export

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use roomspa_client::{Download, ExportKind};
use serde_json::Value;
use tracing::{info, warn};

use super::analytics::{DataTable, Frame, InsightsBody, InsightsPage, InsightsQuery, period_choices};
use super::{Kpi, SeriesTable, Unit, count_at, items_at, number_at};
use crate::forms::ExportForm;
use crate::list;
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;
use roomspa_core::format::{format_currency, format_number, format_percent};
use roomspa_core::lenient::{value_to_f64, value_to_string};

const FINANCIAL: &str = "/admin/reports/financial";
const EXPORT: &str = "/admin/reports/export";

/// Financial report body
#[must_use]
pub fn financial_body(payload: &Value) -> InsightsBody {
    let growth = number_at(payload, "growth_rate");
    let growth_hint = if growth >= 0.0 { "vs previous period" } else { "decline vs previous period" };

    InsightsBody {
        kpis: vec![
            Kpi::new("Total Revenue", format_currency(number_at(payload, "total_revenue"))),
            Kpi::new("Total Bookings", format_number(count_at(payload, "total_bookings"))),
            Kpi::new("Avg Booking Value", format_currency(number_at(payload, "avg_booking_value"))),
            Kpi::new("Growth Rate", format_percent(growth)).hint(growth_hint),
        ],
        charts: vec![SeriesTable::project(
            "Daily Revenue",
            payload,
            "daily_revenue",
            "date",
            "revenue",
            Unit::Currency,
        )],
        tables: vec![DataTable {
            title: "Revenue by Service",
            headers: vec!["Service", "Revenue", "Bookings"],
            rows: items_at(payload, "revenue_by_service")
                .iter()
                .map(|s| {
                    let number = |field: &str| s.get(field).and_then(value_to_f64).unwrap_or_default();
                    vec![
                        s.get("service").and_then(value_to_string).unwrap_or_default(),
                        Unit::Currency.format(number("revenue")),
                        Unit::Count.format(number("bookings")),
                    ]
                })
                .collect(),
        }],
        tags: Vec::new(),
    }
}

/// `GET /admin/reports`
pub async fn index() -> Redirect {
    Redirect::to(FINANCIAL)
}

/// `GET /admin/reports/financial`
pub async fn financial(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let period = query.period();
    let client = state.client_for(&session);
    let loaded = list::load(client.reports().financial(period)).await;

    let frame = Frame {
        path: FINANCIAL,
        heading: "Financial Reports",
        subtitle: "Revenue, bookings and growth for the selected period",
        unavailable: "Report Data Not Available",
    };
    render::page(&InsightsPage::build(
        &session,
        frame,
        loaded,
        financial_body,
        period_choices(period),
        Vec::new(),
    ))
}

/// One selectable data set on the export form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOption {
    /// Submitted value
    pub value: &'static str,
    /// Caption
    pub label: &'static str,
    /// Explanation under the caption
    pub description: &'static str,
    /// Currently chosen
    pub selected: bool,
}

/// Export options with `current` marked, the first one when nothing matches
#[must_use]
pub fn export_options(current: &str) -> Vec<ExportOption> {
    let current = ExportKind::parse(current).unwrap_or(ExportKind::Bookings);
    ExportKind::ALL
        .into_iter()
        .map(|kind| ExportOption {
            value: kind.as_str(),
            label: kind.label(),
            description: kind.description(),
            selected: kind == current,
        })
        .collect()
}

/// `/admin/reports/export`
#[derive(Template)]
#[template(path = "export.html")]
pub struct ExportPage {
    /// Layout
    pub shell: Shell,
    /// Data sets
    pub options: Vec<ExportOption>,
    /// Entered dates
    pub form: ExportForm,
    /// Why the last export failed
    pub error: Option<String>,
}

impl ExportPage {
    fn new(session: &SessionContext, form: ExportForm, error: Option<String>) -> Self {
        Self {
            shell: Shell::new(session, EXPORT),
            options: export_options(&form.kind),
            form,
            error,
        }
    }
}

/// `GET /admin/reports/export`
pub async fn export_form(Extension(session): Extension<SessionContext>) -> Response {
    render::page(&ExportPage::new(&session, ExportForm::default(), None))
}

/// Attachment response for a downloaded export
#[must_use]
pub fn attachment(download: Download) -> Response {
    let filename: String = download
        .filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && *c != '"' && *c != '\\')
        .collect();
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, download.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response()
}

/// `POST /admin/reports/export`
pub async fn export(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<ExportForm>,
) -> Response {
    let outcome = match form.to_params() {
        Ok(params) => state.client_for(&session).export().data(&params).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(download) => {
            info!(kind = %form.kind, file = %download.filename, bytes = download.bytes.len(), "Export ready");
            attachment(download)
        }
        Err(e) => {
            warn!(error = %e, kind = %form.kind, "Export failed");
            let message = e.user_message();
            render::page_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                &ExportPage::new(&session, form, Some(message)),
            )
        }
    }
}
