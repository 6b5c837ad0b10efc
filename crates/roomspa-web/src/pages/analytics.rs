//! Analytics pages: overview, bookings, therapists and advanced metrics
//!
//! Payloads stay untyped; each page projects the series it draws and degrades
//! to an empty state when the backend has nothing to offer.

use askama::Template;
use axum::{
    Extension,
    extract::{Query, State},
    response::Response,
};
use roomspa_client::{Metric, Period};
use roomspa_core::format::{format_currency, format_number, format_percent, format_rating};
use serde::Deserialize;
use serde_json::Value;

use super::{Choice, Kpi, SeriesTable, Unit, count_at, items_at, lookup, number_at, strings_at};
use crate::list::{self, LoadState};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;
use roomspa_core::lenient::{value_to_f64, value_to_string};

/// Heading of the empty state shown when analytics cannot be loaded
pub const ANALYTICS_UNAVAILABLE: &str = "Analytics Data Not Available";

/// Period and metric selectors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InsightsQuery {
    /// `week`, `month`, `quarter` or `year`
    pub period: Option<String>,
    /// Advanced analytics metric
    pub metric: Option<String>,
}

impl InsightsQuery {
    /// Selected period, `month` when unset or unknown
    #[must_use]
    pub fn period(&self) -> Period {
        Period::parse_or_default(self.period.as_deref())
    }

    /// Selected metric, `overview` when unset or unknown
    #[must_use]
    pub fn metric(&self) -> Metric {
        Metric::parse_or_default(self.metric.as_deref())
    }
}

/// Period selector options
#[must_use]
pub fn period_choices(selected: Period) -> Vec<Choice> {
    Period::ALL
        .iter()
        .map(|p| Choice {
            value: p.as_str(),
            label: p.label(),
            selected: *p == selected,
        })
        .collect()
}

/// Metric selector options
#[must_use]
pub fn metric_choices(selected: Metric) -> Vec<Choice> {
    Metric::ALL
        .iter()
        .map(|m| Choice {
            value: m.as_str(),
            label: m.label(),
            selected: *m == selected,
        })
        .collect()
}

/// A small text table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Heading
    pub title: &'static str,
    /// Column captions
    pub headers: Vec<&'static str>,
    /// Cells, row major
    pub rows: Vec<Vec<String>>,
}

/// A labelled group of chips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    /// Heading
    pub title: &'static str,
    /// Chip labels
    pub tags: Vec<String>,
}

/// Everything an insights page draws
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightsBody {
    /// Headline figures
    pub kpis: Vec<Kpi>,
    /// Bar series
    pub charts: Vec<SeriesTable>,
    /// Detail tables
    pub tables: Vec<DataTable>,
    /// Chip groups
    pub tags: Vec<TagGroup>,
}

impl InsightsBody {
    fn drop_empty(mut self) -> Self {
        self.charts.retain(|c| !c.is_empty());
        self.tables.retain(|t| !t.rows.is_empty());
        self.tags.retain(|g| !g.tags.is_empty());
        self
    }
}

/// Static framing of an insights page
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Route, also the selector form target
    pub path: &'static str,
    /// Heading
    pub heading: &'static str,
    /// Line under the heading
    pub subtitle: &'static str,
    /// Empty-state heading
    pub unavailable: &'static str,
}

/// Shared template for analytics and report pages
#[derive(Template)]
#[template(path = "insights.html")]
pub struct InsightsPage {
    /// Layout
    pub shell: Shell,
    /// Heading
    pub heading: &'static str,
    /// Line under the heading
    pub subtitle: &'static str,
    /// Selector form target
    pub action: &'static str,
    /// Period options
    pub periods: Vec<Choice>,
    /// Metric options, empty when the page has none
    pub metrics: Vec<Choice>,
    /// Content, absent when the data is unavailable
    pub body: Option<InsightsBody>,
    /// Empty-state heading
    pub unavailable: &'static str,
    /// Empty-state detail
    pub message: String,
}

impl InsightsPage {
    /// Assemble a page from a load result
    pub fn build(
        session: &SessionContext,
        frame: Frame,
        loaded: LoadState<Value>,
        build: impl FnOnce(&Value) -> InsightsBody,
        periods: Vec<Choice>,
        metrics: Vec<Choice>,
    ) -> Self {
        let (body, message) = match loaded {
            LoadState::Loaded(payload) if !payload.is_null() => (Some(build(&payload).drop_empty()), String::new()),
            LoadState::Failed(message) => (None, message),
            _ => (None, "No data was returned for this period.".to_string()),
        };
        Self {
            shell: Shell::new(session, frame.path),
            heading: frame.heading,
            subtitle: frame.subtitle,
            action: frame.path,
            periods,
            metrics,
            body,
            unavailable: frame.unavailable,
            message,
        }
    }
}

fn currency_kpi(label: &'static str, payload: &Value, path: &str) -> Kpi {
    Kpi::new(label, format_currency(number_at(payload, path)))
}

fn count_kpi(label: &'static str, payload: &Value, path: &str) -> Kpi {
    Kpi::new(label, format_number(count_at(payload, path)))
}

fn percent_kpi(label: &'static str, payload: &Value, path: &str) -> Kpi {
    Kpi::new(label, format_percent(number_at(payload, path)))
}

fn cell(item: &Value, field: &str) -> String {
    item.get(field).and_then(value_to_string).unwrap_or_default()
}

fn cell_with(item: &Value, field: &str, unit: Unit) -> String {
    unit.format(item.get(field).and_then(value_to_f64).unwrap_or_default())
}

/// Overview page body
#[must_use]
pub fn overview_body(payload: &Value) -> InsightsBody {
    InsightsBody {
        kpis: vec![
            currency_kpi("Total Revenue", payload, "financial_summary.total_revenue"),
            count_kpi("Total Bookings", payload, "financial_summary.total_bookings"),
            currency_kpi("Avg Booking Value", payload, "financial_summary.avg_booking_value"),
            percent_kpi("Completion Rate", payload, "financial_summary.completion_rate"),
        ],
        charts: vec![
            SeriesTable::project("Daily Bookings", payload, "daily_trends", "date", "bookings", Unit::Count),
            SeriesTable::project("Daily Revenue", payload, "daily_trends", "date", "revenue", Unit::Currency),
        ],
        ..InsightsBody::default()
    }
}

/// Booking analytics body
#[must_use]
pub fn bookings_body(payload: &Value) -> InsightsBody {
    InsightsBody {
        kpis: vec![
            count_kpi("Total Bookings", payload, "total_bookings"),
            currency_kpi("Avg Booking Value", payload, "avg_booking_value"),
            percent_kpi("Completion Rate", payload, "booking_completion_rate"),
            count_kpi("Cancelled", payload, "cancelled_bookings"),
        ],
        charts: vec![
            SeriesTable::project("Booking Trends", payload, "booking_trends", "date", "bookings", Unit::Count),
            SeriesTable::project("Revenue Trends", payload, "booking_trends", "date", "revenue", Unit::Currency),
            SeriesTable::project("Popular Time Slots", payload, "popular_time_slots", "hour", "bookings", Unit::Count),
            SeriesTable::project("Service Popularity", payload, "service_popularity", "service", "bookings", Unit::Count),
            SeriesTable::project(
                "Geographical Distribution",
                payload,
                "geographical_distribution",
                "location",
                "bookings",
                Unit::Count,
            ),
        ],
        tables: vec![DataTable {
            title: "Customer Segments",
            headers: vec!["Segment", "Bookings", "Share"],
            rows: items_at(payload, "customer_segments")
                .iter()
                .map(|s| {
                    vec![
                        cell(s, "segment"),
                        cell_with(s, "bookings", Unit::Count),
                        cell_with(s, "percentage", Unit::Percent),
                    ]
                })
                .collect(),
        }],
        tags: Vec::new(),
    }
}

/// Therapist analytics body
#[must_use]
pub fn therapists_body(payload: &Value) -> InsightsBody {
    let satisfaction = [
        ("5 stars", "five_star_percentage"),
        ("4 stars", "four_star_percentage"),
        ("3 stars", "three_star_percentage"),
        ("2 stars", "two_star_percentage"),
        ("1 star", "one_star_percentage"),
    ];
    let satisfaction_chart = if lookup(payload, "customer_satisfaction").is_some() {
        SeriesTable::new(
            "Customer Satisfaction",
            satisfaction.iter().map(|(label, _)| (*label).to_string()).collect(),
            &satisfaction
                .iter()
                .map(|(_, key)| number_at(payload, &format!("customer_satisfaction.{key}")))
                .collect::<Vec<_>>(),
            Unit::Percent,
        )
    } else {
        SeriesTable::new("Customer Satisfaction", Vec::new(), &[], Unit::Percent)
    };

    InsightsBody {
        kpis: vec![
            count_kpi("Total Therapists", payload, "total_therapists"),
            count_kpi("Active Therapists", payload, "active_therapists"),
            Kpi::new("Avg Rating", format_rating(number_at(payload, "avg_rating"))),
            currency_kpi("Total Revenue", payload, "total_revenue"),
            percent_kpi("Avg Availability", payload, "availability_stats.avg_availability").hint(format!(
                "{} fully booked days",
                format_number(count_at(payload, "availability_stats.fully_booked_days"))
            )),
        ],
        charts: vec![
            SeriesTable::project("Sessions", payload, "performance_trends", "month", "sessions", Unit::Count),
            SeriesTable::project("Revenue", payload, "performance_trends", "month", "revenue", Unit::Currency),
            SeriesTable::project(
                "Specialties",
                payload,
                "specialties_distribution",
                "specialty",
                "therapists",
                Unit::Count,
            ),
            satisfaction_chart,
        ],
        tables: vec![DataTable {
            title: "Top Performers",
            headers: vec!["Therapist", "Rating", "Sessions", "Revenue", "Specialties"],
            rows: items_at(payload, "top_performers")
                .iter()
                .map(|t| {
                    vec![
                        cell(t, "name"),
                        format_rating(t.get("rating").and_then(value_to_f64).unwrap_or_default()),
                        cell_with(t, "sessions", Unit::Count),
                        cell_with(t, "revenue", Unit::Currency),
                        strings_at(t, "specialties").join(", "),
                    ]
                })
                .collect(),
        }],
        tags: vec![
            TagGroup {
                title: "Peak Hours",
                tags: strings_at(payload, "availability_stats.peak_hours"),
            },
            TagGroup {
                title: "Low Availability",
                tags: strings_at(payload, "availability_stats.low_availability_periods"),
            },
        ],
    }
}

/// Advanced analytics body
#[must_use]
pub fn advanced_body(payload: &Value) -> InsightsBody {
    let correlations = [
        ("Price vs demand", "price_vs_demand"),
        ("Rating vs bookings", "rating_vs_bookings"),
        ("Marketing spend vs acquisition", "marketing_spend_vs_acquisition"),
        ("Weather vs bookings", "weather_vs_bookings"),
    ];

    InsightsBody {
        kpis: vec![
            currency_kpi("Customer Lifetime Value", payload, "kpis.customer_lifetime_value"),
            currency_kpi("Acquisition Cost", payload, "kpis.customer_acquisition_cost"),
            percent_kpi("Churn Rate", payload, "kpis.churn_rate"),
            percent_kpi("Repeat Customers", payload, "kpis.repeat_customer_rate"),
            percent_kpi("Conversion Rate", payload, "kpis.booking_conversion_rate"),
            currency_kpi("Revenue per Customer", payload, "kpis.revenue_per_customer"),
            currency_kpi(
                "Next Month Forecast",
                payload,
                "predictive_insights.next_month_revenue_forecast",
            )
            .hint(format!(
                "{} projected customer growth",
                format_percent(number_at(payload, "predictive_insights.customer_growth_projection"))
            )),
        ],
        charts: vec![
            SeriesTable::project(
                "Weekly Bookings",
                payload,
                "seasonal_patterns.weekly_patterns",
                "day",
                "bookings",
                Unit::Count,
            ),
            SeriesTable::project(
                "Weekly Avg Value",
                payload,
                "seasonal_patterns.weekly_patterns",
                "day",
                "avg_value",
                Unit::Currency,
            ),
            SeriesTable::project("Revenue by Region", payload, "geographic_heatmap", "region", "revenue", Unit::Currency),
            SeriesTable::project(
                "Demand Forecast",
                payload,
                "predictive_insights.demand_forecast",
                "service",
                "projected_demand",
                Unit::Count,
            ),
        ],
        tables: vec![
            DataTable {
                title: "Cohort Retention",
                headers: vec!["Cohort", "Month 1", "Month 3", "Month 6"],
                rows: items_at(payload, "cohort_analysis")
                    .iter()
                    .map(|c| {
                        vec![
                            cell(c, "month"),
                            cell_with(c, "month_1", Unit::Percent),
                            cell_with(c, "month_3", Unit::Percent),
                            cell_with(c, "month_6", Unit::Percent),
                        ]
                    })
                    .collect(),
            },
            DataTable {
                title: "Segments",
                headers: vec!["Segment", "Size", "Avg Value", "Retention", "Traits"],
                rows: items_at(payload, "advanced_segments")
                    .iter()
                    .map(|s| {
                        let name = cell(s, "name");
                        vec![
                            if name.is_empty() { cell(s, "segment") } else { name },
                            cell_with(s, "size", Unit::Count),
                            cell_with(s, "avg_value", Unit::Currency),
                            cell_with(s, "retention_rate", Unit::Percent),
                            strings_at(s, "characteristics").join(", "),
                        ]
                    })
                    .collect(),
            },
            DataTable {
                title: "Correlation Matrix",
                headers: vec!["Factors", "Coefficient"],
                rows: if lookup(payload, "correlation_matrix").is_some() {
                    correlations
                        .iter()
                        .map(|(label, key)| {
                            vec![
                                (*label).to_string(),
                                format!("{:.2}", number_at(payload, &format!("correlation_matrix.{key}"))),
                            ]
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            },
        ],
        tags: Vec::new(),
    }
}

async fn period_page(
    state: &SharedState,
    session: &SessionContext,
    query: &InsightsQuery,
    frame: Frame,
    build: fn(&Value) -> InsightsBody,
) -> Response {
    let period = query.period();
    let client = state.client_for(session);
    let analytics = client.analytics();
    let loaded = match frame.path {
        THERAPISTS => list::load(analytics.therapists(period)).await,
        _ => list::load(analytics.bookings(period)).await,
    };
    render::page(&InsightsPage::build(
        session,
        frame,
        loaded,
        build,
        period_choices(period),
        Vec::new(),
    ))
}

const OVERVIEW: &str = "/admin/analytics";
const BOOKINGS: &str = "/admin/analytics/bookings";
const THERAPISTS: &str = "/admin/analytics/therapists";
const ADVANCED: &str = "/admin/analytics/advanced";

/// `GET /admin/analytics`
pub async fn overview(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let frame = Frame {
        path: OVERVIEW,
        heading: "Analytics Overview",
        subtitle: "Revenue and booking trends across the business",
        unavailable: ANALYTICS_UNAVAILABLE,
    };
    period_page(&state, &session, &query, frame, overview_body).await
}

/// `GET /admin/analytics/bookings`
pub async fn bookings(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let frame = Frame {
        path: BOOKINGS,
        heading: "Booking Analytics",
        subtitle: "Booking volume, timing, services and customer segments",
        unavailable: ANALYTICS_UNAVAILABLE,
    };
    period_page(&state, &session, &query, frame, bookings_body).await
}

/// `GET /admin/analytics/therapists`
pub async fn therapists(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let frame = Frame {
        path: THERAPISTS,
        heading: "Therapist Analytics",
        subtitle: "Performance, ratings and availability of the therapist team",
        unavailable: ANALYTICS_UNAVAILABLE,
    };
    period_page(&state, &session, &query, frame, therapists_body).await
}

/// `GET /admin/analytics/advanced`
pub async fn advanced(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let (metric, period) = (query.metric(), query.period());
    let client = state.client_for(&session);
    let loaded = list::load(client.analytics().advanced(metric, period)).await;

    let frame = Frame {
        path: ADVANCED,
        heading: "Advanced Analytics",
        subtitle: "Customer value, retention, seasonality and forecasts",
        unavailable: ANALYTICS_UNAVAILABLE,
    };
    render::page(&InsightsPage::build(
        &session,
        frame,
        loaded,
        advanced_body,
        period_choices(period),
        metric_choices(metric),
    ))
}
