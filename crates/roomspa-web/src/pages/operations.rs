//! Operational pages: live monitoring, system health, push notifications and
//! platform settings
//!
//! Monitoring and system health render a panel once on the page and again on
//! every live tick, so the panel builders are shared with the WebSocket
//! handlers. When the backend is unreachable both fall back to fixed sample
//! values and mark the panel as a placeholder.

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Local;
use roomspa_client::ApiClient;
use roomspa_core::format::{format_currency, format_number, format_percent};
use roomspa_core::lenient::value_to_string;
use roomspa_core::types::TokenSummary;
use serde_json::{Map, Number, Value, json};
use tracing::{info, warn};

use super::{Kpi, count_at, items_at, lookup, notice_redirect, number_at, text_at};
use crate::forms::{NotificationForm, SettingsForm};
use crate::list::{self, ListQuery, LoadState};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const MONITORING: &str = "/admin/monitoring";
const SYSTEM: &str = "/admin/system";
const NOTIFICATIONS: &str = "/admin/notifications";
const SETTINGS: &str = "/admin/settings";

/// Badge class for a health word
#[must_use]
pub fn status_class(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "healthy" | "running" | "secure" | "good" | "ok" => "ok",
        "warning" | "degraded" | "fair" => "warn",
        "error" | "down" | "critical" | "poor" => "bad",
        _ => "neutral",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.trim().chars();
    chars.next().map_or_else(
        || "Unknown".to_string(),
        |first| first.to_uppercase().chain(chars).collect(),
    )
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Sample values shown when `monitoring/` cannot be loaded
#[must_use]
pub fn monitoring_placeholder() -> Value {
    json!({
        "system_status": "healthy",
        "active_users": 142,
        "active_sessions": 89,
        "server_load": 45.2,
        "response_time": 127,
        "database_connections": 23,
        "memory_usage": 67.8,
        "disk_usage": 34.1,
        "uptime": "15 days, 8 hours",
        "recent_alerts": [
            {"type": "warning", "message": "High response time detected", "time": "2 minutes ago"},
            {"type": "info", "message": "Database backup completed", "time": "1 hour ago"}
        ]
    })
}

/// Sample values shown when `system/health/` cannot be loaded
#[must_use]
pub fn system_placeholder() -> Value {
    json!({
        "system_status": "healthy",
        "db_stats": {
            "total_users": 138,
            "total_bookings": 67,
            "total_conversations": 9,
            "total_messages": 67
        },
        "activity_stats": {
            "registrations_24h": 1,
            "bookings_24h": 1,
            "messages_24h": 0,
            "revenue_24h": 0.0
        },
        "health_indicators": [
            {"type": "performance", "metric": "Avg Response Time", "value": "250ms", "status": "good"},
            {"type": "database", "metric": "Database Performance", "value": "good", "status": "good"}
        ],
        "uptime": {"percentage": 99.9, "last_incident": null}
    })
}

/// A recent alert line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRow {
    /// `warning`, `error` or `info`
    pub level: String,
    /// Text
    pub message: String,
    /// Relative time as the backend words it
    pub time: String,
}

/// Live monitoring panel, rendered on the page and on every live tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringPanel {
    /// Overall status word
    pub status: String,
    /// Badge class for the status
    pub status_class: &'static str,
    /// Activity and resource figures
    pub kpis: Vec<Kpi>,
    /// Recent alerts
    pub alerts: Vec<AlertRow>,
    /// Uptime as worded by the backend
    pub uptime: String,
    /// Values are samples, not live data
    pub placeholder: bool,
    /// Local time of the fetch
    pub updated_at: String,
}

impl MonitoringPanel {
    /// Project a `monitoring/` payload
    #[must_use]
    pub fn from_payload(payload: &Value, placeholder: bool) -> Self {
        let status = text_at(payload, "system_status");
        let uptime = text_at(payload, "uptime");
        Self {
            status_class: status_class(&status),
            status: capitalize(&status),
            kpis: vec![
                Kpi::new("Active Users", format_number(count_at(payload, "active_users"))),
                Kpi::new("Active Sessions", format_number(count_at(payload, "active_sessions"))),
                Kpi::new("Server Load", format_percent(number_at(payload, "server_load"))),
                Kpi::new("Response Time", format!("{} ms", format_number(count_at(payload, "response_time")))),
                Kpi::new(
                    "Database Connections",
                    format_number(count_at(payload, "database_connections")),
                ),
                Kpi::new("Memory Usage", format_percent(number_at(payload, "memory_usage"))),
                Kpi::new("Disk Usage", format_percent(number_at(payload, "disk_usage"))),
            ],
            alerts: items_at(payload, "recent_alerts")
                .iter()
                .map(|alert| AlertRow {
                    level: text_at(alert, "type").to_lowercase(),
                    message: text_at(alert, "message"),
                    time: text_at(alert, "time"),
                })
                .collect(),
            uptime: if uptime.is_empty() { "—".to_string() } else { uptime },
            placeholder,
            updated_at: timestamp(),
        }
    }

    /// Fetch and project, falling back to the sample values
    pub async fn load(client: &ApiClient) -> Self {
        match list::load(client.monitoring().live()).await {
            LoadState::Loaded(payload) => Self::from_payload(&payload, false),
            _ => {
                warn!("Monitoring data unavailable, showing placeholder values");
                Self::from_payload(&monitoring_placeholder(), true)
            }
        }
    }
}

/// A health indicator row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRow {
    /// Area, e.g. `performance`
    pub kind: String,
    /// Caption
    pub metric: String,
    /// Reading
    pub value: String,
    /// Status word
    pub status: String,
    /// Badge class
    pub status_class: &'static str,
}

/// System health panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPanel {
    /// Overall status word
    pub status: String,
    /// Badge class for the status
    pub status_class: &'static str,
    /// Database totals
    pub database: Vec<Kpi>,
    /// Last 24 hours
    pub activity: Vec<Kpi>,
    /// Indicator rows
    pub indicators: Vec<IndicatorRow>,
    /// Uptime percentage
    pub uptime: String,
    /// Last incident, `None recorded` when absent
    pub last_incident: String,
    /// Values are samples, not live data
    pub placeholder: bool,
    /// Local time of the fetch
    pub updated_at: String,
}

impl SystemPanel {
    /// Project a `system/health/` payload
    #[must_use]
    pub fn from_payload(payload: &Value, placeholder: bool) -> Self {
        let status = text_at(payload, "system_status");
        let incident = text_at(payload, "uptime.last_incident");
        Self {
            status_class: status_class(&status),
            status: capitalize(&status),
            database: vec![
                Kpi::new("Users", format_number(count_at(payload, "db_stats.total_users"))),
                Kpi::new("Bookings", format_number(count_at(payload, "db_stats.total_bookings"))),
                Kpi::new(
                    "Conversations",
                    format_number(count_at(payload, "db_stats.total_conversations")),
                ),
                Kpi::new("Messages", format_number(count_at(payload, "db_stats.total_messages"))),
            ],
            activity: vec![
                Kpi::new(
                    "Registrations",
                    format_number(count_at(payload, "activity_stats.registrations_24h")),
                ),
                Kpi::new("Bookings", format_number(count_at(payload, "activity_stats.bookings_24h"))),
                Kpi::new("Messages", format_number(count_at(payload, "activity_stats.messages_24h"))),
                Kpi::new("Revenue", format_currency(number_at(payload, "activity_stats.revenue_24h"))),
            ],
            indicators: items_at(payload, "health_indicators")
                .iter()
                .map(|item| {
                    let status = text_at(item, "status");
                    IndicatorRow {
                        kind: text_at(item, "type"),
                        metric: text_at(item, "metric"),
                        value: text_at(item, "value"),
                        status_class: status_class(&status),
                        status: capitalize(&status),
                    }
                })
                .collect(),
            uptime: lookup(payload, "uptime.percentage")
                .map_or_else(|| "—".to_string(), |_| format_percent(number_at(payload, "uptime.percentage"))),
            last_incident: if incident.is_empty() { "None recorded".to_string() } else { incident },
            placeholder,
            updated_at: timestamp(),
        }
    }

    /// Fetch and project, falling back to the sample values
    pub async fn load(client: &ApiClient) -> Self {
        match list::load(client.monitoring().system_health()).await {
            LoadState::Loaded(payload) => Self::from_payload(&payload, false),
            _ => {
                warn!("System health unavailable, showing placeholder values");
                Self::from_payload(&system_placeholder(), true)
            }
        }
    }
}

/// Panel markup pushed over the monitoring socket
#[derive(Template)]
#[template(path = "panels/monitoring.html")]
pub struct MonitoringFragment<'a> {
    /// Panel
    pub panel: &'a MonitoringPanel,
}

/// Panel markup pushed over the system health socket
#[derive(Template)]
#[template(path = "panels/system.html")]
pub struct SystemFragment<'a> {
    /// Panel
    pub panel: &'a SystemPanel,
}

/// `/admin/monitoring`
#[derive(Template)]
#[template(path = "monitoring.html")]
pub struct MonitoringPage {
    /// Layout
    pub shell: Shell,
    /// First render of the panel
    pub panel: MonitoringPanel,
    /// WebSocket path
    pub live_url: &'static str,
    /// Refresh period in seconds
    pub period_secs: u64,
}

/// `/admin/system`
#[derive(Template)]
#[template(path = "system.html")]
pub struct SystemPage {
    /// Layout
    pub shell: Shell,
    /// First render of the panel
    pub panel: SystemPanel,
    /// WebSocket path
    pub live_url: &'static str,
    /// Refresh period in seconds
    pub period_secs: u64,
}

/// `GET /admin/monitoring`
pub async fn monitoring(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let panel = MonitoringPanel::load(&state.client_for(&session)).await;
    render::page(&MonitoringPage {
        shell: Shell::new(&session, MONITORING),
        panel,
        live_url: "/admin/monitoring/live",
        period_secs: state.config.polling.monitoring_period().as_secs(),
    })
}

/// `GET /admin/system`
pub async fn system(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let panel = SystemPanel::load(&state.client_for(&session)).await;
    render::page(&SystemPage {
        shell: Shell::new(&session, SYSTEM),
        panel,
        live_url: "/admin/system/live",
        period_secs: state.config.polling.system_health_period().as_secs(),
    })
}

/// An audience radio button with its reachable device count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceOption {
    /// Submitted value
    pub value: &'static str,
    /// Caption
    pub label: &'static str,
    /// Formatted device count
    pub count: String,
    /// Currently chosen
    pub selected: bool,
}

const AUDIENCES: [(&str, &str); 3] = [("all", "All users"), ("customers", "Customers"), ("therapists", "Therapists")];

/// Sample token counts shown when `notifications/tokens/` cannot be loaded
#[must_use]
pub fn placeholder_tokens() -> Vec<TokenSummary> {
    [("customers", 120), ("therapists", 25), ("all", 145)]
        .into_iter()
        .map(|(user_type, count)| TokenSummary {
            user_type: user_type.to_string(),
            count,
        })
        .collect()
}

/// Audience options with counts; audiences missing from `tokens` count zero
#[must_use]
pub fn audiences(tokens: &[TokenSummary], selected: &str) -> Vec<AudienceOption> {
    AUDIENCES
        .iter()
        .map(|&(value, label)| AudienceOption {
            value,
            label,
            count: format_number(
                tokens
                    .iter()
                    .find(|t| t.user_type.eq_ignore_ascii_case(value))
                    .map_or(0, |t| t.count),
            ),
            selected: value == selected,
        })
        .collect()
}

/// `/admin/notifications`
#[derive(Template)]
#[template(path = "notifications.html")]
pub struct NotificationsPage {
    /// Layout
    pub shell: Shell,
    /// Audience options
    pub audiences: Vec<AudienceOption>,
    /// Entered values
    pub form: NotificationForm,
    /// Counts are samples
    pub placeholder: bool,
    /// Why the last send failed
    pub error: Option<String>,
}

impl NotificationsPage {
    async fn load(client: &ApiClient, shell: Shell, form: NotificationForm, error: Option<String>) -> Self {
        let (tokens, placeholder) = match list::load(client.notifications().tokens()).await {
            LoadState::Loaded(tokens) => (tokens, false),
            _ => (placeholder_tokens(), true),
        };
        Self {
            shell,
            audiences: audiences(&tokens, &form.user_type),
            form,
            placeholder,
            error,
        }
    }
}

/// `GET /admin/notifications`
pub async fn notifications(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let (notice, error) = query.flash();
    let shell = Shell::new(&session, NOTIFICATIONS).with_flash(notice, error);
    let client = state.client_for(&session);
    render::page(&NotificationsPage::load(&client, shell, NotificationForm::default(), None).await)
}

/// `POST /admin/notifications`
pub async fn send_notification(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<NotificationForm>,
) -> Response {
    let client = state.client_for(&session);
    let outcome = match form.to_request() {
        Ok(request) => client.notifications().send(&request).await.map(|_| request),
        Err(e) => Err(e),
    };
    match outcome {
        Ok(request) => {
            info!(audience = %request.user_type, "Push notification sent");
            notice_redirect(NOTIFICATIONS, "Notification sent successfully")
        }
        Err(e) => {
            warn!(error = %e, "Push notification failed");
            let shell = Shell::new(&session, NOTIFICATIONS);
            let page = NotificationsPage::load(&client, shell, form, Some(e.user_message())).await;
            render::page_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page)
        }
    }
}

/// How a setting is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Whole number
    Number,
    /// On/off
    Toggle,
}

impl FieldKind {
    /// `type` attribute of the input
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "tel",
            Self::Number => "number",
            Self::Toggle => "checkbox",
        }
    }
}

type FieldSpec = (&'static str, &'static str, FieldKind);

/// Editable sections: id, heading and fields
const SETTINGS_SCHEMA: [(&str, &str, &[FieldSpec]); 3] = [
    (
        "general",
        "General",
        &[
            ("business_name", "Business name", FieldKind::Text),
            ("business_email", "Business email", FieldKind::Email),
            ("business_phone", "Business phone", FieldKind::Phone),
            ("business_address", "Business address", FieldKind::Text),
            ("timezone", "Timezone", FieldKind::Text),
            ("currency", "Currency", FieldKind::Text),
            ("language", "Language", FieldKind::Text),
        ],
    ),
    (
        "notifications",
        "Notifications",
        &[
            ("email_notifications", "Email notifications", FieldKind::Toggle),
            ("sms_notifications", "SMS notifications", FieldKind::Toggle),
            ("push_notifications", "Push notifications", FieldKind::Toggle),
            ("booking_alerts", "Booking alerts", FieldKind::Toggle),
            ("payment_alerts", "Payment alerts", FieldKind::Toggle),
            ("system_alerts", "System alerts", FieldKind::Toggle),
            ("marketing_emails", "Marketing emails", FieldKind::Toggle),
        ],
    ),
    (
        "security",
        "Security",
        &[
            ("two_factor_auth", "Two-factor authentication", FieldKind::Toggle),
            ("session_timeout", "Session timeout (minutes)", FieldKind::Number),
            ("password_expiry", "Password expiry (days)", FieldKind::Number),
            ("login_attempts", "Max login attempts", FieldKind::Number),
            ("api_access", "API access", FieldKind::Toggle),
        ],
    ),
];

/// Sample settings shown when `settings/` cannot be loaded
#[must_use]
pub fn settings_placeholder() -> Value {
    json!({
        "general": {
            "business_name": "RoomSpa",
            "business_email": "admin@roomspa.com",
            "business_phone": "+1 (555) 123-4567",
            "business_address": "123 Wellness Street, City, State 12345",
            "timezone": "America/New_York",
            "currency": "USD",
            "language": "en"
        },
        "notifications": {
            "email_notifications": true,
            "sms_notifications": true,
            "push_notifications": true,
            "booking_alerts": true,
            "payment_alerts": true,
            "system_alerts": true,
            "marketing_emails": false
        },
        "security": {
            "two_factor_auth": false,
            "session_timeout": 30,
            "password_expiry": 90,
            "login_attempts": 5,
            "api_access": true
        },
        "payments": {
            "stripe_publishable_key": "pk_test_...",
            "stripe_secret_key": "sk_test_...",
            "processing_fee": 2.9,
            "auto_capture": true,
            "refund_policy": 24
        }
    })
}

/// One input on the settings form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsField {
    /// Form name, `section.key`
    pub name: String,
    /// Caption
    pub label: &'static str,
    /// `type` attribute
    pub input_type: &'static str,
    /// Checkbox rather than a text input
    pub is_toggle: bool,
    /// Current value for text inputs
    pub value: String,
    /// Current state for checkboxes
    pub checked: bool,
}

/// A titled group of inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSection {
    /// Section key
    pub id: &'static str,
    /// Heading
    pub title: &'static str,
    /// Inputs
    pub fields: Vec<SettingsField>,
}

/// Form sections for a settings object
#[must_use]
pub fn settings_sections(settings: &Value) -> Vec<SettingsSection> {
    SETTINGS_SCHEMA
        .iter()
        .map(|&(id, title, fields)| SettingsSection {
            id,
            title,
            fields: fields
                .iter()
                .map(|&(key, label, kind)| {
                    let current = lookup(settings, &format!("{id}.{key}"));
                    SettingsField {
                        name: format!("{id}.{key}"),
                        label,
                        input_type: kind.input_type(),
                        is_toggle: kind == FieldKind::Toggle,
                        value: current.and_then(value_to_string).unwrap_or_default(),
                        checked: current.and_then(Value::as_bool).unwrap_or(false),
                    }
                })
                .collect(),
        })
        .collect()
}

fn parse_setting(kind: FieldKind, label: &str, raw: Option<&String>) -> roomspa_core::Result<Option<Value>> {
    match kind {
        FieldKind::Toggle => Ok(Some(Value::Bool(raw.is_some()))),
        FieldKind::Number => match raw.map(|r| r.trim()).filter(|r| !r.is_empty()) {
            None => Ok(None),
            Some(text) => text
                .parse::<i64>()
                .map(|n| Some(Value::Number(Number::from(n))))
                .map_err(|_| roomspa_core::Error::Validation {
                    field: label.to_string(),
                    message: format!("{label} must be a whole number"),
                }),
        },
        FieldKind::Text | FieldKind::Email | FieldKind::Phone => {
            Ok(raw.map(|r| Value::String(r.trim().to_string())))
        }
    }
}

/// Sections showing the submitted form exactly as typed
///
/// Used when a save fails, so the admin gets their input back rather than the
/// stored or sample values. Fields missing from the submission fall back to
/// `settings`.
#[must_use]
pub fn submitted_sections(settings: &Value, form: &SettingsForm) -> Vec<SettingsSection> {
    let mut sections = settings_sections(settings);
    for field in sections.iter_mut().flat_map(|s| s.fields.iter_mut()) {
        let raw = form.get(&field.name);
        if field.is_toggle {
            field.checked = raw.is_some();
        } else if let Some(raw) = raw {
            field.value.clone_from(raw);
        }
    }
    sections
}

/// Write submitted values over `settings`
///
/// Only the editable fields are touched; everything else in the object,
/// payment settings included, is sent back as it was loaded. An unticked
/// checkbox is absent from the form and reads as `false`; a blank number keeps
/// the current value.
///
/// # Errors
///
/// Returns a validation error naming every number field that does not parse.
/// Valid fields are still written.
pub fn apply_settings(settings: &mut Value, form: &SettingsForm) -> roomspa_core::Result<()> {
    if !settings.is_object() {
        *settings = Value::Object(Map::new());
    }
    let mut invalid: Vec<roomspa_core::Error> = Vec::new();
    for &(section, _, fields) in &SETTINGS_SCHEMA {
        for &(key, label, kind) in fields {
            let value = match parse_setting(kind, label, form.get(&format!("{section}.{key}"))) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    invalid.push(e);
                    continue;
                }
            };
            if let Some(root) = settings.as_object_mut() {
                let group = root
                    .entry(section)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !group.is_object() {
                    *group = Value::Object(Map::new());
                }
                if let Some(group) = group.as_object_mut() {
                    group.insert(key.to_string(), value);
                }
            }
        }
    }
    if invalid.len() > 1 {
        return Err(roomspa_core::Error::Validation {
            field: "settings".to_string(),
            message: invalid
                .iter()
                .map(roomspa_core::Error::user_message)
                .collect::<Vec<_>>()
                .join("; "),
        });
    }
    invalid.pop().map_or(Ok(()), Err)
}

/// `/admin/settings`
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsPage {
    /// Layout
    pub shell: Shell,
    /// Form sections
    pub sections: Vec<SettingsSection>,
    /// Values are samples because loading failed
    pub placeholder: bool,
    /// Why the last save failed
    pub error: Option<String>,
}

/// `GET /admin/settings`
pub async fn settings(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let (current, placeholder) = match list::load(state.client_for(&session).settings().get()).await {
        LoadState::Loaded(current) => (current, false),
        _ => {
            warn!("Settings unavailable, showing placeholder values");
            (settings_placeholder(), true)
        }
    };
    let (notice, error) = query.flash();
    render::page(&SettingsPage {
        shell: Shell::new(&session, SETTINGS).with_flash(notice, error),
        sections: settings_sections(&current),
        placeholder,
        error: None,
    })
}

/// `POST /admin/settings`
///
/// Re-reads the stored settings and writes the form over them, so a save never
/// replaces real values with the placeholder sample.
pub async fn save_settings(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let client = state.client_for(&session);
    let outcome = match client.settings().get().await {
        Ok(mut current) => match apply_settings(&mut current, &form) {
            Ok(()) => client.settings().update(&current).await.map(|_| current),
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => {
            info!("Platform settings saved");
            notice_redirect(SETTINGS, "Settings saved successfully")
        }
        Err(e) => {
            warn!(error = %e, "Saving settings failed");
            render::page_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                &SettingsPage {
                    shell: Shell::new(&session, SETTINGS),
                    sections: submitted_sections(&settings_placeholder(), &form),
                    placeholder: false,
                    error: Some(e.user_message()),
                },
            )
        }
    }
}
