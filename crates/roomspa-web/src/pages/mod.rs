//! Page view models, templates and page handlers
//!
//! Each page module turns backend payloads into flat display records that the
//! askama templates render without further logic.

pub mod analytics;
pub mod bookings;
pub mod conversations;
pub mod coupons;
pub mod dashboard;
pub mod not_found;
pub mod operations;
pub mod people;
pub mod reports;

use axum::response::{IntoResponse, Redirect, Response};
use roomspa_core::format::{format_currency, format_number, format_percent};
use roomspa_core::lenient::{value_to_f64, value_to_string, value_to_u64};
use serde::Deserialize;
use serde_json::Value;

/// Append query pairs to a local path
#[must_use]
pub fn with_query(target: &str, pairs: &[(&str, &str)]) -> String {
    match serde_urlencoded::to_string(pairs) {
        Ok(query) if !query.is_empty() => {
            let separator = if target.contains('?') { '&' } else { '?' };
            format!("{target}{separator}{query}")
        }
        _ => target.to_string(),
    }
}

/// Redirect after a successful mutation, carrying a notice
pub fn notice_redirect(target: &str, message: &str) -> Response {
    Redirect::to(&with_query(target, &[("notice", message)])).into_response()
}

/// Redirect after a failed mutation, carrying the error
pub fn error_redirect(target: &str, message: &str) -> Response {
    Redirect::to(&with_query(target, &[("error", message)])).into_response()
}

/// Follow a dotted path (`financial_summary.total_revenue`) into a payload
#[must_use]
pub fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|key| !key.is_empty())
        .try_fold(payload, |node, key| node.get(key))
}

/// Number at `path`, zero when absent or malformed
#[must_use]
pub fn number_at(payload: &Value, path: &str) -> f64 {
    lookup(payload, path).and_then(value_to_f64).unwrap_or_default()
}

/// Count at `path`, zero when absent or malformed
#[must_use]
pub fn count_at(payload: &Value, path: &str) -> u64 {
    lookup(payload, path)
        .and_then(|v| value_to_u64(v).or_else(|| value_to_f64(v).map(clamp_count)))
        .unwrap_or_default()
}

/// Text at `path`, empty when absent
#[must_use]
pub fn text_at(payload: &Value, path: &str) -> String {
    lookup(payload, path).and_then(value_to_string).unwrap_or_default()
}

/// Items of the array at `path`; anything else is empty
#[must_use]
pub fn items_at<'a>(payload: &'a Value, path: &str) -> &'a [Value] {
    lookup(payload, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Decode the array at `path` into records, dropping the list when it does not fit
#[must_use]
pub fn records_at<T: for<'de> Deserialize<'de>>(payload: &Value, path: &str) -> Vec<T> {
    lookup(payload, path)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Strings of the array at `path`
#[must_use]
pub fn strings_at(payload: &Value, path: &str) -> Vec<String> {
    items_at(payload, path)
        .iter()
        .filter_map(value_to_string)
        .collect()
}

/// Project one numeric field out of every item of a series
///
/// Missing items or fields become zero so the series keeps its length.
#[must_use]
pub fn project_numbers(payload: &Value, series: &str, field: &str) -> Vec<f64> {
    items_at(payload, series)
        .iter()
        .map(|item| item.get(field).and_then(value_to_f64).unwrap_or_default())
        .collect()
}

/// Project one label field out of every item of a series
#[must_use]
pub fn project_labels(payload: &Value, series: &str, field: &str) -> Vec<String> {
    items_at(payload, series)
        .iter()
        .map(|item| item.get(field).and_then(value_to_string).unwrap_or_default())
        .collect()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn clamp_count(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.round() as u64
    }
}

/// How series values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Grouped integer
    Count,
    /// Dollars
    Currency,
    /// Percentage
    Percent,
}

impl Unit {
    /// Format one value
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Count => format_number(clamp_count(value)),
            Self::Currency => format_currency(value),
            Self::Percent => format_percent(value),
        }
    }
}

/// One bar of a series table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRow {
    /// Category label
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Bar width as a CSS percentage, relative to the largest value
    pub width: String,
}

/// A chart stand-in: labelled rows with proportional bars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTable {
    /// Heading
    pub title: &'static str,
    /// Rows in payload order
    pub rows: Vec<SeriesRow>,
}

impl SeriesTable {
    /// Zip labels and values; extra entries on either side are dropped
    #[must_use]
    pub fn new(title: &'static str, labels: Vec<String>, values: &[f64], unit: Unit) -> Self {
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        let rows = labels
            .into_iter()
            .zip(values.iter().copied())
            .map(|(label, value)| {
                let share = if max > 0.0 { (value / max * 100.0).clamp(0.0, 100.0) } else { 0.0 };
                SeriesRow {
                    label,
                    value: unit.format(value),
                    width: format!("{share:.0}"),
                }
            })
            .collect();
        Self { title, rows }
    }

    /// Build from one series in a payload
    #[must_use]
    pub fn project(
        title: &'static str,
        payload: &Value,
        series: &str,
        label_field: &str,
        value_field: &str,
        unit: Unit,
    ) -> Self {
        Self::new(
            title,
            project_labels(payload, series, label_field),
            &project_numbers(payload, series, value_field),
            unit,
        )
    }

    /// No rows to draw
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A headline figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    /// Caption
    pub label: &'static str,
    /// Formatted figure
    pub value: String,
    /// Secondary line, may be empty
    pub hint: String,
}

impl Kpi {
    /// Figure without a hint
    #[must_use]
    pub const fn new(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            hint: String::new(),
        }
    }

    /// Attach a secondary line
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

/// A selectable option in a filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Submitted value
    pub value: &'static str,
    /// Display text
    pub label: &'static str,
    /// Currently selected
    pub selected: bool,
}

impl Choice {
    /// Build a list of options marking `current`
    #[must_use]
    pub fn list(options: &[(&'static str, &'static str)], current: &str) -> Vec<Self> {
        options
            .iter()
            .map(|&(value, label)| Self {
                value,
                label,
                selected: value == current,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "booking_trends": [
                {"date": "2024-03-01", "bookings": 12, "revenue": "840.5"},
                {"date": "2024-03-02", "bookings": 6},
                {"date": "2024-03-03"}
            ],
            "financial_summary": {"total_revenue": 15230.75, "completion_rate": "92.5"}
        })
    }

    #[test]
    fn test_project_numbers_keeps_series_length() {
        assert_eq!(
            project_numbers(&payload(), "booking_trends", "bookings"),
            vec![12.0, 6.0, 0.0]
        );
        assert_eq!(
            project_numbers(&payload(), "booking_trends", "revenue"),
            vec![840.5, 0.0, 0.0]
        );
    }

    #[test]
    fn test_absent_series_is_empty() {
        assert!(project_numbers(&Value::Null, "booking_trends", "bookings").is_empty());
        assert!(project_labels(&json!({"booking_trends": "oops"}), "booking_trends", "date").is_empty());
    }

    #[test]
    fn test_dotted_lookup() {
        let data = payload();
        assert_eq!(number_at(&data, "financial_summary.total_revenue"), 15230.75);
        assert_eq!(number_at(&data, "financial_summary.completion_rate"), 92.5);
        assert_eq!(number_at(&data, "financial_summary.missing"), 0.0);
        assert_eq!(count_at(&data, "financial_summary.total_revenue"), 15231);
        assert_eq!(text_at(&data, "booking_trends"), "");
    }

    #[test]
    fn test_series_table_scales_to_largest_value() {
        let table = SeriesTable::project(
            "Bookings",
            &payload(),
            "booking_trends",
            "date",
            "bookings",
            Unit::Count,
        );

        let widths: Vec<_> = table.rows.iter().map(|r| r.width.as_str()).collect();
        assert_eq!(widths, vec!["100", "50", "0"]);
        assert_eq!(table.rows.first().unwrap().label, "2024-03-01");
    }

    #[test]
    fn test_series_table_of_zeros_has_empty_bars() {
        let table = SeriesTable::new("Revenue", vec!["a".into()], &[0.0], Unit::Currency);
        assert_eq!(table.rows.first().unwrap().width, "0");
        assert_eq!(table.rows.first().unwrap().value, "$0.00");
    }

    #[test]
    fn test_with_query_appends() {
        assert_eq!(
            with_query("/admin/users", &[("notice", "User updated")]),
            "/admin/users?notice=User+updated"
        );
        assert_eq!(
            with_query("/admin/users?page=2", &[("error", "x&y")]),
            "/admin/users?page=2&error=x%26y"
        );
    }

    #[test]
    fn test_choice_marks_selection() {
        let choices = Choice::list(&[("all", "All"), ("active", "Active")], "active");
        assert!(!choices.first().unwrap().selected);
        assert!(choices.last().unwrap().selected);
    }

    proptest! {
        #[test]
        fn test_projection_never_panics(raw in ".{0,64}") {
            let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::Null);
            let _ = project_numbers(&value, "a.b", "c");
            let _ = project_labels(&value, "", "c");
            let _ = number_at(&value, "a.b.c");
        }
    }
}
