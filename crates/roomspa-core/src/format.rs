//! Display formatting shared by dashboard pages

use crate::types::{Coupon, DiscountType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Group the integer digits of `digits` with commas
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a count with thousands separators, e.g. `12,480`
#[must_use]
pub fn format_number(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format an amount as US dollars, e.g. `$1,234.50`
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Format a percentage, dropping a trailing `.0`, e.g. `40%` or `12.5%`
#[must_use]
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{rounded:.0}%")
    } else {
        format!("{rounded:.1}%")
    }
}

/// Parse the timestamp shapes the backend emits
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a backend timestamp for tables, e.g. `Mar 15, 2024 14:25`
///
/// Unparseable input is shown as-is; absent input as `—`.
#[must_use]
pub fn format_datetime(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "—".to_string(),
        Some(text) => parse_timestamp(text)
            .map_or_else(|| text.to_string(), |dt| dt.format("%b %d, %Y %H:%M").to_string()),
    }
}

/// Format a backend timestamp as a date only, e.g. `Mar 15, 2024`
#[must_use]
pub fn format_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "—".to_string(),
        Some(text) => parse_timestamp(text)
            .map_or_else(|| text.to_string(), |dt| dt.format("%b %d, %Y").to_string()),
    }
}

/// Convert a backend timestamp to the value of an `<input type="datetime-local">`
#[must_use]
pub fn to_datetime_local(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

/// Convert a submitted `datetime-local` value to an ISO-8601 timestamp
///
/// Blank input yields `None`; anything unparseable is passed through untouched
/// so the backend can report it.
#[must_use]
pub fn from_datetime_local(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        parse_timestamp(raw)
            .map_or_else(|| raw.to_string(), |dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
    )
}

/// Describe a coupon's discount, e.g. `15% off` or `$10.00 off`
#[must_use]
pub fn discount_label(coupon: &Coupon) -> String {
    match coupon.discount_type {
        DiscountType::Percentage => {
            let mut label = format!("{} off", format_percent(coupon.discount_value));
            if let Some(cap) = coupon.maximum_discount_amount.filter(|cap| *cap > 0.0) {
                label.push_str(&format!(" (max {})", format_currency(cap)));
            }
            label
        }
        DiscountType::Fixed => format!("{} off", format_currency(coupon.discount_value)),
    }
}

/// Render a 0–5 rating, e.g. `4.8`
#[must_use]
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() && rating > 0.0 {
        format!("{:.1}", rating.min(5.0))
    } else {
        "—".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(9.5, "$9.50")]
    #[case(1234.5, "$1,234.50")]
    #[case(1_234_567.891, "$1,234,567.89")]
    #[case(-42.0, "-$42.00")]
    #[case(f64::NAN, "$0.00")]
    fn test_format_currency(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(12_480, "12,480")]
    #[case(1_000_000, "1,000,000")]
    fn test_format_number(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(40.0), "40%");
        assert_eq!(format_percent(12.54), "12.5%");
        assert_eq!(format_percent(f64::INFINITY), "0%");
    }

    #[test]
    fn test_format_datetime_shapes() {
        assert_eq!(
            format_datetime(Some("2024-03-15T14:25:30Z")),
            "Mar 15, 2024 14:25"
        );
        assert_eq!(
            format_datetime(Some("2024-03-15T14:25:30.123456")),
            "Mar 15, 2024 14:25"
        );
        assert_eq!(format_datetime(Some("2024-03-15")), "Mar 15, 2024 00:00");
        assert_eq!(format_datetime(Some("yesterday")), "yesterday");
        assert_eq!(format_datetime(None), "—");
        assert_eq!(format_datetime(Some("  ")), "—");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-12-31T23:59:59+00:00")), "Dec 31, 2024");
    }

    #[test]
    fn test_datetime_local_conversions() {
        assert_eq!(
            to_datetime_local(Some("2024-06-01T09:30:00Z")),
            "2024-06-01T09:30"
        );
        assert_eq!(to_datetime_local(None), "");
        assert_eq!(
            from_datetime_local("2024-06-01T09:30").as_deref(),
            Some("2024-06-01T09:30:00")
        );
        assert_eq!(from_datetime_local(""), None);
    }

    #[test]
    fn test_discount_label() {
        let coupon = Coupon {
            discount_type: DiscountType::Percentage,
            discount_value: 15.0,
            maximum_discount_amount: Some(50.0),
            ..Coupon::default()
        };
        assert_eq!(discount_label(&coupon), "15% off (max $50.00)");

        let coupon = Coupon {
            discount_type: DiscountType::Fixed,
            discount_value: 10.0,
            ..Coupon::default()
        };
        assert_eq!(discount_label(&coupon), "$10.00 off");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4.84), "4.8");
        assert_eq!(format_rating(0.0), "—");
    }

    proptest! {
        #[test]
        fn test_grouped_number_strips_back_to_original(value in any::<u64>()) {
            let formatted = format_number(value);
            prop_assert_eq!(formatted.replace(',', ""), value.to_string());
        }

        #[test]
        fn test_currency_always_has_two_decimals(amount in -1.0e9f64..1.0e9f64) {
            let formatted = format_currency(amount);
            let (_, cents) = formatted.rsplit_once('.').unwrap();
            prop_assert_eq!(cents.len(), 2);
        }
    }
}
