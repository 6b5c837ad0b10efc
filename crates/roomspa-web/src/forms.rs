//! Submitted form records and their validation

use roomspa_client::{CouponPayload, ExportKind, ExportParams, NotificationRequest};
use roomspa_core::format::{from_datetime_local, to_datetime_local};
use roomspa_core::types::{Coupon, DiscountType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn positive_amount(raw: &str) -> Result<(), ValidationError> {
    match parse_amount(raw) {
        Some(v) if v > 0.0 => Ok(()),
        _ => Err(invalid("positive", "Discount value must be greater than zero")),
    }
}

fn optional_amount(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || parse_amount(raw).is_some_and(|v| v >= 0.0) {
        Ok(())
    } else {
        Err(invalid("amount", "Amounts must be zero or more"))
    }
}

fn optional_count(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || raw.trim().parse::<u64>().is_ok() {
        Ok(())
    } else {
        Err(invalid("count", "Usage limit must be a whole number"))
    }
}

fn audience(raw: &str) -> Result<(), ValidationError> {
    if matches!(raw, "all" | "customers" | "therapists") {
        Ok(())
    } else {
        Err(invalid("audience", "Choose who should receive the notification"))
    }
}

/// `POST /login`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    /// Email address
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Coupon create/edit form, one string per input
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
#[validate(schema(function = "percentage_within_bounds"))]
pub struct CouponForm {
    /// Redeemable code
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub code: String,
    /// Display name
    #[validate(length(min = 1, message = "Coupon name is required"))]
    pub name: String,
    /// Description
    pub description: String,
    /// `percentage` or `fixed`
    pub discount_type: String,
    /// Percent or amount
    #[validate(custom(function = "positive_amount"))]
    pub discount_value: String,
    /// Minimum order value
    #[validate(custom(function = "optional_amount"))]
    pub minimum_order_amount: String,
    /// Discount cap
    #[validate(custom(function = "optional_amount"))]
    pub maximum_discount_amount: String,
    /// Maximum redemptions
    #[validate(custom(function = "optional_count"))]
    pub usage_limit: String,
    /// `datetime-local` start
    pub valid_from: String,
    /// `datetime-local` end
    pub valid_until: String,
    /// Checkbox; present when ticked, so a missing key means unticked
    #[serde(default)]
    pub is_active: Option<String>,
}

fn percentage_within_bounds(form: &CouponForm) -> Result<(), ValidationError> {
    let is_percentage = form.discount_type != DiscountType::Fixed.as_str();
    if is_percentage && parse_amount(&form.discount_value).is_some_and(|v| v > 100.0) {
        return Err(invalid("percentage", "Percentage discounts cannot exceed 100"));
    }
    Ok(())
}

impl Default for CouponForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            discount_type: DiscountType::Percentage.as_str().to_string(),
            discount_value: String::new(),
            minimum_order_amount: "0".to_string(),
            maximum_discount_amount: String::new(),
            usage_limit: String::new(),
            valid_from: String::new(),
            valid_until: String::new(),
            is_active: Some("on".to_string()),
        }
    }
}

fn trim_float(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl CouponForm {
    /// Seed the form with an existing coupon
    #[must_use]
    pub fn from_coupon(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            name: coupon.name.clone(),
            description: coupon.description.clone(),
            discount_type: coupon.discount_type.as_str().to_string(),
            discount_value: trim_float(coupon.discount_value),
            minimum_order_amount: trim_float(coupon.minimum_order_amount),
            maximum_discount_amount: coupon
                .maximum_discount_amount
                .map(trim_float)
                .unwrap_or_default(),
            usage_limit: coupon.usage_limit.map(|l| l.to_string()).unwrap_or_default(),
            valid_from: to_datetime_local(coupon.valid_from.as_deref()),
            valid_until: to_datetime_local(coupon.valid_until.as_deref()),
            is_active: coupon.is_active.then(|| "on".to_string()),
        }
    }

    /// Whether the active checkbox is ticked
    #[must_use]
    pub fn active(&self) -> bool {
        self.is_active.is_some()
    }

    /// Whether the discount is a percentage
    #[must_use]
    pub fn is_percentage(&self) -> bool {
        self.discount_type != DiscountType::Fixed.as_str()
    }

    /// Validate and convert to the API payload
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn to_payload(&self) -> roomspa_core::Result<CouponPayload> {
        self.validate()?;
        let discount_type: DiscountType = self.discount_type.parse()?;

        Ok(CouponPayload {
            code: self.code.trim().to_uppercase(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            discount_type: discount_type.as_str().to_string(),
            discount_value: parse_amount(&self.discount_value).unwrap_or_default(),
            minimum_order_amount: parse_amount(&self.minimum_order_amount).unwrap_or_default(),
            maximum_discount_amount: parse_amount(&self.maximum_discount_amount),
            usage_limit: self.usage_limit.trim().parse().ok(),
            valid_from: from_datetime_local(&self.valid_from),
            valid_until: from_datetime_local(&self.valid_until),
            is_active: self.active(),
        })
    }
}

/// `POST /admin/notifications`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct NotificationForm {
    /// Push title
    #[validate(length(min = 1, max = 120, message = "Title is required"))]
    pub title: String,
    /// Push body
    #[validate(length(min = 1, max = 1000, message = "Message is required"))]
    pub message: String,
    /// Audience
    #[validate(custom(function = "audience"))]
    pub user_type: String,
}

impl Default for NotificationForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            user_type: "all".to_string(),
        }
    }
}

impl NotificationForm {
    /// Validate and convert to the API request
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn to_request(&self) -> roomspa_core::Result<NotificationRequest> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            message: self.message.trim().to_string(),
            user_type: self.user_type.trim().to_string(),
        };
        trimmed.validate()?;
        Ok(NotificationRequest {
            title: trimmed.title,
            message: trimmed.message,
            user_type: trimmed.user_type,
        })
    }
}

/// Row action buttons (`approve`, `deactivate`, ...)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionForm {
    /// Action name
    pub action: String,
    /// Optional justification
    pub reason: String,
    /// Page to return to
    pub back: String,
}

impl ActionForm {
    /// Reason, when one was typed
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        Some(self.reason.trim()).filter(|r| !r.is_empty())
    }

    /// Redirect target; only local admin paths are honoured
    #[must_use]
    pub fn back_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.back.starts_with("/admin") && !self.back.starts_with("//") {
            &self.back
        } else {
            fallback
        }
    }

    /// Whether `action` is one of `allowed`
    #[must_use]
    pub fn is_one_of(&self, allowed: &[&str]) -> bool {
        allowed.contains(&self.action.as_str())
    }
}

/// `POST /admin/reports/export`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportForm {
    /// `bookings`, `users` or `revenue`
    #[serde(rename = "type")]
    pub kind: String,
    /// `YYYY-MM-DD`
    pub date_from: String,
    /// `YYYY-MM-DD`
    pub date_to: String,
}

impl ExportForm {
    /// Validate and convert to the API parameters
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown data set or an inverted range.
    pub fn to_params(&self) -> roomspa_core::Result<ExportParams> {
        let kind = ExportKind::parse(&self.kind).ok_or_else(|| roomspa_core::Error::Validation {
            field: "type".to_string(),
            message: "Choose a data set to export".to_string(),
        })?;
        let date = |raw: &str| {
            let raw = raw.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        };
        let (date_from, date_to) = (date(&self.date_from), date(&self.date_to));

        if let (Some(from), Some(to)) = (&date_from, &date_to) {
            if from > to {
                return Err(roomspa_core::Error::Validation {
                    field: "date_to".to_string(),
                    message: "The end date must be on or after the start date".to_string(),
                });
            }
        }

        Ok(ExportParams {
            kind,
            date_from,
            date_to,
        })
    }
}

/// Settings form: flat `section.field` keys mapped onto the settings object
pub type SettingsForm = std::collections::BTreeMap<String, String>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roomspa_core::Error;

    fn coupon_form() -> CouponForm {
        CouponForm {
            code: " save10 ".to_string(),
            name: "Ten off".to_string(),
            discount_value: "10".to_string(),
            usage_limit: "100".to_string(),
            valid_from: "2024-06-01T09:30".to_string(),
            ..CouponForm::default()
        }
    }

    #[test]
    fn test_coupon_defaults() {
        let form = CouponForm::default();
        assert_eq!(form.discount_type, "percentage");
        assert_eq!(form.minimum_order_amount, "0");
        assert!(form.active());
    }

    #[test]
    fn test_coupon_payload_conversion() {
        let payload = coupon_form().to_payload().unwrap();

        assert_eq!(payload.code, "SAVE10");
        assert_eq!(payload.discount_value, 10.0);
        assert_eq!(payload.usage_limit, Some(100));
        assert_eq!(payload.maximum_discount_amount, None);
        assert_eq!(payload.valid_from.as_deref(), Some("2024-06-01T09:30:00"));
        assert_eq!(payload.valid_until, None);
        assert!(payload.is_active);
    }

    #[test]
    fn test_coupon_requires_code() {
        let form = CouponForm {
            code: String::new(),
            ..coupon_form()
        };
        match form.to_payload().unwrap_err() {
            Error::Validation { field, message } => {
                assert_eq!(field, "code");
                assert_eq!(message, "Coupon code is required");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_coupon_rejects_non_positive_discount() {
        let form = CouponForm {
            discount_value: "0".to_string(),
            ..coupon_form()
        };
        assert!(form.to_payload().is_err());
    }

    #[test]
    fn test_percentage_capped_at_hundred() {
        let form = CouponForm {
            discount_value: "150".to_string(),
            ..coupon_form()
        };
        assert!(form.to_payload().is_err());

        let form = CouponForm {
            discount_type: "fixed".to_string(),
            discount_value: "150".to_string(),
            ..coupon_form()
        };
        assert!(form.to_payload().is_ok());
    }

    #[test]
    fn test_edit_form_round_trips_coupon() {
        let coupon = Coupon {
            code: "SPRING".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 12.5,
            usage_limit: Some(50),
            valid_until: Some("2024-12-31T23:59:00Z".to_string()),
            is_active: false,
            ..Coupon::default()
        };
        let form = CouponForm::from_coupon(&coupon);

        assert_eq!(form.discount_value, "12.5");
        assert_eq!(form.usage_limit, "50");
        assert_eq!(form.valid_until, "2024-12-31T23:59");
        assert!(!form.active());
        assert!(!form.is_percentage());
    }

    #[test]
    fn test_unticked_checkbox_is_inactive() {
        let form: CouponForm =
            serde_urlencoded::from_str("code=A&name=B&discount_type=fixed&discount_value=5").unwrap();
        assert!(!form.active());
        assert_eq!(form.minimum_order_amount, "0");
    }

    #[test]
    fn test_notification_requires_title_and_message() {
        let form = NotificationForm {
            title: "   ".to_string(),
            message: "Hello".to_string(),
            user_type: "all".to_string(),
        };
        assert!(form.to_request().is_err());

        let form = NotificationForm {
            title: "Spa day".to_string(),
            message: "20% off today".to_string(),
            user_type: "customers".to_string(),
        };
        assert_eq!(form.to_request().unwrap().user_type, "customers");
    }

    #[test]
    fn test_notification_rejects_unknown_audience() {
        let form = NotificationForm {
            title: "Hi".to_string(),
            message: "There".to_string(),
            user_type: "admins".to_string(),
        };
        assert!(form.to_request().is_err());
    }

    #[test]
    fn test_action_back_only_allows_admin_paths() {
        let form = ActionForm {
            back: "https://evil.example".to_string(),
            ..ActionForm::default()
        };
        assert_eq!(form.back_or("/admin/users"), "/admin/users");

        let form = ActionForm {
            back: "/admin/users?page=2".to_string(),
            ..ActionForm::default()
        };
        assert_eq!(form.back_or("/admin/users"), "/admin/users?page=2");
    }

    #[test]
    fn test_export_form_validation() {
        let form = ExportForm {
            kind: "bookings".to_string(),
            date_from: "2024-02-01".to_string(),
            date_to: "2024-01-01".to_string(),
        };
        assert!(form.to_params().is_err());

        let form = ExportForm {
            kind: "revenue".to_string(),
            ..ExportForm::default()
        };
        let params = form.to_params().unwrap();
        assert_eq!(params.kind, ExportKind::Revenue);
        assert_eq!(params.date_from, None);

        let form = ExportForm::default();
        assert!(form.to_params().is_err());
    }

    #[test]
    fn test_login_form_validation() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
