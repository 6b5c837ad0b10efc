//! Query parameter and request body types

use serde::Serialize;

/// Name of the page-size query parameter; the backend is not consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSizeKey {
    /// `per_page` (users, bookings, therapists, customers)
    PerPage,
    /// `page_size` (pending requests, conversations, coupons, messages)
    PageSize,
}

impl PageSizeKey {
    const fn as_str(self) -> &'static str {
        match self {
            Self::PerPage => "per_page",
            Self::PageSize => "page_size",
        }
    }
}

/// Paging, search and status inputs for list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Server-side search term
    pub search: Option<String>,
    /// Status filter; `all` and blank mean no filter
    pub status: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            search: None,
            status: None,
        }
    }
}

impl ListParams {
    /// Parameters for `page` with `page_size` rows
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
            ..Self::default()
        }
    }

    /// Attach a search term; blank terms are dropped
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then(|| term.trim().to_string());
        self
    }

    /// Attach a status filter; `all` and blank are dropped
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = (!status.trim().is_empty() && status != "all").then_some(status);
        self
    }

    /// Render as query pairs, naming the status parameter `status_key`
    #[must_use]
    pub fn to_query(&self, size_key: PageSizeKey, status_key: &'static str) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            (size_key.as_str(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            query.push((status_key, status.clone()));
        }
        query
    }
}

/// Reporting period for analytics and reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last seven days
    Week,
    /// Last thirty days
    #[default]
    Month,
    /// Last quarter
    Quarter,
    /// Last year
    Year,
}

impl Period {
    /// Every period, in selector order
    pub const ALL: [Self; 4] = [Self::Week, Self::Month, Self::Quarter, Self::Year];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Selector label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::Quarter => "This Quarter",
            Self::Year => "This Year",
        }
    }

    /// Parse a query value, falling back to the default month
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| Some(p.as_str()) == raw.map(str::trim))
            .unwrap_or_default()
    }
}

/// Advanced analytics lens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Headline figures
    #[default]
    Overview,
    /// Retention by signup cohort
    Cohort,
    /// Seasonality
    Seasonal,
    /// Demand by area
    Geographic,
    /// Forecasts
    Predictive,
}

impl Metric {
    /// Every metric, in selector order
    pub const ALL: [Self; 5] = [
        Self::Overview,
        Self::Cohort,
        Self::Seasonal,
        Self::Geographic,
        Self::Predictive,
    ];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Cohort => "cohort",
            Self::Seasonal => "seasonal",
            Self::Geographic => "geographic",
            Self::Predictive => "predictive",
        }
    }

    /// Selector label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Cohort => "Cohort Analysis",
            Self::Seasonal => "Seasonal Trends",
            Self::Geographic => "Geographic",
            Self::Predictive => "Predictive",
        }
    }

    /// Parse a query value, falling back to overview
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| Some(m.as_str()) == raw.map(str::trim))
            .unwrap_or_default()
    }
}

/// Data set offered by the export endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Booking history
    Bookings,
    /// User profiles and account information
    Users,
    /// Revenue ledger
    Revenue,
}

impl ExportKind {
    /// Every export kind, in form order
    pub const ALL: [Self; 3] = [Self::Bookings, Self::Users, Self::Revenue];

    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bookings => "bookings",
            Self::Users => "users",
            Self::Revenue => "revenue",
        }
    }

    /// Form label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bookings => "Bookings Data",
            Self::Users => "Users Data",
            Self::Revenue => "Revenue Data",
        }
    }

    /// Form description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Bookings => "Export booking history and details",
            Self::Users => "Export user profiles and account information",
            Self::Revenue => "Export financial transactions and revenue",
        }
    }

    /// Parse a form value
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw.trim())
    }
}

/// Export request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportParams {
    /// Data set
    #[serde(rename = "type")]
    pub kind: ExportKind,
    /// Inclusive start date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

/// Body of the user, booking and therapist action endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest<'a> {
    /// Action name, e.g. `approve` or `deactivate`
    pub action: &'a str,
    /// Optional justification recorded by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

/// Body of the notification send endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    /// Push title
    pub title: String,
    /// Push body
    pub message: String,
    /// `all`, `customers` or `therapists`
    pub user_type: String,
}

/// Writable coupon fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponPayload {
    /// Redeemable code
    pub code: String,
    /// Display name
    pub name: String,
    /// Description shown to customers
    pub description: String,
    /// `percentage` or `fixed`
    pub discount_type: String,
    /// Percent or amount
    pub discount_value: f64,
    /// Minimum order value
    pub minimum_order_amount: f64,
    /// Discount cap
    pub maximum_discount_amount: Option<f64>,
    /// Maximum redemptions
    pub usage_limit: Option<u64>,
    /// Start of validity window
    pub valid_from: Option<String>,
    /// End of validity window
    pub valid_until: Option<String>,
    /// Whether the coupon is redeemable
    pub is_active: bool,
}
