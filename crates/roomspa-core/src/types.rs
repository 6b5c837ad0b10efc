//! Domain records returned by the RoomSpa backend
//!
//! Every record is decoded defensively: fields are defaulted when missing and
//! scalars go through [`crate::lenient`] so a single odd value never fails a
//! whole page of results.

use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The signed-in administrator as returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminUser {
    /// Display name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Email address
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    /// Role, e.g. `admin`
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
}

/// Payload of a successful login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Bearer token for subsequent API calls
    #[serde(deserialize_with = "lenient::string", alias = "access", alias = "access_token")]
    pub token: String,
    /// The administrator the token belongs to
    pub user: AdminUser,
}

/// Pagination metadata attached to list payloads
///
/// Endpoints disagree on key names (`page` or `current_page`, `num_pages` or
/// `total_pages`, `total` or `count`). The first key present wins; `null` or
/// any non-object decodes as the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page, 1-based
    pub current_page: Option<u64>,
    /// Total number of pages
    pub total_pages: Option<u64>,
    /// Total number of records across all pages
    pub total_count: Option<u64>,
}

impl<'de> Deserialize<'de> for PaginationMeta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| map.get(*key).and_then(lenient::value_to_u64))
        };
        Ok(Self {
            current_page: first(&["current_page", "page"]),
            total_pages: first(&["total_pages", "num_pages"]),
            total_count: first(&["total_count", "total", "count"]),
        })
    }
}

impl PaginationMeta {
    /// Total pages, at least one
    #[must_use]
    pub fn pages(&self) -> u64 {
        self.total_pages.unwrap_or(1).max(1)
    }
}

/// Lifecycle status shared by bookings and pending booking requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BookingStatus {
    /// Awaiting a decision
    #[default]
    Pending,
    /// Approved by the admin or accepted by the therapist
    Accepted,
    /// Declined
    Rejected,
    /// Cancelled by either party
    Cancelled,
    /// Service delivered
    Completed,
    /// Any status outside the known vocabulary
    Other(String),
}

impl BookingStatus {
    /// Wire value for the status
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Other(other) => other,
        }
    }

    /// Human readable label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Pending => "Pending".to_string(),
            Self::Accepted => "Accepted".to_string(),
            Self::Rejected => "Rejected".to_string(),
            Self::Cancelled => "Cancelled".to_string(),
            Self::Completed => "Completed".to_string(),
            Self::Other(other) => {
                let mut chars = other.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            }
        }
    }

    /// Status an admin action moves a request to
    #[must_use]
    pub fn after_action(action: &str) -> Option<Self> {
        match action {
            "approve" | "accept" | "confirm" => Some(Self::Accepted),
            "reject" | "decline" => Some(Self::Rejected),
            "cancel" => Some(Self::Cancelled),
            "complete" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl FromStr for BookingStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "" => Self::Pending,
            "accepted" | "approved" | "confirmed" => Self::Accepted,
            "rejected" | "declined" => Self::Rejected,
            "cancelled" | "canceled" => Self::Cancelled,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient::string(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

impl Serialize for BookingStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One service line on a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    /// Service name, e.g. "Swedish Massage"
    #[serde(deserialize_with = "lenient::string", alias = "service", alias = "title")]
    pub name: String,
    /// Price charged for the service
    #[serde(deserialize_with = "lenient::opt_number")]
    pub price: Option<f64>,
}

/// Services attached to a booking
///
/// Accepts a list of names, a list of `{name, price}` objects, a
/// `{name: price}` map, or a single plain label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Services(pub Vec<ServiceItem>);

impl Services {
    /// Comma separated service names, or "—" when empty
    #[must_use]
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return "—".to_string();
        }
        self.0
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether no service is attached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Services {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(_) => serde_json::from_value::<ServiceItem>(entry).ok(),
                    other => lenient::value_to_string(&other).map(|name| ServiceItem {
                        name,
                        price: None,
                    }),
                })
                .collect(),
            Value::Object(map) => map
                .into_iter()
                .map(|(name, price)| ServiceItem {
                    name,
                    price: lenient::value_to_f64(&price),
                })
                .collect(),
            Value::String(label) if !label.trim().is_empty() => vec![ServiceItem {
                name: label.trim().to_string(),
                price: None,
            }],
            _ => Vec::new(),
        };
        Ok(Self(items.into_iter().filter(|s| !s.name.is_empty()).collect()))
    }
}

/// Where a booking takes place
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    /// Street address or free-form description
    pub address: String,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Distance from the therapist in kilometres
    pub distance_km: Option<f64>,
}

impl Location {
    /// Short display form
    #[must_use]
    pub fn summary(&self) -> String {
        match (&self.address, self.latitude, self.longitude) {
            (address, _, _) if !address.is_empty() => address.clone(),
            (_, Some(lat), Some(lng)) => format!("{lat:.4}, {lng:.4}"),
            _ => "—".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(address) => Self {
                address,
                ..Self::default()
            },
            Value::Object(map) => {
                let field = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k));
                Self {
                    address: field(&["address", "name", "label"])
                        .and_then(lenient::value_to_string)
                        .unwrap_or_default(),
                    latitude: field(&["lat", "latitude"]).and_then(lenient::value_to_f64),
                    longitude: field(&["lng", "lon", "longitude"]).and_then(lenient::value_to_f64),
                    distance_km: field(&["distance", "distance_km"])
                        .and_then(lenient::value_to_f64),
                }
            }
            _ => Self::default(),
        })
    }
}

/// A platform user as listed on the users page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Full name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Email address
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    /// Phone number
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    /// `customer`, `therapist` or `admin`
    #[serde(deserialize_with = "lenient::string", alias = "user_type")]
    pub role: String,
    /// Email/phone verification flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_verified: bool,
    /// Account enabled flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Number of bookings made or served
    #[serde(deserialize_with = "lenient::count", alias = "total_bookings")]
    pub booking_count: u64,
    /// Lifetime spend
    #[serde(deserialize_with = "lenient::number")]
    pub total_spent: f64,
    /// Last activity timestamp
    #[serde(deserialize_with = "lenient::opt_string", alias = "last_login")]
    pub last_activity: Option<String>,
    /// Registration timestamp
    #[serde(deserialize_with = "lenient::opt_string", alias = "date_joined")]
    pub created_at: Option<String>,
}

/// A customer as listed on the customers page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRecord {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Full name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Email address
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    /// Phone number
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    /// Account enabled flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Verification flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_verified: bool,
    /// Number of bookings
    #[serde(deserialize_with = "lenient::count", alias = "total_bookings")]
    pub booking_count: u64,
    /// Lifetime spend
    #[serde(deserialize_with = "lenient::number")]
    pub total_spent: f64,
    /// Most recent booking timestamp
    #[serde(deserialize_with = "lenient::opt_string")]
    pub last_booking: Option<String>,
    /// Registration timestamp
    #[serde(deserialize_with = "lenient::opt_string", alias = "date_joined")]
    pub created_at: Option<String>,
}

/// A therapist as listed on the therapists page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TherapistRecord {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Full name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Email address
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    /// Phone number
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    /// Account enabled flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Verification flag
    #[serde(deserialize_with = "lenient::flag")]
    pub is_verified: bool,
    /// Currently accepting bookings
    #[serde(deserialize_with = "lenient::flag")]
    pub is_available: bool,
    /// Average rating, 0–5
    #[serde(deserialize_with = "lenient::number", alias = "average_rating")]
    pub rating: f64,
    /// Number of reviews behind the rating
    #[serde(deserialize_with = "lenient::count")]
    pub review_count: u64,
    /// Massage specialties
    #[serde(deserialize_with = "lenient::string_list")]
    pub specialties: Vec<String>,
    /// Bookings served
    #[serde(deserialize_with = "lenient::count", alias = "total_bookings")]
    pub booking_count: u64,
}

/// A confirmed or historical booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Booking {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Customer identifier
    #[serde(deserialize_with = "lenient::string")]
    pub customer_id: String,
    /// Customer name
    #[serde(deserialize_with = "lenient::string")]
    pub customer_name: String,
    /// Therapist identifier
    #[serde(deserialize_with = "lenient::string")]
    pub therapist_id: String,
    /// Therapist name
    #[serde(deserialize_with = "lenient::string")]
    pub therapist_name: String,
    /// Booked services
    #[serde(alias = "service")]
    pub services: Services,
    /// Start of the booked timeslot
    #[serde(deserialize_with = "lenient::opt_string", alias = "start_time")]
    pub timeslot_from: Option<String>,
    /// End of the booked timeslot
    #[serde(deserialize_with = "lenient::opt_string", alias = "end_time")]
    pub timeslot_to: Option<String>,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Where the session takes place
    pub location: Location,
    /// Amount charged
    #[serde(deserialize_with = "lenient::number", alias = "total_price", alias = "amount")]
    pub total_amount: f64,
    /// Creation timestamp
    #[serde(deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

/// A booking request awaiting an admin decision
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingRequest {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Customer name
    #[serde(deserialize_with = "lenient::string")]
    pub customer_name: String,
    /// Preferred therapist, or "Any available"
    #[serde(deserialize_with = "lenient::string", alias = "therapist_name")]
    pub therapist_preference: String,
    /// Requested services
    #[serde(alias = "service")]
    pub services: Services,
    /// Requested date
    #[serde(deserialize_with = "lenient::opt_string", alias = "timeslot_from")]
    pub requested_date: Option<String>,
    /// Requested start time
    #[serde(deserialize_with = "lenient::opt_string")]
    pub requested_time: Option<String>,
    /// Duration in minutes
    #[serde(deserialize_with = "lenient::opt_count")]
    pub duration: Option<u64>,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Where the session would take place
    pub location: Location,
    /// Free-form customer notes
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
    /// Creation timestamp
    #[serde(deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

/// Coupon discount kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the order
    #[default]
    Percentage,
    /// Fixed amount off the order
    Fixed,
}

impl DiscountType {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl FromStr for DiscountType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" => Ok(Self::Percentage),
            "fixed" | "amount" => Ok(Self::Fixed),
            other => Err(crate::Error::Validation {
                field: "discount_type".to_string(),
                message: format!("Unknown discount type '{other}'"),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for DiscountType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::string(deserializer)?.parse().unwrap_or_default())
    }
}

/// A discount coupon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coupon {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Redeemable code
    #[serde(deserialize_with = "lenient::string")]
    pub code: String,
    /// Display name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Description shown to customers
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    /// Percentage or fixed amount
    pub discount_type: DiscountType,
    /// Percent or currency amount depending on `discount_type`
    #[serde(deserialize_with = "lenient::number")]
    pub discount_value: f64,
    /// Minimum order value for the coupon to apply
    #[serde(deserialize_with = "lenient::number")]
    pub minimum_order_amount: f64,
    /// Cap on the discount for percentage coupons
    #[serde(deserialize_with = "lenient::opt_number")]
    pub maximum_discount_amount: Option<f64>,
    /// Maximum number of redemptions
    #[serde(deserialize_with = "lenient::opt_count")]
    pub usage_limit: Option<u64>,
    /// Redemptions so far
    #[serde(deserialize_with = "lenient::count")]
    pub used_count: u64,
    /// Whether the coupon can currently be redeemed
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Start of validity window
    #[serde(deserialize_with = "lenient::opt_string")]
    pub valid_from: Option<String>,
    /// End of validity window
    #[serde(deserialize_with = "lenient::opt_string")]
    pub valid_until: Option<String>,
}

impl Coupon {
    /// Share of the usage limit consumed, 0–100; zero when there is no limit
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_percent(&self) -> f64 {
        match self.usage_limit {
            Some(limit) if limit > 0 => {
                ((self.used_count as f64 / limit as f64) * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// "Active" or "Inactive"
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

/// Aggregate coupon statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponStats {
    /// All coupons
    #[serde(deserialize_with = "lenient::count")]
    pub total_coupons: u64,
    /// Currently active coupons
    #[serde(deserialize_with = "lenient::count")]
    pub active_coupons: u64,
    /// Deactivated coupons
    #[serde(deserialize_with = "lenient::count")]
    pub inactive_coupons: u64,
    /// Redemptions across all coupons
    #[serde(deserialize_with = "lenient::count", alias = "total_usages")]
    pub total_usage: u64,
    /// Money given away through coupons
    #[serde(deserialize_with = "lenient::number", alias = "total_discount")]
    pub total_discount_given: f64,
}

/// A conversation participant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

/// A customer–therapist chat thread
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Customer side of the thread
    pub customer: Option<Participant>,
    /// Therapist side of the thread
    pub therapist: Option<Participant>,
    /// Preview of the latest message
    #[serde(deserialize_with = "lenient::string")]
    pub last_message: String,
    /// Total messages in the thread
    #[serde(deserialize_with = "lenient::count")]
    pub message_count: u64,
    /// Messages not yet read by the recipient
    #[serde(deserialize_with = "lenient::count")]
    pub unread_count: u64,
    /// `active` or `closed`
    #[serde(deserialize_with = "lenient::string")]
    pub status: String,
    /// Timestamp of the latest message
    #[serde(deserialize_with = "lenient::opt_string")]
    pub last_message_time: Option<String>,
}

impl Conversation {
    /// Whether the thread is open
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// Customer name or a placeholder
    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customer.as_ref().map_or("Unknown customer", |p| p.name.as_str())
    }

    /// Therapist name or a placeholder
    #[must_use]
    pub fn therapist_name(&self) -> &str {
        self.therapist.as_ref().map_or("Unknown therapist", |p| p.name.as_str())
    }
}

/// A single chat message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Sender display name
    #[serde(deserialize_with = "lenient::string")]
    pub sender_name: String,
    /// `customer` or `therapist`
    #[serde(deserialize_with = "lenient::string")]
    pub sender_type: String,
    /// Message body
    #[serde(deserialize_with = "lenient::string", alias = "message", alias = "text")]
    pub content: String,
    /// Sent timestamp
    #[serde(deserialize_with = "lenient::opt_string", alias = "created_at")]
    pub timestamp: Option<String>,
    /// Read receipt
    #[serde(deserialize_with = "lenient::flag")]
    pub is_read: bool,
}

/// Registered push-token count for one audience
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSummary {
    /// `all`, `customers` or `therapists`
    #[serde(deserialize_with = "lenient::string")]
    pub user_type: String,
    /// Devices reachable in that audience
    #[serde(deserialize_with = "lenient::count")]
    pub count: u64,
}

macro_rules! listing {
    ($(#[$doc:meta])* $name:ident, $item:ty, $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Records on the requested page; rows that fail to decode are skipped
            #[serde(deserialize_with = "lenient::rows")]
            pub $field: Vec<$item>,
            /// Pagination metadata
            pub pagination: PaginationMeta,
        }
    };
}

listing!(
    /// `GET users/` payload
    UserListing, UserRecord, users
);
listing!(
    /// `GET customers/` payload
    CustomerListing, CustomerRecord, customers
);
listing!(
    /// `GET therapists/` payload
    TherapistListing, TherapistRecord, therapists
);
listing!(
    /// `GET bookings/` payload
    BookingListing, Booking, bookings
);
listing!(
    /// `GET pending-requests/` payload
    RequestListing, PendingRequest, requests
);
listing!(
    /// `GET coupons/` payload
    CouponListing, Coupon, coupons
);
listing!(
    /// `GET conversations/` payload
    ConversationListing, Conversation, conversations
);
listing!(
    /// `GET conversations/{id}/messages/` payload
    MessageListing, Message, messages
);
