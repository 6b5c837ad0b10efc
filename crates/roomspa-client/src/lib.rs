//! Typed REST client for the `RoomSpa` admin backend
//!
//! Every endpoint answers with an [`Envelope`]; resource facades unwrap it into
//! domain records from [`roomspa_core::types`] or untyped JSON for analytics.
//!
//! ```no_run
//! # async fn demo() -> roomspa_core::Result<()> {
//! use roomspa_client::{ApiClient, ListParams};
//! use std::time::Duration;
//!
//! let client = ApiClient::new("http://localhost:8000/api/admin", Duration::from_secs(30))?
//!     .with_token("token");
//! let page = client.users().list(&ListParams::new(1, 20).search("ada")).await?;
//! println!("{} users", page.users.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod envelope;
pub mod params;
pub mod resources;

pub use client::{ApiClient, Download};
pub use envelope::Envelope;
pub use params::{
    ActionRequest, CouponPayload, ExportKind, ExportParams, ListParams, Metric, NotificationRequest,
    PageSizeKey, Period,
};
