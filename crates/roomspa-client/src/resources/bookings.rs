use super::facade;
use crate::params::{ActionRequest, ListParams, PageSizeKey};
use roomspa_core::Result;
use roomspa_core::types::{Booking, BookingListing, RequestListing};
use serde_json::Value;

facade!(
    /// `bookings/` endpoints
    Bookings
);

facade!(
    /// `pending-requests/` endpoints
    PendingRequests
);

impl Bookings<'_> {
    /// One page of bookings, optionally filtered by status
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<BookingListing> {
        self.client
            .get("bookings/", &params.to_query(PageSizeKey::PerPage, "status"))
            .await?
            .into_data()
    }

    /// A single booking
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the booking does not exist.
    pub async fn get(&self, id: &str) -> Result<Booking> {
        self.client
            .get(&format!("bookings/{id}/"), super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Apply an action such as `confirm`, `cancel` or `complete`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn action(&self, id: &str, action: &str, reason: Option<&str>) -> Result<Option<String>> {
        self.client
            .post::<Value, _>(&format!("bookings/{id}/action/"), &ActionRequest { action, reason })
            .await?
            .into_ack()
    }
}

impl PendingRequests<'_> {
    /// One page of booking requests
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<RequestListing> {
        self.client
            .get("pending-requests/", &params.to_query(PageSizeKey::PageSize, "status"))
            .await?
            .into_data()
    }

    /// Approve or reject a request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn action(&self, id: &str, action: &str) -> Result<Option<String>> {
        self.client
            .post::<Value, _>(
                &format!("pending-requests/{id}/action/"),
                &ActionRequest { action, reason: None },
            )
            .await?
            .into_ack()
    }
}
