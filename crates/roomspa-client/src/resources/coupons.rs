use super::facade;
use crate::params::{CouponPayload, ListParams, PageSizeKey};
use roomspa_core::Result;
use roomspa_core::types::{Coupon, CouponListing, CouponStats};
use serde_json::Value;

facade!(
    /// `coupons/` endpoints
    Coupons
);

/// Map the `active`/`inactive` filter onto the backend's `is_active` flag
fn coupon_query(params: &ListParams) -> Vec<(&'static str, String)> {
    let mut query = params.to_query(PageSizeKey::PageSize, "is_active");
    for (key, value) in &mut query {
        if *key == "is_active" {
            *value = match value.as_str() {
                "active" | "true" => "true".to_string(),
                _ => "false".to_string(),
            };
        }
    }
    query
}

impl Coupons<'_> {
    /// One page of coupons; status `active`/`inactive` filters on `is_active`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<CouponListing> {
        self.client
            .get("coupons/", &coupon_query(params))
            .await?
            .into_data()
    }

    /// Aggregate coupon statistics
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn stats(&self) -> Result<CouponStats> {
        self.client
            .get("coupons/stats/", super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Create a coupon
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the payload.
    pub async fn create(&self, payload: &CouponPayload) -> Result<Option<Coupon>> {
        let envelope = self.client.post::<Coupon, _>("coupons/", payload).await?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(roomspa_core::Error::rejected(envelope.message))
        }
    }

    /// Replace a coupon's writable fields
    ///
    /// The admin API documents create, toggle and delete for coupons but no
    /// update route; this assumes the conventional `PUT coupons/{id}/` with
    /// the same body as create. Edits fail with the backend's message if the
    /// route is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the payload.
    pub async fn update(&self, id: &str, payload: &CouponPayload) -> Result<Option<String>> {
        self.client
            .put::<Value, _>(&format!("coupons/{id}/"), payload)
            .await?
            .into_ack()
    }

    /// Flip `is_active`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn toggle_status(&self, id: &str) -> Result<Option<String>> {
        self.client
            .post::<Value, _>(&format!("coupons/{id}/toggle-status/"), &serde_json::json!({}))
            .await?
            .into_ack()
    }

    /// Delete a coupon
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn delete(&self, id: &str) -> Result<Option<String>> {
        self.client
            .delete::<Value>(&format!("coupons/{id}/"))
            .await?
            .into_ack()
    }
}
