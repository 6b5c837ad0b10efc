use super::facade;
use crate::params::{ActionRequest, ListParams, PageSizeKey};
use roomspa_core::Result;
use roomspa_core::types::{CustomerListing, TherapistListing, UserListing, UserRecord};
use serde_json::Value;

facade!(
    /// `users/` endpoints
    Users
);

facade!(
    /// `therapists/` endpoints
    Therapists
);

facade!(
    /// `customers/` endpoints
    Customers
);

impl Users<'_> {
    /// One page of users
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<UserListing> {
        self.client
            .get("users/", &params.to_query(PageSizeKey::PerPage, "status"))
            .await?
            .into_data()
    }

    /// A single user
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    pub async fn get(&self, id: &str) -> Result<UserRecord> {
        self.client
            .get(&format!("users/{id}/"), super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Apply an account action such as `activate`, `deactivate` or `verify`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn action(&self, id: &str, action: &str, reason: Option<&str>) -> Result<Option<String>> {
        self.client
            .post::<Value, _>(&format!("users/{id}/action/"), &ActionRequest { action, reason })
            .await?
            .into_ack()
    }
}

impl Therapists<'_> {
    /// One page of therapists
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<TherapistListing> {
        self.client
            .get("therapists/", &params.to_query(PageSizeKey::PerPage, "status"))
            .await?
            .into_data()
    }

    /// Apply an action such as `verify` or `suspend`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn action(&self, id: &str, action: &str) -> Result<Option<String>> {
        self.client
            .post::<Value, _>(
                &format!("therapists/{id}/action/"),
                &ActionRequest { action, reason: None },
            )
            .await?
            .into_ack()
    }
}

impl Customers<'_> {
    /// One page of customers
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<CustomerListing> {
        self.client
            .get("customers/", &params.to_query(PageSizeKey::PerPage, "status"))
            .await?
            .into_data()
    }
}
