use super::facade;
use crate::params::NotificationRequest;
use roomspa_core::Result;
use roomspa_core::types::TokenSummary;
use serde_json::Value;

facade!(
    /// `dashboard/` endpoint
    Dashboard
);

facade!(
    /// `monitoring/` and `system/health/` endpoints
    Monitoring
);

facade!(
    /// `notifications/` endpoints
    Notifications
);

facade!(
    /// `settings/` endpoints
    Settings
);

impl Dashboard<'_> {
    /// Headline KPIs and recent activity
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn overview(&self) -> Result<Value> {
        self.client
            .get("dashboard/", super::NO_QUERY)
            .await?
            .into_data()
    }
}

impl Monitoring<'_> {
    /// Live activity snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn live(&self) -> Result<Value> {
        self.client
            .get("monitoring/", super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Server, database and service health
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn system_health(&self) -> Result<Value> {
        self.client
            .get("system/health/", super::NO_QUERY)
            .await?
            .into_data()
    }
}

impl Notifications<'_> {
    /// Registered push-token counts per audience
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn tokens(&self) -> Result<Vec<TokenSummary>> {
        self.client
            .get("notifications/tokens/", super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Send a push notification to an audience
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn send(&self, request: &NotificationRequest) -> Result<Option<String>> {
        self.client
            .post::<Value, _>("notifications/send/", request)
            .await?
            .into_ack()
    }
}

impl Settings<'_> {
    /// Current platform settings
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn get(&self) -> Result<Value> {
        self.client
            .get("settings/", super::NO_QUERY)
            .await?
            .into_data()
    }

    /// Replace the platform settings
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn update(&self, settings: &Value) -> Result<Option<String>> {
        self.client
            .put::<Value, _>("settings/", settings)
            .await?
            .into_ack()
    }
}
