use super::facade;
use crate::client::Download;
use crate::params::{ExportParams, Metric, Period};
use roomspa_core::Result;
use serde_json::Value;

facade!(
    /// `analytics/` endpoints
    Analytics
);

facade!(
    /// `reports/` endpoints
    Reports
);

facade!(
    /// `export/` endpoint
    Export
);

impl Analytics<'_> {
    /// Booking trends, financial summary and status breakdown
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn bookings(&self, period: Period) -> Result<Value> {
        self.client
            .get("analytics/bookings/", &[("period", period.as_str())])
            .await?
            .into_data()
    }

    /// Therapist performance rankings
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn therapists(&self, period: Period) -> Result<Value> {
        self.client
            .get("analytics/therapists/", &[("period", period.as_str())])
            .await?
            .into_data()
    }

    /// One advanced analytics lens
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn advanced(&self, metric: Metric, period: Period) -> Result<Value> {
        self.client
            .get(
                "analytics/advanced/",
                &[("metric", metric.as_str()), ("period", period.as_str())],
            )
            .await?
            .into_data()
    }
}

impl Reports<'_> {
    /// Revenue, payouts and transactions for a period
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn financial(&self, period: Period) -> Result<Value> {
        self.client
            .get("reports/financial/", &[("period", period.as_str())])
            .await?
            .into_data()
    }
}

impl Export<'_> {
    /// Download a data set as a file
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the export.
    pub async fn data(&self, params: &ExportParams) -> Result<Download> {
        let fallback = format!(
            "{}_export_{}_{}.csv",
            params.kind.as_str(),
            params.date_from.as_deref().unwrap_or("all"),
            params.date_to.as_deref().unwrap_or("now"),
        );
        self.client.download("export/", params, &fallback).await
    }
}
