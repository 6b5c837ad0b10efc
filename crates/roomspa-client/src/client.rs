//! HTTP client for communicating with the `RoomSpa` admin API

use crate::envelope::Envelope;
use crate::resources::{
    Analytics, Auth, Bookings, Conversations, Coupons, Customers, Dashboard, Export, Monitoring,
    Notifications, PendingRequests, Reports, Settings, Therapists, Users,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use roomspa_core::config::BackendConfig;
use roomspa_core::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// API client for the versioned admin REST backend
///
/// Cloning is cheap; the underlying connection pool is shared. A client
/// scoped to one admin session is derived with [`ApiClient::with_token`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

/// A file returned by the export endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Raw file contents
    pub bytes: Vec<u8>,
    /// MIME type reported by the backend
    pub content_type: String,
    /// Suggested file name
    pub filename: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("roomspa-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a client from the backend configuration section
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// A copy of this client that authenticates with `token`
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// Versioned API root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a resource path such as `users/12/`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query), path)
            .await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body), path)
            .await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body), path)
            .await
    }

    pub(crate) async fn delete<T>(&self, path: &str) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        self.send(self.request(Method::DELETE, path), path).await
    }

    /// Issue a request and decode the envelope
    ///
    /// A non-2xx response whose body is still an envelope is returned as that
    /// envelope so the caller sees the backend's message.
    async fn send<T>(&self, request: RequestBuilder, path: &str) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Backend request failed");
            Error::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response from {path}: {e}")))?;

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) => {
                if !envelope.success {
                    tracing::debug!(path, %status, message = ?envelope.message, "Backend rejected request");
                }
                Ok(envelope)
            }
            Err(e) if status.is_success() => {
                tracing::warn!(path, error = %e, "Undecodable backend response");
                Err(Error::Decode(format!("{path}: {e}")))
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }

    /// Fetch a file download
    pub(crate) async fn download<Q>(&self, path: &str, query: &Q, fallback_name: &str) -> Result<Download>
    where
        Q: Serialize + ?Sized,
    {
        let response = self
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read download from {path}: {e}")))?;

        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/csv")
            .to_string();

        if !status.is_success() {
            return match serde_json::from_slice::<Envelope<Value>>(&body) {
                Ok(envelope) => Err(Error::rejected(envelope.message)),
                Err(_) => Err(status_error(status, &body)),
            };
        }

        // A JSON envelope in place of a file means the export was refused
        if content_type.starts_with("application/json") {
            if let Ok(envelope) = serde_json::from_slice::<Envelope<Value>>(&body) {
                if !envelope.success {
                    return Err(Error::rejected(envelope.message));
                }
            }
        }

        let filename = headers
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| fallback_name.to_string());

        Ok(Download {
            bytes: body.to_vec(),
            content_type,
            filename,
        })
    }

    /// Authentication endpoints
    #[must_use]
    pub const fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// Dashboard overview
    #[must_use]
    pub const fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(self)
    }

    /// User management
    #[must_use]
    pub const fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Booking management
    #[must_use]
    pub const fn bookings(&self) -> Bookings<'_> {
        Bookings::new(self)
    }

    /// Therapist management
    #[must_use]
    pub const fn therapists(&self) -> Therapists<'_> {
        Therapists::new(self)
    }

    /// Customer listing
    #[must_use]
    pub const fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Pending booking requests
    #[must_use]
    pub const fn pending_requests(&self) -> PendingRequests<'_> {
        PendingRequests::new(self)
    }

    /// Customer–therapist conversations
    #[must_use]
    pub const fn conversations(&self) -> Conversations<'_> {
        Conversations::new(self)
    }

    /// Coupon management
    #[must_use]
    pub const fn coupons(&self) -> Coupons<'_> {
        Coupons::new(self)
    }

    /// Analytics payloads
    #[must_use]
    pub const fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self)
    }

    /// Financial reports
    #[must_use]
    pub const fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    /// Data export
    #[must_use]
    pub const fn export(&self) -> Export<'_> {
        Export::new(self)
    }

    /// Live monitoring and system health
    #[must_use]
    pub const fn monitoring(&self) -> Monitoring<'_> {
        Monitoring::new(self)
    }

    /// Push notifications
    #[must_use]
    pub const fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    /// Platform settings
    #[must_use]
    pub const fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> Error {
    let detail = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        ["detail", "message", "error"]
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str).map(ToString::to_string))
    });

    Error::Status {
        status: status.as_u16(),
        message: detail
            .or_else(|| status.canonical_reason().map(ToString::to_string))
            .unwrap_or_else(|| "Unknown status".to_string()),
    }
}

fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    })
}
