//! Application state management

use roomspa_client::ApiClient;
use roomspa_core::{Config, Result};
use std::sync::Arc;

use crate::session::SessionContext;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Anonymous backend client; handlers derive a per-session copy
    pub client: ApiClient,
}

/// State as stored in the router
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::from_config(&config.backend)?;
        Ok(Self { config, client })
    }

    /// Backend client carrying the session's bearer token
    #[must_use]
    pub fn client_for(&self, session: &SessionContext) -> ApiClient {
        self.client.with_token(session.token.as_str())
    }

    /// Rows per page on ordinary list pages
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.config.pages.page_size
    }
}
