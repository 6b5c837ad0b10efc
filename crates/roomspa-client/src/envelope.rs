//! The `{success, data, message}` wrapper every backend endpoint returns

use roomspa_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the backend considers the call successful
    pub success: bool,
    /// Payload, absent on failure and on some mutations
    pub data: Option<T>,
    /// Human readable status or failure message
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rejected`] when `success` is false and
    /// [`Error::MissingData`] when a successful envelope carries no payload.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(Error::rejected(self.message));
        }
        self.data.ok_or(Error::MissingData)
    }

    /// Acknowledge a mutation, returning the backend's message if any
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rejected`] when `success` is false.
    pub fn into_ack(self) -> Result<Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(Error::rejected(self.message))
        }
    }
}
