use super::facade;
use roomspa_core::Result;
use roomspa_core::types::Session;
use serde::Serialize;
use serde_json::Value;

facade!(
    /// `auth/` endpoints
    Auth
);

#[derive(Serialize)]
struct Credentials<'c> {
    email: &'c str,
    password: &'c str,
}

impl Auth<'_> {
    /// Exchange credentials for a session token
    ///
    /// # Errors
    ///
    /// Returns [`roomspa_core::Error::Rejected`] for bad credentials, or a
    /// transport/decode error. A session without a token is treated as missing data.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let session: Session = self
            .client
            .post("auth/login/", &Credentials { email, password })
            .await?
            .into_data()?;

        if session.token.trim().is_empty() {
            return Err(roomspa_core::Error::MissingData);
        }
        Ok(session)
    }

    /// Invalidate the current token
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or rejects the call.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .post::<Value, _>("auth/logout/", &serde_json::json!({}))
            .await?
            .into_ack()
            .map(|_| ())
    }
}
