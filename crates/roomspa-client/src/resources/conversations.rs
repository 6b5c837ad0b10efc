use super::facade;
use crate::params::{ListParams, PageSizeKey};
use roomspa_core::Result;
use roomspa_core::types::{ConversationListing, MessageListing};

facade!(
    /// `conversations/` endpoints
    Conversations
);

impl Conversations<'_> {
    /// One page of conversations
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn list(&self, params: &ListParams) -> Result<ConversationListing> {
        self.client
            .get("conversations/", &params.to_query(PageSizeKey::PageSize, "status"))
            .await?
            .into_data()
    }

    /// One page of messages in a conversation
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn messages(&self, id: &str, params: &ListParams) -> Result<MessageListing> {
        self.client
            .get(
                &format!("conversations/{id}/messages/"),
                &params.to_query(PageSizeKey::PageSize, "status"),
            )
            .await?
            .into_data()
    }
}
