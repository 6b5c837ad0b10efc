//! Customer/therapist conversations and their messages

use askama::Template;
use axum::{
    Extension,
    extract::{Path, Query, State},
    response::Response,
};
use roomspa_client::ListParams;
use roomspa_core::format::{format_datetime, format_number};
use roomspa_core::types::{Conversation, Message};

use super::{Choice, Kpi};
use crate::list::{self, ListQuery, ListView, Projection};
use crate::render;
use crate::session::SessionContext;
use crate::shell::Shell;
use crate::state::SharedState;

const PATH: &str = "/admin/conversations";

const STATUSES: [(&str, &str); 3] = [("all", "All"), ("active", "Active"), ("closed", "Closed")];

/// A conversation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    /// Backend id
    pub id: String,
    /// Customer name
    pub customer: String,
    /// Therapist name
    pub therapist: String,
    /// Preview of the latest message
    pub last_message: String,
    /// Total messages
    pub messages: String,
    /// Unread messages
    pub unread: u64,
    /// Open conversation
    pub active: bool,
    /// Status label
    pub status_label: String,
    /// Time of the latest message
    pub last_time: String,
}

impl From<Conversation> for ConversationRow {
    fn from(conversation: Conversation) -> Self {
        let active = conversation.is_active();
        Self {
            customer: conversation.customer_name().to_string(),
            therapist: conversation.therapist_name().to_string(),
            last_message: if conversation.last_message.trim().is_empty() {
                "No messages yet".to_string()
            } else {
                conversation.last_message.clone()
            },
            messages: format_number(conversation.message_count),
            unread: conversation.unread_count,
            active,
            status_label: if active { "Active" } else { "Closed" }.to_string(),
            last_time: format_datetime(conversation.last_message_time.as_deref()),
            id: conversation.id,
        }
    }
}

const FIELDS: [Projection<Conversation>; 3] = [
    |c| c.customer_name().to_string(),
    |c| c.therapist_name().to_string(),
    |c| c.last_message.clone(),
];

/// Summary tiles over the conversations on the loaded page
///
/// These cover one page of results only; totals across all pages would need a
/// backend aggregate.
#[must_use]
pub fn summary(conversations: &[Conversation]) -> Vec<Kpi> {
    let active = conversations.iter().filter(|c| c.is_active()).count();
    let unread: u64 = conversations.iter().map(|c| c.unread_count).sum();
    let messages: u64 = conversations.iter().map(|c| c.message_count).sum();
    vec![
        Kpi::new("Active Conversations", format_number(u64::try_from(active).unwrap_or(u64::MAX))),
        Kpi::new("Unread Messages", format_number(unread)),
        Kpi::new("Total Messages", format_number(messages)),
    ]
}

/// Keep conversations matching the status filter
#[must_use]
pub fn retain_status(conversations: Vec<Conversation>, filter: &str) -> Vec<Conversation> {
    match filter {
        "active" => conversations.into_iter().filter(Conversation::is_active).collect(),
        "closed" => conversations.into_iter().filter(|c| !c.is_active()).collect(),
        _ => conversations,
    }
}

/// `/admin/conversations`
#[derive(Template)]
#[template(path = "conversations.html")]
pub struct ConversationsPage {
    /// Layout
    pub shell: Shell,
    /// Summary tiles
    pub tiles: Vec<Kpi>,
    /// Rows
    pub view: ListView<ConversationRow>,
    /// Search box value
    pub search: String,
    /// Status options
    pub statuses: Vec<Choice>,
}

/// `GET /admin/conversations`
pub async fn index(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size());
    let client = state.client_for(&session);
    let loaded = list::load(client.conversations().list(&params)).await;

    let status = query.status_or_all().to_string();
    let mut tiles = summary(&[]);
    let view = ListView::build(
        loaded,
        |page| {
            tiles = summary(&page.conversations);
            (retain_status(page.conversations, &status), page.pagination)
        },
        &query,
        PATH,
        &FIELDS,
        "No conversations found",
    )
    .map(ConversationRow::from);

    let (notice, error) = query.flash();
    render::page(&ConversationsPage {
        shell: Shell::new(&session, PATH).with_flash(notice, error),
        tiles,
        view,
        search: query.search.clone(),
        statuses: Choice::list(&STATUSES, &status),
    })
}

/// A chat message bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    /// Sender name
    pub sender: String,
    /// `customer` or `therapist`
    pub sender_type: String,
    /// Body
    pub content: String,
    /// Sent time
    pub time: String,
    /// Seen by the recipient
    pub read: bool,
}

impl From<Message> for MessageRow {
    fn from(message: Message) -> Self {
        Self {
            sender: if message.sender_name.trim().is_empty() {
                "Unknown sender".to_string()
            } else {
                message.sender_name
            },
            sender_type: message.sender_type.to_lowercase(),
            content: message.content,
            time: format_datetime(message.timestamp.as_deref()),
            read: message.is_read,
        }
    }
}

/// `/admin/conversations/{id}`
#[derive(Template)]
#[template(path = "conversation_detail.html")]
pub struct ConversationDetailPage {
    /// Layout
    pub shell: Shell,
    /// Messages, oldest first as the backend returns them
    pub view: ListView<MessageRow>,
}

/// `GET /admin/conversations/{id}`
pub async fn detail(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::new(query.page(), state.page_size());
    let client = state.client_for(&session);
    let loaded = list::load(client.conversations().messages(&id, &params)).await;

    let base = format!("{PATH}/{id}");
    let view = ListView::build(
        loaded,
        |page| (page.messages, page.pagination),
        &query,
        &base,
        &[],
        "No messages in this conversation",
    )
    .map(MessageRow::from);

    render::page(&ConversationDetailPage {
        shell: Shell::new(&session, PATH),
        view,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::list::filter_items;
    use pretty_assertions::assert_eq;
    use roomspa_core::types::Participant;

    fn conversation(customer: &str, status: &str, unread: u64, messages: u64) -> Conversation {
        Conversation {
            id: customer.to_lowercase(),
            customer: Some(Participant {
                id: "c".to_string(),
                name: customer.to_string(),
            }),
            status: status.to_string(),
            unread_count: unread,
            message_count: messages,
            last_message: "See you at 3pm".to_string(),
            ..Conversation::default()
        }
    }

    #[test]
    fn test_summary_covers_loaded_page() {
        let page = vec![
            conversation("Ana", "active", 2, 10),
            conversation("Ben", "closed", 0, 4),
            conversation("Cy", "ACTIVE", 1, 1),
        ];
        let values: Vec<_> = summary(&page).into_iter().map(|k| k.value).collect();
        assert_eq!(values, vec!["2", "3", "15"]);
    }

    #[test]
    fn test_status_filter() {
        let page = vec![conversation("Ana", "active", 0, 0), conversation("Ben", "closed", 0, 0)];
        assert_eq!(retain_status(page.clone(), "closed").first().unwrap().id, "ben");
        assert_eq!(retain_status(page, "all").len(), 2);
    }

    #[test]
    fn test_search_covers_participants_and_preview() {
        let page = vec![conversation("Ana", "active", 0, 0)];
        assert_eq!(filter_items(&page, "3PM", &FIELDS).len(), 1);
        assert_eq!(filter_items(&page, "unknown therapist", &FIELDS).len(), 1);
        assert!(filter_items(&page, "zed", &FIELDS).is_empty());
    }

    #[test]
    fn test_message_row_fallback_sender() {
        let row = MessageRow::from(Message {
            content: "Hi".to_string(),
            sender_type: "Customer".to_string(),
            ..Message::default()
        });
        assert_eq!(row.sender, "Unknown sender");
        assert_eq!(row.sender_type, "customer");
    }
}
