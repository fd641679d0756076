//! Message repository implementation.

use std::sync::Arc;

use gymhub_core::result::AppResult;
use gymhub_core::traits::{DocumentQuery, DocumentStore};
use gymhub_core::types::id::{MessageId, UserId};
use gymhub_core::types::{FilterExpr, FilterField, FilterOp, PageRequest, SortField};
use gymhub_entity::message::{Message, MessageStatus, MessageType};

use crate::documents::collections::MESSAGES;
use crate::documents::{MessageDocument, from_body, to_body};

/// Repository for message documents.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    store: Arc<dyn DocumentStore>,
}

/// Individual messages exchanged between `a` and `b`, either direction.
fn between(a: UserId, b: UserId) -> FilterExpr {
    let (a, b) = (a.to_string(), b.to_string());
    FilterExpr::All(vec![
        FilterExpr::any([
            FilterExpr::all([
                FilterField::eq("sender_id", a.clone()),
                FilterField::eq("recipient_id", b.clone()),
            ]),
            FilterExpr::all([
                FilterField::eq("sender_id", b),
                FilterField::eq("recipient_id", a),
            ]),
        ]),
        FilterField::eq("message_type", MessageType::Individual.as_str()).into(),
    ])
}

/// Messages from `sender` to `recipient` that are not fully read.
fn unread_from(recipient: UserId, sender: UserId) -> FilterExpr {
    FilterExpr::All(vec![
        FilterField::eq("recipient_id", recipient.to_string()).into(),
        FilterField::eq("sender_id", sender.to_string()).into(),
        FilterExpr::any([
            FilterExpr::from(FilterField::is_null("read_at")),
            FilterExpr::from(FilterField::new(
                "status",
                FilterOp::Ne,
                MessageStatus::Read.as_str(),
            )),
        ]),
    ])
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn decode(body: serde_json::Value) -> AppResult<Message> {
        Ok(from_body::<MessageDocument>(MESSAGES, body)?.into())
    }

    /// Insert a new message.
    pub async fn create(&self, message: &Message) -> AppResult<Message> {
        let body = to_body(&MessageDocument::from(message))?;
        let stored = self
            .store
            .create_item(MESSAGES, &message.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: MessageId) -> AppResult<Option<Message>> {
        self.store
            .read_item(MESSAGES, &id.to_string())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// A page of the conversation between two users, newest first.
    pub async fn find_conversation(
        &self,
        a: UserId,
        b: UserId,
        page: PageRequest,
    ) -> AppResult<Vec<Message>> {
        let query = DocumentQuery::filtered(between(a, b))
            .sort_by(SortField::desc("created_at"))
            .sort_by(SortField::desc("id"))
            .paged(page);
        self.find(&query).await
    }

    /// Number of individual messages between two users.
    pub async fn count_conversation(&self, a: UserId, b: UserId) -> AppResult<u64> {
        self.store.count_items(MESSAGES, Some(&between(a, b))).await
    }

    /// Number of messages from `sender` that `recipient` has not read.
    pub async fn count_unread(&self, recipient: UserId, sender: UserId) -> AppResult<u64> {
        self.store
            .count_items(MESSAGES, Some(&unread_from(recipient, sender)))
            .await
    }

    /// Messages from `sender` that `recipient` has not read.
    pub async fn find_unread(&self, recipient: UserId, sender: UserId) -> AppResult<Vec<Message>> {
        let query = DocumentQuery::filtered(unread_from(recipient, sender))
            .sort_by(SortField::asc("created_at"));
        self.find(&query).await
    }

    /// Every individual message `user` sent or received.
    pub async fn find_individual_for_user(&self, user: UserId) -> AppResult<Vec<Message>> {
        let user = user.to_string();
        let filter = FilterExpr::All(vec![
            FilterExpr::any([
                FilterExpr::from(FilterField::eq("sender_id", user.clone())),
                FilterExpr::from(FilterField::eq("recipient_id", user)),
            ]),
            FilterField::eq("message_type", MessageType::Individual.as_str()).into(),
        ]);
        self.find(&DocumentQuery::filtered(filter)).await
    }

    /// Replace a stored message.
    pub async fn upsert(&self, message: &Message) -> AppResult<Message> {
        let body = to_body(&MessageDocument::from(message))?;
        let stored = self
            .store
            .upsert_item(MESSAGES, &message.id.to_string(), body)
            .await?;
        Self::decode(stored)
    }

    /// Delete a message. Missing documents surface as not-found.
    pub async fn delete(&self, id: MessageId) -> AppResult<()> {
        self.store.delete_item(MESSAGES, &id.to_string()).await
    }

    async fn find(&self, query: &DocumentQuery) -> AppResult<Vec<Message>> {
        self.store
            .query_items(MESSAGES, query)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }
}
