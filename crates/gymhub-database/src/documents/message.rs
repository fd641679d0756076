//! Message storage document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::time::{storage_instant, storage_instant_opt};
use gymhub_core::types::id::{MessageId, UserId};
use gymhub_entity::message::{Message, MessageStatus, MessageType};
use gymhub_entity::user::UserRole;

/// Stored form of [`Message`]. Optional fields are written as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    pub id: MessageId,
    pub sender_id: UserId,
    pub sender_type: UserRole,
    pub recipient_id: UserId,
    pub recipient_type: UserRole,
    pub message_type: MessageType,
    pub content: String,
    pub status: MessageStatus,
    #[serde(with = "storage_instant")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "storage_instant_opt")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
    #[serde(default)]
    pub mass_recipient_ids: Option<Vec<UserId>>,
}

impl From<&Message> for MessageDocument {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            sender_type: m.sender_type,
            recipient_id: m.recipient_id,
            recipient_type: m.recipient_type,
            message_type: m.message_type,
            content: m.content.clone(),
            status: m.status,
            created_at: m.created_at,
            read_at: m.read_at,
            parent_message_id: m.parent_message_id,
            mass_recipient_ids: m.mass_recipient_ids.clone(),
        }
    }
}

impl From<MessageDocument> for Message {
    fn from(doc: MessageDocument) -> Self {
        Self {
            id: doc.id,
            sender_id: doc.sender_id,
            sender_type: doc.sender_type,
            recipient_id: doc.recipient_id,
            recipient_type: doc.recipient_type,
            message_type: doc.message_type,
            content: doc.content,
            status: doc.status,
            created_at: doc.created_at,
            read_at: doc.read_at,
            parent_message_id: doc.parent_message_id,
            mass_recipient_ids: doc.mass_recipient_ids,
        }
    }
}
