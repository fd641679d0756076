//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::{MessageId, UserId};

use super::kind::{MessageStatus, MessageType};
use crate::user::UserRole;

/// One inbox message. Mass sends produce one of these per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Author's role at send time.
    pub sender_type: UserRole,
    /// Addressee.
    pub recipient_id: UserId,
    /// Addressee's role.
    pub recipient_type: UserRole,
    /// Individual or mass.
    pub message_type: MessageType,
    /// Body text.
    pub content: String,
    /// Delivery state.
    pub status: MessageStatus,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
    /// When the recipient read it.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    /// Message this one replies to.
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
    /// Full recipient list of the originating mass send.
    #[serde(default)]
    pub mass_recipient_ids: Option<Vec<UserId>>,
}

impl Message {
    /// Whether the message still counts as unread.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none() || self.status != MessageStatus::Read
    }

    /// Whether `user` is the sender or the recipient.
    pub fn involves(&self, user: UserId) -> bool {
        self.sender_id == user || self.recipient_id == user
    }

    /// The other participant from `me`'s point of view.
    pub fn counterpart_of(&self, me: UserId) -> UserId {
        if self.sender_id == me {
            self.recipient_id
        } else {
            self.sender_id
        }
    }

    /// Mark as read at `now`.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        self.status = MessageStatus::Read;
        self.read_at = Some(now);
    }
}

/// Request to send one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndividualMessage {
    /// Addressee.
    pub recipient_id: UserId,
    /// Addressee's role.
    pub recipient_type: UserRole,
    /// Body text.
    pub content: String,
    /// Optional message being replied to.
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
}

/// Request to broadcast one message to many recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMassMessage {
    /// Role shared by every recipient.
    pub recipient_type: UserRole,
    /// Body text.
    pub content: String,
    /// Recipients, in order.
    pub recipient_ids: Vec<UserId>,
}

/// Recipient-side update of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMessage {
    /// New status.
    #[serde(default)]
    pub status: Option<MessageStatus>,
    /// Read timestamp.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

/// A page of a two-party conversation plus its counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Messages, newest first.
    pub messages: Vec<Message>,
    /// Individual messages exchanged between the two parties.
    pub total_messages: u64,
    /// Messages from the counterpart the caller has not read.
    pub unread_count: u64,
}
