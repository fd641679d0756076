//! Inbox messaging: individual and mass sends, conversations and read state.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use gymhub_core::error::AppError;
use gymhub_core::time::normalize;
use gymhub_core::traits::Clock;
use gymhub_core::types::PageRequest;
use gymhub_core::types::id::{MessageId, UserId};
use gymhub_database::repositories::MessageRepository;
use gymhub_entity::message::{
    Conversation, CreateIndividualMessage, CreateMassMessage, Message, MessageStatus,
    MessageType, UpdateMessage,
};
use gymhub_entity::user::UserRole;

use crate::context::RequestContext;
use crate::observer::{ServiceObserver, observe};
use crate::validation::ValidationFailure;
use crate::validation::message::{
    validate_create_individual_message, validate_create_mass_message, validate_update_message,
};

/// Sends and manages inbox messages.
#[derive(Debug, Clone)]
pub struct MessageService {
    repo: Arc<MessageRepository>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn ServiceObserver>,
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(
        repo: Arc<MessageRepository>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ServiceObserver>,
    ) -> Self {
        Self {
            repo,
            clock,
            observer,
        }
    }

    /// Sends one message from the caller. The sender role is the caller's.
    pub async fn send_individual(
        &self,
        ctx: &RequestContext,
        request: CreateIndividualMessage,
    ) -> Result<Message, AppError> {
        observe(self.observer.as_ref(), "message.send_individual", async {
            validate_create_individual_message(ctx.role, &request)?;

            let message = Message {
                id: MessageId::new(),
                sender_id: ctx.user_id,
                sender_type: ctx.role,
                recipient_id: request.recipient_id,
                recipient_type: request.recipient_type,
                message_type: MessageType::Individual,
                content: request.content,
                status: MessageStatus::Sent,
                created_at: normalize(self.clock.now()),
                read_at: None,
                parent_message_id: request.parent_message_id,
                mass_recipient_ids: None,
            };
            let stored = self.repo.create(&message).await?;

            info!(
                message_id = %stored.id,
                sender_id = %stored.sender_id,
                recipient_id = %stored.recipient_id,
                "Message sent"
            );
            Ok(stored)
        })
        .await
    }

    /// Fans one admin broadcast out into a message per recipient and
    /// returns the first one created.
    pub async fn send_mass(
        &self,
        ctx: &RequestContext,
        request: CreateMassMessage,
    ) -> Result<Message, AppError> {
        observe(self.observer.as_ref(), "message.send_mass", async {
            validate_create_mass_message(&request)?;

            let created_at = normalize(self.clock.now());
            let mut first: Option<Message> = None;
            for recipient_id in &request.recipient_ids {
                let message = Message {
                    id: MessageId::new(),
                    sender_id: ctx.user_id,
                    sender_type: UserRole::Admin,
                    recipient_id: *recipient_id,
                    recipient_type: request.recipient_type,
                    message_type: MessageType::Mass,
                    content: request.content.clone(),
                    status: MessageStatus::Sent,
                    created_at,
                    read_at: None,
                    parent_message_id: None,
                    mass_recipient_ids: Some(request.recipient_ids.clone()),
                };
                let stored = self.repo.create(&message).await?;
                first.get_or_insert(stored);
            }

            let first = first.ok_or(ValidationFailure::NothingSent)?;
            info!(
                sender_id = %ctx.user_id,
                recipients = request.recipient_ids.len(),
                "Mass message sent"
            );
            Ok(first)
        })
        .await
    }

    /// Loads a message by id.
    pub async fn get(&self, id: MessageId) -> Result<Option<Message>, AppError> {
        observe(self.observer.as_ref(), "message.get", self.repo.find_by_id(id)).await
    }

    /// One page of the individual messages between `me` and `other`, newest
    /// first, with the total and the number `me` has not read yet.
    pub async fn get_conversation(
        &self,
        me: UserId,
        other: UserId,
        page: PageRequest,
    ) -> Result<Conversation, AppError> {
        observe(self.observer.as_ref(), "message.get_conversation", async {
            let (messages, total_messages, unread_count) = futures::try_join!(
                self.repo.find_conversation(me, other, page),
                self.repo.count_conversation(me, other),
                self.repo.count_unread(me, other),
            )?;
            Ok(Conversation {
                messages,
                total_messages,
                unread_count,
            })
        })
        .await
    }

    /// The latest individual message of every conversation `me` takes part
    /// in, newest first.
    pub async fn get_user_conversations(&self, me: UserId) -> Result<Vec<Message>, AppError> {
        observe(self.observer.as_ref(), "message.get_user_conversations", async {
            let mut latest: HashMap<UserId, Message> = HashMap::new();
            for message in self.repo.find_individual_for_user(me).await? {
                let counterpart = message.counterpart_of(me);
                match latest.get(&counterpart) {
                    Some(current)
                        if (current.created_at, current.id) >= (message.created_at, message.id) => {}
                    _ => {
                        latest.insert(counterpart, message);
                    }
                }
            }

            let mut conversations: Vec<Message> = latest.into_values().collect();
            conversations.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            Ok(conversations)
        })
        .await
    }

    /// Sets status and/or read timestamp. `None` when the id does not resolve.
    pub async fn update(
        &self,
        id: MessageId,
        update: UpdateMessage,
    ) -> Result<Option<Message>, AppError> {
        observe(self.observer.as_ref(), "message.update", async {
            let Some(mut message) = self.repo.find_by_id(id).await? else {
                return Ok(None);
            };
            validate_update_message(&update)?;

            if let Some(status) = update.status {
                message.status = status;
            }
            if let Some(read_at) = update.read_at {
                message.read_at = Some(normalize(read_at));
            }
            let stored = self.repo.upsert(&message).await?;

            debug!(message_id = %id, status = %stored.status, "Message updated");
            Ok(Some(stored))
        })
        .await
    }

    /// Marks every unread message from `sender` to `recipient` as read now.
    pub async fn mark_conversation_read(
        &self,
        recipient: UserId,
        sender: UserId,
    ) -> Result<Vec<Message>, AppError> {
        observe(self.observer.as_ref(), "message.mark_conversation_read", async {
            let now = normalize(self.clock.now());
            let mut updated = Vec::new();
            for mut message in self.repo.find_unread(recipient, sender).await? {
                message.mark_read(now);
                updated.push(self.repo.upsert(&message).await?);
            }

            info!(
                recipient_id = %recipient,
                sender_id = %sender,
                count = updated.len(),
                "Conversation marked read"
            );
            Ok(updated)
        })
        .await
    }

    /// Deletes a message. Any store failure yields `false`.
    pub async fn delete(&self, id: MessageId) -> bool {
        observe(self.observer.as_ref(), "message.delete", self.repo.delete(id))
            .await
            .is_ok()
    }
}
