//! Inbox message domain entities.

pub mod kind;
pub mod model;

pub use kind::{MessageStatus, MessageType};
pub use model::{
    Conversation, CreateIndividualMessage, CreateMassMessage, Message, UpdateMessage,
};
