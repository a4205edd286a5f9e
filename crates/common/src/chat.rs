//! Local view of one chat thread with optimistic sends
//!
//! A sent message appears immediately under a temporary id with
//! [`DeliveryStatus::Pending`]. When the server answers it is either
//! replaced by the server's copy or flagged [`DeliveryStatus::Failed`]
//! so the user can retry by hand.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{ChatId, Message, MessageId, RelationshipStatus, UserId};

const LOCAL_ID_PREFIX: &str = "local-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalMessage {
    pub message: Message,
    pub status: DeliveryStatus,
}

impl LocalMessage {
    pub fn is_local(&self) -> bool {
        self.message.id.as_str().starts_with(LOCAL_ID_PREFIX)
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub chat_id: ChatId,
    pub participant: UserId,
    pub relationship: RelationshipStatus,
    messages: Vec<LocalMessage>,
}

impl Conversation {
    pub fn new(chat_id: ChatId, participant: UserId) -> Self {
        Self {
            chat_id,
            participant,
            relationship: RelationshipStatus::default(),
            messages: Vec::new(),
        }
    }

    pub fn can_send(&self) -> bool {
        self.relationship.can_message()
    }

    pub fn messages(&self) -> &[LocalMessage] {
        &self.messages
    }

    /// Replace history with the server's copy, keeping unconfirmed local
    /// messages at the end
    pub fn load(&mut self, history: Vec<Message>) {
        let unconfirmed: Vec<LocalMessage> = self
            .messages
            .drain(..)
            .filter(|m| m.status != DeliveryStatus::Sent)
            .collect();
        self.messages = history
            .into_iter()
            .map(|message| LocalMessage {
                message,
                status: DeliveryStatus::Sent,
            })
            .collect();
        self.messages.extend(unconfirmed);
    }

    /// Append a message that has not reached the server yet
    pub fn push_pending(&mut self, sender_id: UserId, text: impl Into<String>) -> MessageId {
        let id = MessageId::new(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4()));
        self.messages.push(LocalMessage {
            message: Message {
                id: id.clone(),
                chat_id: self.chat_id.clone(),
                sender_id,
                text: text.into(),
                created_at: Utc::now(),
                read: false,
            },
            status: DeliveryStatus::Pending,
        });
        id
    }

    /// Swap a pending message for the server's copy
    pub fn confirm(&mut self, local_id: &MessageId, message: Message) -> bool {
        match self.position(local_id) {
            Some(idx) => {
                self.messages[idx] = LocalMessage {
                    message,
                    status: DeliveryStatus::Sent,
                };
                true
            }
            None => false,
        }
    }

    pub fn fail(&mut self, local_id: &MessageId) -> bool {
        match self.position(local_id) {
            Some(idx) => {
                self.messages[idx].status = DeliveryStatus::Failed;
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &LocalMessage> {
        self.messages
            .iter()
            .filter(|m| m.status == DeliveryStatus::Pending)
    }

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.message.id == id)
    }
}
