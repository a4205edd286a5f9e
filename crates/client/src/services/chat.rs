use common::badge::BadgeKind;
use common::bus::AppEvent;
use common::chat::Conversation;
use common::models::{Chat, ChatId, Message, UserId};
use common::toast::Toast;

use super::{failure_message, ServiceError};
use crate::api::v0::chats::{
    ApproveChatRequest, ChatListRequest, ChatMessagesRequest, MarkChatReadRequest,
    SendMessageRequest,
};
use crate::api::v0::social::RelationshipRequest;
use crate::api::ApiError;
use crate::Pulse;

/// Direct messages: chat list, threads, sends and read receipts
pub struct ChatService<'a> {
    pulse: &'a Pulse,
}

impl<'a> ChatService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    /// Fetch the chat list and reconcile the messages badge against it.
    /// Pending message requests do not count towards the badge.
    pub async fn list(&self) -> Result<Vec<Chat>, ServiceError> {
        let response = self
            .pulse
            .client()
            .call(ChatListRequest {})
            .await
            .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load chats")))?;

        let unread = response
            .chats
            .iter()
            .filter(|chat| !chat.request)
            .map(|chat| chat.unread_count)
            .sum();
        self.pulse.badges().set(BadgeKind::Messages, unread);
        Ok(response.chats)
    }

    /// Load a thread's history together with the block relationship that
    /// decides whether it can be replied to
    #[tracing::instrument(skip(self))]
    pub async fn open(
        &self,
        chat_id: &ChatId,
        participant: &UserId,
    ) -> Result<Conversation, ServiceError> {
        let client = self.pulse.client();
        let (history, relationship) = tokio::try_join!(
            client.call(ChatMessagesRequest {
                chat_id: chat_id.clone(),
            }),
            client.call(RelationshipRequest {
                user_id: participant.clone(),
            }),
        )
        .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load conversation")))?;

        self.pulse.social().seed(participant, &relationship);

        let mut conversation = Conversation::new(chat_id.clone(), participant.clone());
        conversation.relationship = relationship;
        conversation.load(history.messages);
        Ok(conversation)
    }

    /// Append `text` as pending and deliver it
    ///
    /// The pending copy is swapped for the server's message on success and
    /// kept as failed otherwise, so the thread never loses what was typed.
    #[tracing::instrument(skip(self, conversation, text), fields(chat_id = %conversation.chat_id))]
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<Message, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Invalid("Message cannot be empty".to_string()));
        }
        if !conversation.can_send() {
            self.pulse
                .toast(Toast::error("You can't send messages in this chat"));
            return Err(ServiceError::Blocked(conversation.participant.clone()));
        }
        let sender = self
            .pulse
            .current_user()
            .map(|user| user.id)
            .ok_or(ApiError::Unauthenticated)?;

        let local_id = conversation.push_pending(sender, text);
        let request = SendMessageRequest {
            chat_id: conversation.chat_id.clone(),
            text: text.to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(message) => {
                conversation.confirm(&local_id, message.clone());
                self.pulse.publish(AppEvent::MessageSent {
                    chat_id: conversation.chat_id.clone(),
                    message_id: message.id.clone(),
                });
                Ok(message)
            }
            Err(e) => {
                conversation.fail(&local_id);
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to send message")));
                Err(e.into())
            }
        }
    }

    /// Mark a chat read. The badge drops by `unread` right away and is
    /// then set to the server's total when it reports one.
    #[tracing::instrument(skip(self))]
    pub async fn mark_read(&self, chat_id: &ChatId, unread: u64) -> Result<(), ServiceError> {
        let badges = self.pulse.badges();
        let taken = badges.take(BadgeKind::Messages, unread);

        let request = MarkChatReadRequest {
            chat_id: chat_id.clone(),
        };
        match self.pulse.client().call(request).await {
            Ok(response) => {
                if let Some(total) = response.unread_total {
                    badges.set(BadgeKind::Messages, total);
                }
                self.pulse.publish(AppEvent::ChatRead {
                    chat_id: chat_id.clone(),
                });
                Ok(())
            }
            Err(e) => {
                badges.increment(BadgeKind::Messages, taken);
                tracing::warn!(%chat_id, error = %e, "failed to mark chat read");
                Err(e.into())
            }
        }
    }

    /// Accept a message request
    pub async fn approve(&self, chat_id: &ChatId) -> Result<(), ServiceError> {
        let request = ApproveChatRequest {
            chat_id: chat_id.clone(),
        };
        match self.pulse.client().call(request).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to accept request")));
                Err(e.into())
            }
        }
    }
}
