use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatId, MessageId, User, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "isRead")]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(alias = "_id")]
    pub id: ChatId,
    pub participant: User,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u64,
    /// Message request from someone the user does not follow
    #[serde(default, alias = "isRequest")]
    pub request: bool,
}

/// Block relationship between the current user and another account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStatus {
    #[serde(default, alias = "isBlocked")]
    pub blocked_by_me: bool,
    #[serde(default, alias = "hasBlockedMe")]
    pub blocked_me: bool,
    #[serde(default, alias = "isFollowing")]
    pub following: bool,
}

impl RelationshipStatus {
    pub fn can_message(&self) -> bool {
        !self.blocked_by_me && !self.blocked_me
    }
}
