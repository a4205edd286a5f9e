use common::models::{Chat, ChatId, Message};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{endpoint, Ack};
use crate::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone)]
pub struct ChatListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatList {
    pub chats: Vec<Chat>,
}

impl ApiRequest for ChatListRequest {
    type Response = ChatList;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("api/chats")?))
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessagesRequest {
    pub chat_id: ChatId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

impl ApiRequest for ChatMessagesRequest {
    type Response = MessageList;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "chats", self.chat_id.as_str(), "messages"])?;
        Ok(client.get(url))
    }
}

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub chat_id: ChatId,
    pub text: String,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    text: &'a str,
}

impl ApiRequest for SendMessageRequest {
    type Response = Message;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "chats", self.chat_id.as_str(), "messages"])?;
        Ok(client.post(url).json(&MessageBody { text: &self.text }))
    }
}

#[derive(Debug, Clone)]
pub struct MarkChatReadRequest {
    pub chat_id: ChatId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    /// Unread messages across all chats after the read
    #[serde(default)]
    pub unread_total: Option<u64>,
}

impl ApiRequest for MarkChatReadRequest {
    type Response = ReadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "chats", self.chat_id.as_str(), "read"])?;
        Ok(client.post(url))
    }
}

/// Accept a message request from someone the user does not follow
#[derive(Debug, Clone)]
pub struct ApproveChatRequest {
    pub chat_id: ChatId,
}

impl ApiRequest for ApproveChatRequest {
    type Response = Ack;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "chats", self.chat_id.as_str(), "approve"])?;
        Ok(client.post(url))
    }
}
