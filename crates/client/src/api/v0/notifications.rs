use common::models::UserId;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::Ack;
use crate::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    #[serde(alias = "unreadCount")]
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct UnreadNotificationsRequest {}

impl ApiRequest for UnreadNotificationsRequest {
    type Response = CountResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("api/notifications/unread-count")?))
    }
}

#[derive(Debug, Clone)]
pub struct UnreadMessagesRequest {}

impl ApiRequest for UnreadMessagesRequest {
    type Response = CountResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("api/chats/unread-count")?))
    }
}

/// Tell the followed account it has a new follower (or request)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowNotificationRequest {
    pub user_id: UserId,
}

impl ApiRequest for FollowNotificationRequest {
    type Response = Ack;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .post(base_url.join("api/notifications/follow")?)
            .json(&self))
    }
}
