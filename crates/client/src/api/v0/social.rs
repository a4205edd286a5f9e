use std::fmt;

use common::models::{RelationshipStatus, User, UserId};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::endpoint;
use crate::api::client::{ApiError, ApiRequest};

/// Follow (`follow = true`) or unfollow an account
#[derive(Debug, Clone)]
pub struct FollowRequest {
    pub user_id: UserId,
    pub follow: bool,
}

/// Follow state after a follow-related call. Private accounts answer a
/// follow with `requested` instead of `following`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    #[serde(default, alias = "isFollowing")]
    pub following: Option<bool>,
    #[serde(default, alias = "isRequested")]
    pub requested: Option<bool>,
}

impl ApiRequest for FollowRequest {
    type Response = FollowResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "users", self.user_id.as_str(), "follow"])?;
        Ok(if self.follow {
            client.post(url)
        } else {
            client.delete(url)
        })
    }
}

/// Withdraw a pending follow request to a private account
#[derive(Debug, Clone)]
pub struct CancelFollowRequest {
    pub user_id: UserId,
}

impl ApiRequest for CancelFollowRequest {
    type Response = FollowResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "users", self.user_id.as_str(), "follow-request"])?;
        Ok(client.delete(url))
    }
}

#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub user_id: UserId,
    pub block: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    #[serde(default, alias = "isBlocked")]
    pub blocked: Option<bool>,
}

impl ApiRequest for BlockRequest {
    type Response = BlockResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "users", self.user_id.as_str(), "block"])?;
        Ok(if self.block {
            client.post(url)
        } else {
            client.delete(url)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    Followers,
    Following,
}

impl fmt::Display for FollowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowDirection::Followers => write!(f, "followers"),
            FollowDirection::Following => write!(f, "following"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FollowListRequest {
    pub user_id: UserId,
    pub direction: FollowDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    #[serde(alias = "followers", alias = "following")]
    pub users: Vec<User>,
}

impl ApiRequest for FollowListRequest {
    type Response = UserList;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let direction = self.direction.to_string();
        let url = endpoint(base_url, &["api", "users", self.user_id.as_str(), &direction])?;
        Ok(client.get(url))
    }
}

/// Block/follow relationship with another account
#[derive(Debug, Clone)]
pub struct RelationshipRequest {
    pub user_id: UserId,
}

impl ApiRequest for RelationshipRequest {
    type Response = RelationshipStatus;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "users", self.user_id.as_str(), "relationship"])?;
        Ok(client.get(url))
    }
}
