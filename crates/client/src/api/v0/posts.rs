use common::models::{Comment, Page, Post, PostId, Reel};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{endpoint, file_part};
use crate::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone, Copy)]
pub struct FeedRequest {
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for FeedRequest {
    type Response = Page<Post>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .get(base_url.join("api/posts/feed")?)
            .query(&[("page", self.page), ("limit", self.limit)]))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReelsRequest {
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for ReelsRequest {
    type Response = Page<Reel>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .get(base_url.join("api/reels")?)
            .query(&[("page", self.page), ("limit", self.limit)]))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SavedPostsRequest {
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for SavedPostsRequest {
    type Response = Page<Post>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .get(base_url.join("api/posts/saved")?)
            .query(&[("page", self.page), ("limit", self.limit)]))
    }
}

/// Like (`like = true`) or unlike a post
#[derive(Debug, Clone)]
pub struct LikePostRequest {
    pub post_id: PostId,
    pub like: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    #[serde(default, alias = "isLiked")]
    pub liked: Option<bool>,
    #[serde(default, alias = "likes")]
    pub likes_count: Option<u64>,
}

impl ApiRequest for LikePostRequest {
    type Response = LikeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "posts", self.post_id.as_str(), "like"])?;
        Ok(if self.like {
            client.post(url)
        } else {
            client.delete(url)
        })
    }
}

/// Bookmark (`save = true`) or un-bookmark a post
#[derive(Debug, Clone)]
pub struct SavePostRequest {
    pub post_id: PostId,
    pub save: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    #[serde(default, alias = "isSaved")]
    pub saved: Option<bool>,
}

impl ApiRequest for SavePostRequest {
    type Response = SaveResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "posts", self.post_id.as_str(), "save"])?;
        Ok(if self.save {
            client.post(url)
        } else {
            client.delete(url)
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommentRequest {
    pub post_id: PostId,
    pub text: String,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    text: &'a str,
}

impl ApiRequest for CreateCommentRequest {
    type Response = Comment;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "posts", self.post_id.as_str(), "comments"])?;
        Ok(client.post(url).json(&CommentBody { text: &self.text }))
    }
}

/// New post uploaded as multipart form data
#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub caption: Option<String>,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ApiRequest for CreatePostRequest {
    type Response = Post;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let mut form = Form::new().part("media", file_part(self.file_name, self.content)?);
        if let Some(caption) = self.caption {
            form = form.text("caption", caption);
        }
        Ok(client.post(base_url.join("api/posts")?).multipart(form))
    }
}
