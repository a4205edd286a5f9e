use common::models::{Story, StoryGroup, StoryId};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{endpoint, file_part, Ack};
use crate::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone)]
pub struct StoryFeedRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryFeedResponse {
    #[serde(alias = "stories")]
    pub groups: Vec<StoryGroup>,
}

impl ApiRequest for StoryFeedRequest {
    type Response = StoryFeedResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(base_url.join("api/stories/feed")?))
    }
}

#[derive(Debug, Clone)]
pub struct MarkStorySeenRequest {
    pub story_id: StoryId,
}

impl ApiRequest for MarkStorySeenRequest {
    type Response = Ack;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "stories", self.story_id.as_str(), "view"])?;
        Ok(client.post(url))
    }
}

#[derive(Debug, Clone)]
pub struct CreateStoryRequest {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ApiRequest for CreateStoryRequest {
    type Response = Story;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let form = Form::new().part("media", file_part(self.file_name, self.content)?);
        Ok(client.post(base_url.join("api/stories")?).multipart(form))
    }
}
