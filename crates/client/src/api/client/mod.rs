mod client;
mod error;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

pub use client::{ApiClient, ClientOptions};
pub use error::ApiError;

/// A typed backend endpoint
///
/// Each request knows how to build its HTTP call and which single response
/// type the server answers with.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    /// Whether the call needs a bearer token
    const AUTHENTICATED: bool = true;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}
