use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::api::v0::health::{HealthRequest, HealthResponse};

/// Transport settings for [`ApiClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// Refuse every call with [`ApiError::Maintenance`]
    pub maintenance: bool,
}

/// Client for the Pulse REST API
///
/// Cheap to clone; clones share the bearer token, so logging in through
/// one handle authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
    remote: Url,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
    maintenance: bool,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("remote", &self.remote.as_str())
            .field("authenticated", &self.is_authenticated())
            .field("maintenance", &self.maintenance)
            .finish()
    }
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        Self::with_options(remote, ClientOptions::default())
    }

    pub fn with_options(remote: &Url, options: ClientOptions) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            remote: normalize_base(remote),
            client: builder.build()?,
            token: Arc::new(RwLock::new(None)),
            maintenance: options.maintenance,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        if self.maintenance {
            return Err(ApiError::Maintenance);
        }

        let token = self.token();
        if T::AUTHENTICATED && token.is_none() {
            return Err(ApiError::Unauthenticated);
        }

        let mut request_builder = request.build_request(&self.remote, &self.client)?;
        if let Some(token) = token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            // 204s and empty bodies decode as an empty object
            let body: &[u8] = if body.is_empty() { b"{}" } else { &body };
            Ok(serde_json::from_slice(body)?)
        } else {
            let body = response.text().await?;
            tracing::debug!(%status, endpoint = std::any::type_name::<T>(), "API call failed");
            Err(ApiError::from_response(status, &body))
        }
    }

    /// Probe the backend health endpoint
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.call(HealthRequest {}).await
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

/// Endpoint paths are joined relative to the base, so it must end in `/`
/// or its last path segment would be replaced.
fn normalize_base(remote: &Url) -> Url {
    let mut remote = remote.clone();
    if !remote.path().ends_with('/') {
        let path = format!("{}/", remote.path());
        remote.set_path(&path);
    }
    remote
}
