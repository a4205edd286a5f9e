use common::models::User;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::client::{ApiError, ApiRequest};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username, email or phone number
    pub identifier: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const AUTHENTICATED: bool = false;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("api/auth/login")?).json(&self))
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Account must be confirmed with a one-time code before login
    #[serde(default)]
    pub requires_otp: bool,
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const AUTHENTICATED: bool = false;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("api/auth/register")?).json(&self))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub identifier: String,
    pub code: String,
}

impl ApiRequest for VerifyOtpRequest {
    type Response = AuthResponse;
    const AUTHENTICATED: bool = false;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(base_url.join("api/auth/verify-otp")?).json(&self))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct CheckUsernameRequest {
    pub username: String,
}

impl ApiRequest for CheckUsernameRequest {
    type Response = AvailabilityResponse;
    const AUTHENTICATED: bool = false;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .get(base_url.join("api/auth/check-username")?)
            .query(&[("username", self.username)]))
    }
}

#[derive(Debug, Clone)]
pub struct CheckPhoneRequest {
    pub phone: String,
}

impl ApiRequest for CheckPhoneRequest {
    type Response = AvailabilityResponse;
    const AUTHENTICATED: bool = false;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .get(base_url.join("api/auth/check-phone")?)
            .query(&[("phone", self.phone)]))
    }
}
