use common::models::{ProfileUpdate, Settings, SettingsUpdate, User};
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::{endpoint, Ack};
use crate::api::client::{ApiError, ApiRequest};

#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub update: ProfileUpdate,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = User;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.put(base_url.join("api/users/me")?).json(&self.update))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsRequest {
    pub update: SettingsUpdate,
}

impl ApiRequest for UpdateSettingsRequest {
    type Response = Settings;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "settings", self.update.section()])?;
        let request = client.put(url);
        Ok(match &self.update {
            SettingsUpdate::Privacy(privacy) => request.json(privacy),
            SettingsUpdate::Notifications(notifications) => request.json(notifications),
            SettingsUpdate::Preferences(preferences) => request.json(preferences),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeleteAccountRequest {}

impl ApiRequest for DeleteAccountRequest {
    type Response = Ack;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.delete(base_url.join("api/users/me")?))
    }
}
