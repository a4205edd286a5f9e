use serde::{Deserialize, Serialize};

use super::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(default, alias = "fullName")]
    pub display_name: Option<String>,
    #[serde(default, alias = "profilePicture")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "isPrivate")]
    pub private: bool,
    #[serde(default, alias = "isVerified")]
    pub verified: bool,
}

impl User {
    /// Name to show in listings, falling back to the handle
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
