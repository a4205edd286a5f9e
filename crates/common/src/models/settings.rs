use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.username.is_none()
            && self.bio.is_none()
            && self.website.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageAudience {
    #[default]
    Everyone,
    Following,
    Nobody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default)]
    pub private_account: bool,
    #[serde(default)]
    pub show_activity_status: bool,
    #[serde(default)]
    pub allow_messages_from: MessageAudience,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub likes: bool,
    pub comments: bool,
    pub follows: bool,
    pub messages: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            likes: true,
            comments: true,
            follows: true,
            messages: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub autoplay_videos: bool,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: default_language(),
            autoplay_videos: false,
        }
    }
}

/// Full settings document as returned after any settings update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub preferences: AppPreferences,
}

/// A single settings section to update
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Privacy(PrivacySettings),
    Notifications(NotificationSettings),
    Preferences(AppPreferences),
}

impl SettingsUpdate {
    /// Path segment of the settings endpoint for this section
    pub fn section(&self) -> &'static str {
        match self {
            SettingsUpdate::Privacy(_) => "privacy",
            SettingsUpdate::Notifications(_) => "notifications",
            SettingsUpdate::Preferences(_) => "preferences",
        }
    }
}
