use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaKind, StoryId, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(alias = "_id")]
    pub id: StoryId,
    pub media_url: String,
    #[serde(default = "default_story_kind")]
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "isSeen")]
    pub seen: bool,
}

fn default_story_kind() -> MediaKind {
    MediaKind::Image
}

/// All active stories of a single author, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryGroup {
    #[serde(alias = "user")]
    pub author: User,
    pub stories: Vec<Story>,
}
