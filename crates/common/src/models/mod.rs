//! Wire models shared by the sync core and the REST client
//!
//! One explicit shape per backend entity. Field-name drift on the server
//! side is absorbed here with serde aliases so nothing downstream has to
//! sniff response shapes.

mod chat;
mod ids;
mod post;
mod settings;
mod story;
mod user;

pub use chat::{Chat, Message, RelationshipStatus};
pub use ids::{ChatId, CommentId, MessageId, PostId, StoryId, UserId};
pub use post::{Comment, Media, MediaKind, Page, Post, Reel};
pub use settings::{
    AppPreferences, MessageAudience, NotificationSettings, PrivacySettings, ProfileUpdate,
    Settings, SettingsUpdate, Theme,
};
pub use story::{Story, StoryGroup};
pub use user::User;
