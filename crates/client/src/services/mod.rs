//! User-facing interactions
//!
//! Each service is a thin borrowed view over [`crate::Pulse`]. Mutations
//! follow the same shape: apply the optimistic guess, call the API, settle
//! against the response, publish on the bus.

mod auth;
mod chat;
mod notifications;
mod posts;
mod settings;
mod social;
mod stories;

pub use auth::{Availability, AuthService};
pub use chat::ChatService;
pub use notifications::{run_reconciler, NotificationService};
pub use posts::PostService;
pub use settings::SettingsService;
pub use social::{FollowState, SocialService};
pub use stories::StoryService;

use common::models::UserId;

use crate::api::ApiError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{0}")]
    Invalid(String),
    #[error("You can't message {0}")]
    Blocked(UserId),
}

impl ServiceError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ServiceError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure toast text: the server's validation message when it sent one,
/// otherwise the generic fallback
fn failure_message(error: &ApiError, fallback: &str) -> String {
    error
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
