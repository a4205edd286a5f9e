use common::models::{Story, StoryGroup, StoryId, UserId};
use common::toast::Toast;

use super::{failure_message, ServiceError};
use crate::api::v0::stories::{CreateStoryRequest, MarkStorySeenRequest, StoryFeedRequest};
use crate::Pulse;

pub struct StoryService<'a> {
    pulse: &'a Pulse,
}

impl<'a> StoryService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    /// Story tray, authors with unseen stories first
    pub async fn feed(&self) -> Result<Vec<StoryGroup>, ServiceError> {
        let response = self
            .pulse
            .client()
            .call(StoryFeedRequest {})
            .await
            .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load stories")))?;

        let mut groups = response.groups;
        let seen = self.pulse.seen();
        seen.observe(&groups);
        seen.order(&mut groups);
        Ok(groups)
    }

    /// Mark a story seen. Only the first view reaches the server and a
    /// failed report keeps the local mark. Returns whether this was the
    /// first view.
    #[tracing::instrument(skip(self))]
    pub async fn view(&self, story_id: &StoryId, author_id: &UserId) -> bool {
        if !self.pulse.seen().mark_seen(story_id, author_id) {
            return false;
        }
        let request = MarkStorySeenRequest {
            story_id: story_id.clone(),
        };
        if let Err(e) = self.pulse.client().call(request).await {
            tracing::warn!(%story_id, error = %e, "failed to report story view");
        }
        true
    }

    #[tracing::instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn create(&self, file_name: &str, content: Vec<u8>) -> Result<Story, ServiceError> {
        let request = CreateStoryRequest {
            file_name: file_name.to_string(),
            content,
        };
        match self.pulse.client().call(request).await {
            Ok(story) => {
                self.pulse.toast(Toast::success("Story shared"));
                Ok(story)
            }
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to share story")));
                Err(e.into())
            }
        }
    }
}
