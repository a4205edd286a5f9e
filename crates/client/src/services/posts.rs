use common::bus::AppEvent;
use common::feed::FeedPager;
use common::models::{Comment, Post, PostId, Reel};
use common::optimistic::{Authoritative, TargetKey, ToggleField, ToggleState};
use common::toast::Toast;

use super::{failure_message, ServiceError};
use crate::api::v0::posts::{
    CreateCommentRequest, CreatePostRequest, FeedRequest, LikePostRequest, ReelsRequest,
    SavePostRequest, SavedPostsRequest,
};
use crate::Pulse;

/// Likes, bookmarks, comments and the paginated post listings
pub struct PostService<'a> {
    pulse: &'a Pulse,
}

impl<'a> PostService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    /// Record a post's server-side like/save state
    pub fn seed(&self, post: &Post) {
        let local = self.pulse.local();
        local.seed(
            TargetKey::new(&post.id, ToggleField::Liked),
            ToggleState::with_count(post.liked, post.likes_count),
        );
        local.seed(
            TargetKey::new(&post.id, ToggleField::Saved),
            ToggleState::new(post.saved),
        );
    }

    pub fn seed_reel(&self, reel: &Reel) {
        let local = self.pulse.local();
        local.seed(
            TargetKey::new(&reel.id, ToggleField::Liked),
            ToggleState::with_count(reel.liked, reel.likes_count),
        );
        local.seed(
            TargetKey::new(&reel.id, ToggleField::Saved),
            ToggleState::new(reel.saved),
        );
    }

    pub fn like_state(&self, post_id: &PostId) -> Option<ToggleState> {
        self.pulse
            .local()
            .get(&TargetKey::new(post_id, ToggleField::Liked))
    }

    pub fn saved_state(&self, post_id: &PostId) -> Option<ToggleState> {
        self.pulse
            .local()
            .get(&TargetKey::new(post_id, ToggleField::Saved))
    }

    /// Like or unlike, whichever flips the displayed state
    #[tracing::instrument(skip(self))]
    pub async fn toggle_like(&self, post_id: &PostId) -> Result<ToggleState, ServiceError> {
        let mutator = self.pulse.mutator();
        let action = mutator.begin(
            TargetKey::new(post_id, ToggleField::Liked),
            ToggleState::default(),
        );
        let like = action.proposed().active;

        let outcome = self
            .pulse
            .client()
            .call(LikePostRequest {
                post_id: post_id.clone(),
                like,
            })
            .await
            .map(|r| Authoritative {
                active: r.liked,
                count: r.likes_count,
            });

        let failure = if like {
            "Failed to like post"
        } else {
            "Failed to unlike post"
        };
        let state = mutator.settle(action, outcome, failure)?.state;

        self.pulse.publish(AppEvent::PostLiked {
            post_id: post_id.clone(),
            liked: state.active,
            likes_count: state.count,
        });
        Ok(state)
    }

    /// Bookmark or un-bookmark, whichever flips the displayed state
    #[tracing::instrument(skip(self))]
    pub async fn toggle_save(&self, post_id: &PostId) -> Result<ToggleState, ServiceError> {
        let mutator = self.pulse.mutator();
        let action = mutator.begin(
            TargetKey::new(post_id, ToggleField::Saved),
            ToggleState::default(),
        );
        let save = action.proposed().active;

        let outcome = self
            .pulse
            .client()
            .call(SavePostRequest {
                post_id: post_id.clone(),
                save,
            })
            .await
            .map(|r| Authoritative {
                active: r.saved,
                count: None,
            });

        let failure = if save {
            "Failed to save post"
        } else {
            "Failed to remove post from saved"
        };
        let state = mutator.settle(action, outcome, failure)?.state;

        self.pulse.publish(AppEvent::SavedUpdated {
            post_id: post_id.clone(),
            saved: state.active,
        });
        Ok(state)
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn comment(&self, post_id: &PostId, text: &str) -> Result<Comment, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Invalid("Comment cannot be empty".to_string()));
        }

        let request = CreateCommentRequest {
            post_id: post_id.clone(),
            text: text.to_string(),
        };
        match self.pulse.client().call(request).await {
            Ok(comment) => {
                self.pulse.publish(AppEvent::CommentAdded {
                    post_id: post_id.clone(),
                    comment_id: comment.id.clone(),
                });
                Ok(comment)
            }
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to add comment")));
                Err(e.into())
            }
        }
    }

    /// Fetch the next home feed page into `pager`, returning how many new
    /// posts it added
    pub async fn load_feed(&self, pager: &mut FeedPager<Post>) -> Result<usize, ServiceError> {
        let Some((page, limit)) = pager.next_request() else {
            return Ok(0);
        };
        let response = self
            .pulse
            .client()
            .call(FeedRequest { page, limit })
            .await
            .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load feed")))?;

        response.items.iter().for_each(|post| self.seed(post));
        Ok(pager.apply(response))
    }

    pub async fn load_saved(&self, pager: &mut FeedPager<Post>) -> Result<usize, ServiceError> {
        let Some((page, limit)) = pager.next_request() else {
            return Ok(0);
        };
        let response = self
            .pulse
            .client()
            .call(SavedPostsRequest { page, limit })
            .await
            .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load saved posts")))?;

        response.items.iter().for_each(|post| self.seed(post));
        Ok(pager.apply(response))
    }

    pub async fn load_reels(&self, pager: &mut FeedPager<Reel>) -> Result<usize, ServiceError> {
        let Some((page, limit)) = pager.next_request() else {
            return Ok(0);
        };
        let response = self
            .pulse
            .client()
            .call(ReelsRequest { page, limit })
            .await
            .inspect_err(|_| self.pulse.toast(Toast::error("Failed to load reels")))?;

        response.items.iter().for_each(|reel| self.seed_reel(reel));
        Ok(pager.apply(response))
    }

    /// Upload a new post
    #[tracing::instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn create(
        &self,
        caption: Option<String>,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Post, ServiceError> {
        let request = CreatePostRequest {
            caption,
            file_name: file_name.to_string(),
            content,
        };
        match self.pulse.client().call(request).await {
            Ok(post) => {
                self.seed(&post);
                self.pulse.toast(Toast::success("Post shared"));
                Ok(post)
            }
            Err(e) => {
                self.pulse
                    .toast(Toast::error(failure_message(&e, "Failed to share post")));
                Err(e.into())
            }
        }
    }
}
