use common::bus::AppEvent;
use common::models::{RelationshipStatus, User, UserId};
use common::optimistic::{Authoritative, TargetKey, ToggleField, ToggleState};
use common::toast::Toast;

use super::ServiceError;
use crate::api::v0::notifications::FollowNotificationRequest;
use crate::api::v0::social::{
    BlockRequest, CancelFollowRequest, FollowDirection, FollowListRequest, FollowRequest,
    RelationshipRequest,
};
use crate::Pulse;

/// Displayed follow button state for one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowState {
    pub following: bool,
    /// A follow request to a private account is awaiting approval
    pub requested: bool,
}

/// Follow, block and social-graph listings
pub struct SocialService<'a> {
    pulse: &'a Pulse,
}

impl<'a> SocialService<'a> {
    pub(crate) fn new(pulse: &'a Pulse) -> Self {
        Self { pulse }
    }

    pub fn seed(&self, user_id: &UserId, status: &RelationshipStatus) {
        let local = self.pulse.local();
        local.seed(
            TargetKey::new(user_id, ToggleField::Following),
            ToggleState::new(status.following),
        );
        local.seed(
            TargetKey::new(user_id, ToggleField::Blocked),
            ToggleState::new(status.blocked_by_me),
        );
    }

    pub fn follow_state(&self, user_id: &UserId) -> FollowState {
        let local = self.pulse.local();
        let flag = |field| {
            local
                .get(&TargetKey::new(user_id, field))
                .is_some_and(|s| s.active)
        };
        FollowState {
            following: flag(ToggleField::Following),
            requested: flag(ToggleField::FollowRequested),
        }
    }

    /// Follow or unfollow, whichever flips the displayed state
    ///
    /// Following a private account ends in `requested` rather than
    /// `following`. A successful follow also notifies the followed account;
    /// that notification is best-effort.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_follow(&self, user_id: &UserId) -> Result<FollowState, ServiceError> {
        let mutator = self.pulse.mutator();
        let action = mutator.begin(
            TargetKey::new(user_id, ToggleField::Following),
            ToggleState::default(),
        );
        let follow = action.proposed().active;

        let response = self
            .pulse
            .client()
            .call(FollowRequest {
                user_id: user_id.clone(),
                follow,
            })
            .await;
        let requested = match &response {
            Ok(r) if follow => r.requested.unwrap_or(false),
            _ => false,
        };
        let outcome = response.map(|r| Authoritative {
            active: r.following.or(r.requested.map(|requested| !requested && follow)),
            count: None,
        });

        let failure = if follow {
            "Failed to follow user"
        } else {
            "Failed to unfollow user"
        };
        let following = mutator.settle(action, outcome, failure)?.state.active;

        self.pulse.local().seed(
            TargetKey::new(user_id, ToggleField::FollowRequested),
            ToggleState::new(requested),
        );

        if following || requested {
            self.notify_follow(user_id).await;
        }

        self.pulse.publish(AppEvent::FollowUpdated {
            user_id: user_id.clone(),
            following,
            requested,
        });
        Ok(FollowState {
            following,
            requested,
        })
    }

    /// Withdraw a pending follow request
    #[tracing::instrument(skip(self))]
    pub async fn cancel_request(&self, user_id: &UserId) -> Result<FollowState, ServiceError> {
        let mutator = self.pulse.mutator();
        let action = mutator.begin_set(
            TargetKey::new(user_id, ToggleField::FollowRequested),
            false,
            ToggleState::new(true),
        );

        let outcome = self
            .pulse
            .client()
            .call(CancelFollowRequest {
                user_id: user_id.clone(),
            })
            .await
            .map(|r| Authoritative {
                active: r.requested,
                count: None,
            });
        let requested = mutator
            .settle(action, outcome, "Failed to cancel follow request")?
            .state
            .active;

        let state = FollowState {
            following: self.follow_state(user_id).following,
            requested,
        };
        self.pulse.publish(AppEvent::FollowUpdated {
            user_id: user_id.clone(),
            following: state.following,
            requested: state.requested,
        });
        Ok(state)
    }

    /// Block or unblock, whichever flips the displayed state. Blocking
    /// also clears any follow state towards the account.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_block(&self, user_id: &UserId) -> Result<bool, ServiceError> {
        let mutator = self.pulse.mutator();
        let action = mutator.begin(
            TargetKey::new(user_id, ToggleField::Blocked),
            ToggleState::default(),
        );
        let block = action.proposed().active;

        let outcome = self
            .pulse
            .client()
            .call(BlockRequest {
                user_id: user_id.clone(),
                block,
            })
            .await
            .map(|r| Authoritative {
                active: r.blocked,
                count: None,
            });

        let failure = if block {
            "Failed to block user"
        } else {
            "Failed to unblock user"
        };
        let blocked = mutator.settle(action, outcome, failure)?.state.active;

        if blocked {
            let local = self.pulse.local();
            local.seed(
                TargetKey::new(user_id, ToggleField::Following),
                ToggleState::new(false),
            );
            local.seed(
                TargetKey::new(user_id, ToggleField::FollowRequested),
                ToggleState::new(false),
            );
        }

        self.pulse.publish(AppEvent::BlockUpdated {
            user_id: user_id.clone(),
            blocked,
        });
        Ok(blocked)
    }

    /// Look up (and record) the relationship with another account
    pub async fn relationship(&self, user_id: &UserId) -> Result<RelationshipStatus, ServiceError> {
        let status = self
            .pulse
            .client()
            .call(RelationshipRequest {
                user_id: user_id.clone(),
            })
            .await?;
        self.seed(user_id, &status);
        Ok(status)
    }

    pub async fn followers(&self, user_id: &UserId) -> Result<Vec<User>, ServiceError> {
        self.list(user_id, FollowDirection::Followers).await
    }

    pub async fn following(&self, user_id: &UserId) -> Result<Vec<User>, ServiceError> {
        self.list(user_id, FollowDirection::Following).await
    }

    async fn list(
        &self,
        user_id: &UserId,
        direction: FollowDirection,
    ) -> Result<Vec<User>, ServiceError> {
        let response = self
            .pulse
            .client()
            .call(FollowListRequest {
                user_id: user_id.clone(),
                direction,
            })
            .await
            .inspect_err(|_| {
                self.pulse
                    .toast(Toast::error(format!("Failed to load {direction}")))
            })?;
        Ok(response.users)
    }

    async fn notify_follow(&self, user_id: &UserId) {
        let request = FollowNotificationRequest {
            user_id: user_id.clone(),
        };
        if let Err(e) = self.pulse.client().call(request).await {
            tracing::warn!(%user_id, error = %e, "failed to send follow notification");
        }
    }
}
