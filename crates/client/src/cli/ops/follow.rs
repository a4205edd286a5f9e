use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::{RelationshipStatus, UserId};
use pulse_client::FollowState;

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Follow {
    pub user_id: UserId,

    /// Unfollow instead
    #[arg(long, conflicts_with = "cancel_request")]
    pub undo: bool,

    /// Withdraw a pending follow request to a private account
    #[arg(long)]
    pub cancel_request: bool,
}

#[derive(Debug)]
pub struct FollowOutput {
    pub user_id: UserId,
    pub state: FollowState,
}

impl fmt::Display for FollowOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            FollowState {
                following: true, ..
            } => write!(f, "{} {}", "Following".green().bold(), self.user_id),
            FollowState {
                requested: true, ..
            } => write!(f, "{} to {}", "Follow requested".yellow().bold(), self.user_id),
            _ => write!(f, "Not following {}", self.user_id),
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Follow {
    type Error = ClientOpError;
    type Output = FollowOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let social = pulse.social();

        let state = if self.cancel_request {
            social.cancel_request(&self.user_id).await?
        } else {
            social.seed(
                &self.user_id,
                &RelationshipStatus {
                    following: self.undo,
                    ..RelationshipStatus::default()
                },
            );
            social.toggle_follow(&self.user_id).await?
        };
        Ok(FollowOutput {
            user_id: self.user_id.clone(),
            state,
        })
    }
}
