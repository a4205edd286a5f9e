use clap::Args;
use owo_colors::OwoColorize;

use common::models::{RelationshipStatus, UserId};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Block {
    pub user_id: UserId,

    /// Unblock instead
    #[arg(long)]
    pub undo: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Block {
    type Error = ClientOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let social = pulse.social();
        social.seed(
            &self.user_id,
            &RelationshipStatus {
                blocked_by_me: self.undo,
                ..RelationshipStatus::default()
            },
        );

        Ok(if social.toggle_block(&self.user_id).await? {
            format!("{} {}", "Blocked".red().bold(), self.user_id)
        } else {
            format!("Unblocked {}", self.user_id)
        })
    }
}
