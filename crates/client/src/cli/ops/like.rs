use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::PostId;
use common::optimistic::{TargetKey, ToggleField, ToggleState};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Like {
    pub post_id: PostId,

    /// Remove the like instead
    #[arg(long)]
    pub undo: bool,
}

#[derive(Debug)]
pub struct LikeOutput {
    pub post_id: PostId,
    pub state: ToggleState,
}

impl fmt::Display for LikeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.state.active {
            "Liked".red().bold().to_string()
        } else {
            "Unliked".dimmed().to_string()
        };
        write!(f, "{verb} post {}", self.post_id)?;
        if let Some(count) = self.state.count {
            write!(f, " ({count} likes)")?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Like {
    type Error = ClientOpError;
    type Output = LikeOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        // a fresh process knows nothing about the post; start from the
        // opposite of the requested state so the toggle lands on it
        pulse.local().seed(
            TargetKey::new(&self.post_id, ToggleField::Liked),
            ToggleState::new(self.undo),
        );
        let state = pulse.posts().toggle_like(&self.post_id).await?;
        Ok(LikeOutput {
            post_id: self.post_id.clone(),
            state,
        })
    }
}
