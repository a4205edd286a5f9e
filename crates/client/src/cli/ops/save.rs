use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::PostId;
use common::optimistic::{TargetKey, ToggleField, ToggleState};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Save {
    pub post_id: PostId,

    /// Remove the bookmark instead
    #[arg(long)]
    pub undo: bool,
}

#[derive(Debug)]
pub struct SaveOutput {
    pub post_id: PostId,
    pub saved: bool,
}

impl fmt::Display for SaveOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.saved {
            write!(f, "{} post {}", "Saved".green().bold(), self.post_id)
        } else {
            write!(f, "Removed post {} from saved", self.post_id)
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Save {
    type Error = ClientOpError;
    type Output = SaveOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        pulse.local().seed(
            TargetKey::new(&self.post_id, ToggleField::Saved),
            ToggleState::new(self.undo),
        );
        let state = pulse.posts().toggle_save(&self.post_id).await?;
        Ok(SaveOutput {
            post_id: self.post_id.clone(),
            saved: state.active,
        })
    }
}
