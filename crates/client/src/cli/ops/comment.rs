use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::{CommentId, PostId};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Comment {
    pub post_id: PostId,

    /// Comment text
    pub text: String,
}

#[derive(Debug)]
pub struct CommentOutput {
    pub post_id: PostId,
    pub comment_id: CommentId,
}

impl fmt::Display for CommentOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on post {} ({})",
            "Commented".green().bold(),
            self.post_id,
            self.comment_id.to_string().dimmed()
        )
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Comment {
    type Error = ClientOpError;
    type Output = CommentOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let comment = pulse.posts().comment(&self.post_id, &self.text).await?;
        Ok(CommentOutput {
            post_id: self.post_id.clone(),
            comment_id: comment.id,
        })
    }
}
