use std::fmt;
use std::path::PathBuf;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::PostId;

use super::ClientOpError;

/// Share a new photo or video post
#[derive(Args, Debug, Clone)]
pub struct Post {
    /// Image or video file to upload
    pub file: PathBuf,

    #[arg(long)]
    pub caption: Option<String>,
}

#[derive(Debug)]
pub struct PostOutput {
    pub id: PostId,
}

impl fmt::Display for PostOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} post {}", "Shared".green().bold(), self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientOpError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Post {
    type Error = PostError;
    type Output = PostOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content = tokio::fs::read(&self.file)
            .await
            .map_err(|e| PostError::Read(self.file.clone(), e))?;
        let file_name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let pulse = ctx.pulse().map_err(ClientOpError::from)?;
        let post = pulse
            .posts()
            .create(self.caption.clone(), &file_name, content)
            .await
            .map_err(ClientOpError::from)?;
        Ok(PostOutput { id: post.id })
    }
}
