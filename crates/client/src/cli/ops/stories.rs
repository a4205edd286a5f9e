use std::fmt;
use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use owo_colors::OwoColorize;

use common::models::{StoryGroup, StoryId, UserId};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Stories {
    /// Mark a story as seen
    #[arg(long, requires = "author", conflicts_with = "upload")]
    pub view: Option<StoryId>,

    /// Author of the story passed to --view
    #[arg(long)]
    pub author: Option<UserId>,

    /// Share a new story from an image or video file
    #[arg(long)]
    pub upload: Option<PathBuf>,
}

#[derive(Debug)]
pub enum StoriesOutput {
    Tray {
        groups: Vec<StoryGroup>,
        unseen: Vec<bool>,
    },
    Viewed {
        story_id: StoryId,
        first_view: bool,
    },
    Uploaded(StoryId),
}

impl fmt::Display for StoriesOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoriesOutput::Tray { groups, .. } if groups.is_empty() => {
                write!(f, "No stories right now")
            }
            StoriesOutput::Tray { groups, unseen } => {
                let mut table = Table::new();
                table.set_header(vec!["", "AUTHOR", "STORIES", "LATEST ID"]);
                for (group, unseen) in groups.iter().zip(unseen) {
                    table.add_row(vec![
                        if *unseen { "●".to_string() } else { String::new() },
                        format!("@{}", group.author.username),
                        group.stories.len().to_string(),
                        group
                            .stories
                            .last()
                            .map(|s| s.id.to_string())
                            .unwrap_or_default(),
                    ]);
                }
                write!(f, "{table}")
            }
            StoriesOutput::Viewed {
                story_id,
                first_view,
            } => {
                if *first_view {
                    write!(f, "{} story {}", "Viewed".green().bold(), story_id)
                } else {
                    write!(f, "Story {} was already seen", story_id)
                }
            }
            StoriesOutput::Uploaded(id) => write!(f, "{} story {}", "Shared".green().bold(), id),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoriesError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientOpError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Stories {
    type Error = StoriesError;
    type Output = StoriesOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse().map_err(ClientOpError::from)?;
        let stories = pulse.stories();

        if let Some(path) = &self.upload {
            let content = tokio::fs::read(path)
                .await
                .map_err(|e| StoriesError::Read(path.clone(), e))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "story".to_string());
            let story = stories
                .create(&file_name, content)
                .await
                .map_err(ClientOpError::from)?;
            return Ok(StoriesOutput::Uploaded(story.id));
        }

        if let (Some(story_id), Some(author)) = (&self.view, &self.author) {
            let first_view = stories.view(story_id, author).await;
            return Ok(StoriesOutput::Viewed {
                story_id: story_id.clone(),
                first_view,
            });
        }

        let groups = stories.feed().await.map_err(ClientOpError::from)?;
        let unseen = groups.iter().map(|g| pulse.seen().has_unseen(g)).collect();
        Ok(StoriesOutput::Tray { groups, unseen })
    }
}
