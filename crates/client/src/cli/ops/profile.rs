use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::{ProfileUpdate, User};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Profile {
    #[arg(long)]
    pub display_name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    /// Permanently delete the account and log out
    #[arg(long, conflicts_with_all = ["display_name", "username", "bio", "website"])]
    pub delete_account: bool,
}

#[derive(Debug)]
pub enum ProfileOutput {
    /// No changes requested; the cached profile
    Current(Option<User>),
    Updated(User),
    Deleted,
}

impl fmt::Display for ProfileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = match self {
            ProfileOutput::Deleted => return write!(f, "{}", "Account deleted".red().bold()),
            ProfileOutput::Current(None) => return write!(f, "Not logged in"),
            ProfileOutput::Current(Some(user)) => user,
            ProfileOutput::Updated(user) => {
                writeln!(f, "{}", "Profile updated".green().bold())?;
                user
            }
        };
        writeln!(f, "{} (@{})", user.label().bold(), user.username)?;
        write!(f, "  {} {}", "id:".dimmed(), user.id)?;
        if let Some(bio) = &user.bio {
            write!(f, "\n  {} {}", "bio:".dimmed(), bio)?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Profile {
    type Error = ClientOpError;
    type Output = ProfileOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let settings = pulse.settings();

        if self.delete_account {
            settings.delete_account().await?;
            return Ok(ProfileOutput::Deleted);
        }

        let update = ProfileUpdate {
            display_name: self.display_name.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            website: self.website.clone(),
        };
        if update.is_empty() {
            return Ok(ProfileOutput::Current(pulse.current_user()));
        }
        Ok(ProfileOutput::Updated(settings.update_profile(update).await?))
    }
}
