use std::fmt;

use clap::Args;
use comfy_table::Table;
use owo_colors::OwoColorize;

use common::models::{Chat, ChatId};

use super::{excerpt, ClientOpError};

#[derive(Args, Debug, Clone)]
pub struct Chats {
    /// Accept a pending message request
    #[arg(long)]
    pub approve: Option<ChatId>,
}

#[derive(Debug)]
pub struct ChatsOutput {
    pub chats: Vec<Chat>,
    pub unread: u64,
    pub approved: Option<ChatId>,
}

impl fmt::Display for ChatsOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.approved {
            writeln!(f, "{} request {}", "Accepted".green().bold(), id)?;
        }
        if self.chats.is_empty() {
            return write!(f, "No conversations");
        }

        let mut table = Table::new();
        table.set_header(vec!["ID", "WITH", "UNREAD", "LAST MESSAGE"]);
        for chat in &self.chats {
            let with = if chat.request {
                format!("@{} (request)", chat.participant.username)
            } else {
                format!("@{}", chat.participant.username)
            };
            table.add_row(vec![
                chat.id.to_string(),
                with,
                chat.unread_count.to_string(),
                chat.last_message
                    .as_ref()
                    .map(|m| excerpt(&m.text, 40))
                    .unwrap_or_default(),
            ]);
        }
        writeln!(f, "{table}")?;
        write!(f, "{} {}", "Unread:".dimmed(), self.unread)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Chats {
    type Error = ClientOpError;
    type Output = ChatsOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let chat = pulse.chat();

        if let Some(id) = &self.approve {
            chat.approve(id).await?;
        }
        let chats = chat.list().await?;

        Ok(ChatsOutput {
            chats,
            unread: pulse.badges().get(common::badge::BadgeKind::Messages),
            approved: self.approve.clone(),
        })
    }
}
