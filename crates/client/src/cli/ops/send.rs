use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::{ChatId, MessageId, UserId};

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct SendMessage {
    pub chat_id: ChatId,

    /// The other participant of the chat
    #[arg(long)]
    pub to: UserId,

    /// Message text
    pub text: String,
}

#[derive(Debug)]
pub struct SendOutput {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl fmt::Display for SendOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to chat {} ({})",
            "Sent".green().bold(),
            self.chat_id,
            self.message_id.to_string().dimmed()
        )
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for SendMessage {
    type Error = ClientOpError;
    type Output = SendOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let chat = pulse.chat();

        let mut conversation = chat.open(&self.chat_id, &self.to).await?;
        let message = chat.send(&mut conversation, &self.text).await?;
        Ok(SendOutput {
            chat_id: self.chat_id.clone(),
            message_id: message.id,
        })
    }
}
