use clap::Args;

use common::badge::BadgeKind;
use common::models::ChatId;

use super::ClientOpError;

/// Mark a chat as read
#[derive(Args, Debug, Clone)]
pub struct Read {
    pub chat_id: ChatId,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Read {
    type Error = ClientOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let chat = pulse.chat();

        // the list seeds the messages badge and tells us what this chat owes
        let unread = chat
            .list()
            .await?
            .iter()
            .find(|c| c.id == self.chat_id)
            .map(|c| c.unread_count)
            .unwrap_or_default();
        chat.mark_read(&self.chat_id, unread).await?;

        Ok(format!(
            "Marked chat {} read ({} unread left)",
            self.chat_id,
            pulse.badges().get(BadgeKind::Messages)
        ))
    }
}
