use clap::Args;

use super::ClientOpError;

#[derive(Args, Debug, Clone)]
pub struct Logout;

#[async_trait::async_trait]
impl crate::cli::op::Op for Logout {
    type Error = ClientOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let who = pulse.current_user().map(|u| u.username);
        pulse.auth().logout()?;
        Ok(match who {
            Some(username) => format!("Logged out @{username}"),
            None => "Logged out".to_string(),
        })
    }
}
