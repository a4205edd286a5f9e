use std::fmt;

use clap::Args;
use owo_colors::OwoColorize;

use common::models::User;
use pulse_client::ServiceError;

use super::ClientOpError;

#[derive(Args, Clone)]
pub struct Login {
    /// Username, email or phone number
    pub identifier: String,

    /// Account password
    #[arg(long, env = "PULSE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Complete a registration with the one-time code sent to the account
    #[arg(long, conflicts_with = "password")]
    pub otp: Option<String>,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("identifier", &self.identifier)
            .field("otp", &self.otp.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
}

impl fmt::Display for LoginOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} as {} (@{})",
            "Logged in".green().bold(),
            self.user.label().bold(),
            self.user.username
        )
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = ClientOpError;
    type Output = LoginOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let pulse = ctx.pulse()?;
        let auth = pulse.auth();

        let user = match (&self.otp, &self.password) {
            (Some(code), _) => auth.verify_otp(&self.identifier, code).await?,
            (None, Some(password)) => auth.login(&self.identifier, password).await?,
            (None, None) => {
                return Err(ServiceError::Invalid(
                    "--password or --otp is required".to_string(),
                )
                .into())
            }
        };
        Ok(LoginOutput { user })
    }
}
