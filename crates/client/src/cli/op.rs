use std::path::PathBuf;
use std::sync::Arc;

use common::toast::ToastQueue;
use pulse_client::{AppState, Pulse, PulseError};
use url::Url;

/// Everything an op may need, built once from the global flags
#[derive(Debug, Clone)]
pub struct OpContext {
    /// State directory override (`--config`)
    pub config_path: Option<PathBuf>,
    /// API URL override (`--remote`)
    pub remote: Option<Url>,
    /// Toasts raised while the op ran; printed after it finishes
    pub toasts: ToastQueue,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>, remote: Option<Url>) -> Self {
        Self {
            config_path,
            remote,
            toasts: ToastQueue::new(),
        }
    }

    pub fn state(&self) -> Result<AppState, PulseError> {
        let mut state = AppState::load(self.config_path.clone())?;
        if let Some(remote) = &self.remote {
            state.config.api_url = remote.to_string();
        }
        Ok(state)
    }

    /// A coordinator wired to the loaded state and this context's toasts
    pub fn pulse(&self) -> Result<Pulse, PulseError> {
        let state = self.state()?;
        Pulse::from_state(&state, Arc::new(self.toasts.clone()))
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

/// Generates `Command`, `OpOutput` and `OpError` for a set of ops and
/// dispatches `Command::execute` to the selected one
#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $op:ty)),* $(,)?) => {
        #[derive(::clap::Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($op),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$op as $crate::cli::op::Op>::Output),)*
        }

        impl ::std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(OpOutput::$variant(output) => write!(f, "{}", output),)*
                }
            }
        }

        #[derive(Debug, ::thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$op as $crate::cli::op::Op>::Error),
            )*
        }

        #[::async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Error = OpError;
            type Output = OpOutput;

            async fn execute(
                &self,
                ctx: &$crate::cli::op::OpContext,
            ) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => op
                            .execute(ctx)
                            .await
                            .map(OpOutput::$variant)
                            .map_err(OpError::$variant),
                    )*
                }
            }
        }
    };
}
