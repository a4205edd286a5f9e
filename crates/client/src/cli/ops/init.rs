use std::fmt;
use std::path::PathBuf;

use clap::Args;
use owo_colors::OwoColorize;

use pulse_client::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Base URL of the Pulse API (default: http://localhost:5000)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Items requested per feed page
    #[arg(long, default_value = "10")]
    pub page_size: u32,

    /// Refuse every API call without contacting the backend
    #[arg(long)]
    pub maintenance: bool,

    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug)]
pub struct InitOutput {
    pub pulse_dir: PathBuf,
    pub config_path: PathBuf,
    pub api_url: String,
    pub page_size: u32,
    pub maintenance: bool,
}

impl fmt::Display for InitOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} pulse at {}",
            "Initialized".green().bold(),
            self.pulse_dir.display().to_string().bold()
        )?;
        writeln!(f, "  {} {}", "Config:".dimmed(), self.config_path.display())?;
        writeln!(f, "  {} {}", "API:".dimmed(), self.api_url)?;
        writeln!(f, "  {} {}", "Page size:".dimmed(), self.page_size)?;
        if self.maintenance {
            write!(f, "  {} {}", "Maintenance:".dimmed(), "ON".yellow())
        } else {
            write!(f, "  {} {}", "Maintenance:".dimmed(), "off")
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = InitOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let api_url = match (&self.api_url, &ctx.remote) {
            (Some(url), _) => url.clone(),
            (None, Some(remote)) => remote.to_string(),
            (None, None) => defaults.api_url.clone(),
        };
        let config = AppConfig {
            api_url,
            request_timeout_secs: self.timeout,
            maintenance_mode: self.maintenance,
            feed_page_size: self.page_size,
            ..defaults
        };

        let state = AppState::init(ctx.config_path.clone(), config, self.force)?;

        Ok(InitOutput {
            pulse_dir: state.pulse_dir,
            config_path: state.config_path,
            api_url: state.config.api_url,
            page_size: state.config.feed_page_size,
            maintenance: state.config.maintenance_mode,
        })
    }
}
