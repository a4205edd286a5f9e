use std::fmt;
use std::path::PathBuf;

use clap::Args;
use owo_colors::OwoColorize;
use url::Url;

use pulse_client::api::ApiClient;
use pulse_client::state::{AppConfig, StateError};

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug)]
pub struct ConfigInfo {
    pub directory: PathBuf,
    pub maintenance: bool,
    pub logged_in: bool,
}

#[derive(Debug)]
pub enum EndpointStatus {
    Ok {
        status: String,
        version: Option<String>,
    },
    Maintenance,
    Unhealthy(String),
    NotReachable,
}

#[derive(Debug)]
pub struct HealthOutput {
    pub config: Option<ConfigInfo>,
    pub config_error: Option<String>,
    pub api_url: String,
    pub api: EndpointStatus,
}

impl fmt::Display for HealthOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", "Config".bold())?;
        match &self.config {
            Some(info) => {
                writeln!(
                    f,
                    "  {} {}",
                    "directory:".dimmed(),
                    info.directory.display()
                )?;
                writeln!(f, "  {} {}", "config.toml:".dimmed(), "OK".green())?;
                let session = if info.logged_in {
                    "logged in".green().to_string()
                } else {
                    "logged out".yellow().to_string()
                };
                writeln!(f, "  {} {}", "session:".dimmed(), session)?;
                if info.maintenance {
                    writeln!(f, "  {} {}", "maintenance:".dimmed(), "ON".yellow())?;
                }
            }
            None => {
                if let Some(err) = &self.config_error {
                    writeln!(f, "  {} {}", "error:".red(), err)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{} ({}):", "API".bold(), self.api_url)?;
        let status = match &self.api {
            EndpointStatus::Ok { status, version } => match version {
                Some(version) => format!("{} ({status}, {version})", "OK".green()),
                None => format!("{} ({status})", "OK".green()),
            },
            EndpointStatus::Maintenance => "MAINTENANCE".yellow().to_string(),
            EndpointStatus::Unhealthy(reason) => format!("{} ({})", "UNHEALTHY".red(), reason),
            EndpointStatus::NotReachable => "NOT REACHABLE".red().to_string(),
        };
        write!(f, "  {} {}", "health:".dimmed(), status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = HealthOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // a missing config is reported, not fatal; fall back to defaults
        let (config, info, config_error) = match ctx.state() {
            Ok(state) => {
                let info = ConfigInfo {
                    directory: state.pulse_dir.clone(),
                    maintenance: state.config.maintenance_mode,
                    logged_in: state.session_path.exists(),
                };
                (state.config, Some(info), None)
            }
            Err(e) => {
                let mut config = AppConfig::default();
                if let Some(remote) = &ctx.remote {
                    config.api_url = remote.to_string();
                }
                (config, None, Some(e.to_string()))
            }
        };

        let url: Url = config.api_url()?;
        let api = match ApiClient::with_options(&url, config.client_options()) {
            Ok(client) => match client.health().await {
                Ok(health) => EndpointStatus::Ok {
                    status: health.status,
                    version: health.version,
                },
                Err(pulse_client::ApiError::Maintenance) => EndpointStatus::Maintenance,
                Err(e) => match e.status() {
                    Some(status) => EndpointStatus::Unhealthy(status.to_string()),
                    None => EndpointStatus::NotReachable,
                },
            },
            Err(e) => EndpointStatus::Unhealthy(e.to_string()),
        };

        Ok(HealthOutput {
            config: info,
            config_error,
            api_url: url.to_string(),
            api,
        })
    }
}
