//! Client state directory (`~/.pulse` by default)
//!
//! ```text
//! ~/.pulse/
//!   config.toml    client configuration
//!   session.json   bearer token of the logged-in account
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ClientOptions;

pub const APP_DIR_NAME: &str = ".pulse";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the Pulse REST API
    pub api_url: String,
    /// Per-request timeout in seconds; 0 keeps the transport default
    pub request_timeout_secs: u64,
    /// When set, every API call is refused without touching the network
    pub maintenance_mode: bool,
    /// Items requested per feed page
    pub feed_page_size: u32,
    /// Period of the background badge reconciliation
    pub badge_refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
            maintenance_mode: false,
            feed_page_size: 10,
            badge_refresh_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn api_url(&self) -> Result<Url, StateError> {
        Ok(Url::parse(&self.api_url)?)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
            maintenance: self.maintenance_mode,
        }
    }

    pub fn badge_refresh(&self) -> Duration {
        Duration::from_secs(self.badge_refresh_secs.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub pulse_dir: PathBuf,
    pub config_path: PathBuf,
    pub session_path: PathBuf,
    pub config: AppConfig,
}

impl AppState {
    /// `~/.pulse`
    pub fn default_dir() -> Result<PathBuf, StateError> {
        dirs::home_dir()
            .map(|home| home.join(APP_DIR_NAME))
            .ok_or(StateError::NoHomeDirectory)
    }

    fn resolve_dir(path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        match path {
            Some(path) => Ok(path),
            None => Self::default_dir(),
        }
    }

    fn at(pulse_dir: PathBuf, config: AppConfig) -> Self {
        Self {
            config_path: pulse_dir.join(CONFIG_FILE_NAME),
            session_path: pulse_dir.join(SESSION_FILE_NAME),
            pulse_dir,
            config,
        }
    }

    /// Create the state directory and write a config file
    pub fn init(path: Option<PathBuf>, config: AppConfig, force: bool) -> Result<Self, StateError> {
        let pulse_dir = Self::resolve_dir(path)?;
        let state = Self::at(pulse_dir, config);

        if state.config_path.exists() && !force {
            return Err(StateError::AlreadyInitialized(state.pulse_dir));
        }
        // reject bad URLs before anything is written
        state.config.api_url()?;

        fs::create_dir_all(&state.pulse_dir)?;
        state.save_config()?;
        tracing::info!(dir = %state.pulse_dir.display(), "initialized pulse state");
        Ok(state)
    }

    /// Load an existing state directory
    pub fn load(path: Option<PathBuf>) -> Result<Self, StateError> {
        let pulse_dir = Self::resolve_dir(path)?;
        let config_path = pulse_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::NotInitialized(pulse_dir));
        }

        let raw = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.api_url()?;
        tracing::debug!(dir = %pulse_dir.display(), api_url = %config.api_url, "loaded pulse state");
        Ok(Self::at(pulse_dir, config))
    }

    pub fn save_config(&self) -> Result<(), StateError> {
        fs::write(&self.config_path, toml::to_string_pretty(&self.config)?)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,
    #[error("No pulse config in {0}; run `pulse init` first")]
    NotInitialized(PathBuf),
    #[error("Pulse is already initialized in {0} (use --force to overwrite)")]
    AlreadyInitialized(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    WriteConfig(#[from] toml::ser::Error),
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),
}
