//! Configuration loading
//!
//! Resolution priority: environment variables override the TOML config
//! file, which overrides compiled defaults. A missing or unreadable file
//! at the default location degrades to defaults with a warning rather
//! than refusing to start; an explicitly given path must exist and parse.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default seconds between publish cycles.
const DEFAULT_PUBLISH_INTERVAL_SECS: u64 = 10;
/// Default seconds to wait before re-posting a failed batch.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 30;
/// Default reply queue extractor responses come back on.
const DEFAULT_CALLBACK_QUEUE: &str = "DROPLET_CALLBACK_QUEUE";

/// Queue processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Base URL of the archival REST API, version segment included.
    pub api_url: String,
    /// OAuth2 token endpoint for the client-credentials grant.
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Queue name extractors reply to, attached to every dispatch.
    pub callback_queue: String,
    /// How often the batch publisher wakes up to drain the publish queue.
    pub publish_interval: Duration,
    /// Fixed wait between retries of a failed batch submission.
    pub retry_interval: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/v1".to_string(),
            token_url: "http://localhost:8080/oauth/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            callback_queue: DEFAULT_CALLBACK_QUEUE.to_string(),
            publish_interval: Duration::from_secs(DEFAULT_PUBLISH_INTERVAL_SECS),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
        }
    }
}

/// On-disk TOML shape. Every field is optional so partial files work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_url: Option<String>,
    pub token_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_queue: Option<String>,
    pub publish_interval_secs: Option<u64>,
    pub retry_interval_secs: Option<u64>,
}

impl ProcessorConfig {
    /// Load configuration: compiled defaults, overlaid with the TOML file
    /// (explicit path, or the platform config dir), overlaid with `RILL_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file) = read_toml_config(path)? {
            config.apply_toml(file);
        }
        config.apply_env();

        Ok(config)
    }

    fn apply_toml(&mut self, file: TomlConfig) {
        if let Some(v) = file.api_url {
            self.api_url = v;
        }
        if let Some(v) = file.token_url {
            self.token_url = v;
        }
        if let Some(v) = file.client_id {
            self.client_id = v;
        }
        if let Some(v) = file.client_secret {
            self.client_secret = v;
        }
        if let Some(v) = file.callback_queue {
            self.callback_queue = v;
        }
        if let Some(v) = file.publish_interval_secs {
            self.publish_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.retry_interval_secs {
            self.retry_interval = Duration::from_secs(v);
        }
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("RILL_API_URL") {
            self.api_url = v;
        }
        if let Ok(v) = std::env::var("RILL_TOKEN_URL") {
            self.token_url = v;
        }
        if let Ok(v) = std::env::var("RILL_CLIENT_ID") {
            self.client_id = v;
        }
        if let Ok(v) = std::env::var("RILL_CLIENT_SECRET") {
            self.client_secret = v;
        }
        if let Ok(v) = std::env::var("RILL_CALLBACK_QUEUE") {
            self.callback_queue = v;
        }
        if let Some(v) = env_secs("RILL_PUBLISH_INTERVAL_SECS") {
            self.publish_interval = v;
        }
        if let Some(v) = env_secs("RILL_RETRY_INTERVAL_SECS") {
            self.retry_interval = v;
        }
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!("Ignoring non-numeric {}: {}", name, value);
            None
        }
    }
}

/// Read the TOML config file if one exists.
fn read_toml_config(path: Option<&Path>) -> Result<Option<TomlConfig>> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(None),
        },
    };

    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    match toml::from_str(&content) {
        Ok(file) => Ok(Some(file)),
        Err(e) => {
            if explicit {
                Err(Error::Config(format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    e
                )))
            } else {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

/// Platform config file location (`~/.config/rill/rill.toml` on Linux).
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rill").join("rill.toml"))
}
