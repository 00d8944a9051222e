//! Console configuration: flags over environment over `console.toml` over
//! defaults. The password is never read from the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_SERVICE: &str = "synapse";

pub const ENV_URL: &str = "STACK_CONSOLE_URL";
pub const ENV_USERNAME: &str = "STACK_CONSOLE_USERNAME";
pub const ENV_PASSWORD: &str = "STACK_CONSOLE_PASSWORD";
pub const ENV_SERVICE: &str = "STACK_CONSOLE_SERVICE";

/// Optional overrides accepted in `console.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Dependent service watched after settings changes.
    #[serde(default)]
    pub service: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub url: String,
    pub username: String,
    pub password: Option<String>,
    pub service: String,
}

/// Values coming from the command line, all optional.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub service: Option<String>,
}

impl ConsoleConfig {
    /// Merge flag / env / file / default layers. `config_path` is the
    /// explicit `--config` value; without it, `./console.toml` is used when
    /// present.
    pub fn resolve(cli: CliOverrides, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => {
                let default_path = Path::new("console.toml");
                if default_path.exists() {
                    FileConfig::load(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Ok(Self::merge(cli, file))
    }

    fn merge(cli: CliOverrides, file: FileConfig) -> Self {
        Self {
            url: cli
                .url
                .or_else(|| env_nonempty(ENV_URL))
                .or(file.url)
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            username: cli
                .username
                .or_else(|| env_nonempty(ENV_USERNAME))
                .or(file.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: cli.password.or_else(|| env_nonempty(ENV_PASSWORD)),
            service: cli
                .service
                .or_else(|| env_nonempty(ENV_SERVICE))
                .or(file.service)
                .unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        }
    }
}

/// Environment lookup treating empty and whitespace-only values as absent.
fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}
