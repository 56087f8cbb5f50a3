//! Application configuration loaded from a JSON file at startup
//!
//! The roster, bridge credentials, and light sets all live here so that
//! nothing deployment-specific is hardcoded. The file is read once; the core
//! treats its contents as immutable for the process lifetime.

use presence_core::User;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub application: ApplicationConfig,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub users: Vec<User>,
    #[serde(default)]
    pub lights: LightsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// Hue bridge address and API username
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// IP or hostname of the bridge
    pub host: String,
    /// Username registered with the bridge API
    pub username: String,
}

/// Logging switches
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Master switch; false silences all output unless RUST_LOG overrides
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Level for this application's crates (trace/debug/info/warn/error)
    #[serde(default)]
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Light groups the rule engine acts on
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightsConfig {
    /// Turned off when the last user leaves
    #[serde(default)]
    pub last_out: Vec<u32>,
    /// Turned on when the first user arrives
    #[serde(default)]
    pub first_in: Vec<u32>,
}

/// Load and parse the configuration file
pub async fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;

    let config: AppConfig = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;

    tracing::debug!(
        "Loaded configuration: {} users, {} last-out lights, {} first-in lights",
        config.users.len(),
        config.lights.last_out.len(),
        config.lights.first_in.len()
    );
    Ok(config)
}
