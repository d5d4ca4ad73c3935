//! Main application configuration
//!
//! This module defines the primary configuration structures for the team-rooms
//! service, including environment variable loading and validation. Platform
//! credentials and ids are required; the process fails fast when any of them
//! is absent.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub platform: PlatformSettings,
    pub reclamation: ReclamationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for health check and metrics endpoints
    pub health_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Platform connection and authorization settings; all required
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Gateway credential
    pub token: String,
    /// Role that authorizes the team randomize command
    pub required_role_id: u64,
    /// The "join to create" lobby voice channel
    pub lobby_channel_id: u64,
    /// Text command prefix
    pub command_prefix: String,
}

/// Reclamation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclamationSettings {
    /// Period of the registry-wide emptiness sweep in milliseconds
    pub sweep_interval_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "team-rooms".to_string(),
            log_level: "info".to_string(),
            health_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for ReclamationSettings {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 60_000, // 60 seconds
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `DISCORD_TOKEN`, `REQUIRED_ROLE_ID` and `LOBBY_CHANNEL_ID` are
    /// required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut service = ServiceSettings::default();
        if let Ok(name) = env::var("SERVICE_NAME") {
            service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            service.log_level = log_level;
        }
        if let Ok(port) = env::var("HEALTH_PORT") {
            service.health_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HEALTH_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        let platform = PlatformSettings {
            token: require_env("DISCORD_TOKEN")?,
            required_role_id: parse_snowflake_env("REQUIRED_ROLE_ID")?,
            lobby_channel_id: parse_snowflake_env("LOBBY_CHANNEL_ID")?,
            command_prefix: env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string()),
        };

        let mut reclamation = ReclamationSettings::default();
        if let Ok(interval) = env::var("SWEEP_INTERVAL_MS") {
            reclamation.sweep_interval_ms = interval
                .parse()
                .map_err(|_| anyhow!("Invalid SWEEP_INTERVAL_MS value: {}", interval))?;
        }

        let config = Self {
            service,
            platform,
            reclamation,
        };
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get the sweep period as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.reclamation.sweep_interval_ms)
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("{} must be set", name))
}

fn parse_snowflake_env(name: &str) -> Result<u64> {
    let raw = require_env(name)?;
    raw.parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, raw))
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.health_port == 0 {
        return Err(anyhow!("Health port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.platform.token.is_empty() {
        return Err(anyhow!("Platform token cannot be empty"));
    }
    if config.platform.required_role_id == 0 {
        return Err(anyhow!("Required role id cannot be 0"));
    }
    if config.platform.lobby_channel_id == 0 {
        return Err(anyhow!("Lobby channel id cannot be 0"));
    }
    if config.platform.command_prefix.is_empty() {
        return Err(anyhow!("Command prefix cannot be empty"));
    }

    if config.reclamation.sweep_interval_ms == 0 {
        return Err(anyhow!("Sweep interval must be greater than 0"));
    }

    Ok(())
}
