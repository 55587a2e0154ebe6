// src/config.rs

//! Manages bridge configuration: loading, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Associates one monitored property name with the sensor file it is written
/// to. `file` is a plain file name resolved against the sensor directory.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PropertyBinding {
    pub name: String,
    pub file: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A raw representation of the config file before validation.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_sensor_dir")]
    sensor_dir: PathBuf,
    #[serde(default = "default_reconnect_delay", with = "humantime_serde")]
    reconnect_delay: Duration,
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    connect_timeout: Duration,
    #[serde(default = "default_read_timeout", with = "humantime_serde")]
    read_timeout: Duration,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_log_parse_errors")]
    log_parse_errors: bool,
    #[serde(default = "default_properties")]
    properties: Vec<PropertyBinding>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    18082
}
fn default_sensor_dir() -> PathBuf {
    PathBuf::from("Sensors")
}
fn default_reconnect_delay() -> Duration {
    Duration::from_secs(5)
}
fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}
fn default_read_timeout() -> Duration {
    Duration::from_secs(2)
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_parse_errors() -> bool {
    true
}

/// The stock SimHub wind outputs. Mono (center-fan) operation is the
/// default; the side fans are present but disabled until enabled in the
/// config file.
fn default_properties() -> Vec<PropertyBinding> {
    vec![
        PropertyBinding {
            name: "ShakeItWindPlugin.OutputCenter".to_string(),
            file: "WindPercentageCenter(default).sensor".to_string(),
            enabled: true,
        },
        PropertyBinding {
            name: "ShakeItWindPlugin.OutputLeft".to_string(),
            file: "WindPercentageLeft.sensor".to_string(),
            enabled: false,
        },
        PropertyBinding {
            name: "ShakeItWindPlugin.OutputRight".to_string(),
            file: "WindPercentageRight.sensor".to_string(),
            enabled: false,
        },
    ]
}

/// Represents the final, validated bridge configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sensor_dir: PathBuf,
    #[serde(with = "humantime_serde")]
    pub reconnect_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
    pub log_level: String,
    pub log_parse_errors: bool,
    pub properties: Vec<PropertyBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sensor_dir: default_sensor_dir(),
            reconnect_delay: default_reconnect_delay(),
            connect_timeout: default_connect_timeout(),
            read_timeout: default_read_timeout(),
            log_level: default_log_level(),
            log_parse_errors: default_log_parse_errors(),
            properties: default_properties(),
        }
    }
}

impl Config {
    /// Loads the configuration for startup. A missing file is not an error:
    /// the built-in defaults apply. An unreadable or invalid file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Config file {} not found. Using built-in defaults.",
                path.display()
            );
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_file(path)
    }

    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        let raw_config: RawConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;

        let config = Config {
            host: raw_config.host,
            port: raw_config.port,
            sensor_dir: raw_config.sensor_dir,
            reconnect_delay: raw_config.reconnect_delay,
            connect_timeout: raw_config.connect_timeout,
            read_timeout: raw_config.read_timeout,
            log_level: raw_config.log_level,
            log_parse_errors: raw_config.log_parse_errors,
            properties: raw_config.properties,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the resolved configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.reconnect_delay.is_zero() {
            return Err(anyhow!("reconnect_delay cannot be 0"));
        }
        if self.connect_timeout.is_zero() {
            return Err(anyhow!("connect_timeout cannot be 0"));
        }
        if self.read_timeout.is_zero() {
            return Err(anyhow!("read_timeout cannot be 0"));
        }

        let mut seen = std::collections::HashSet::new();
        for (i, binding) in self.properties.iter().enumerate() {
            if binding.name.trim().is_empty() {
                return Err(anyhow!("invalid property #{}: name cannot be empty", i + 1));
            }
            if binding.file.trim().is_empty() {
                return Err(anyhow!("invalid property #{}: file cannot be empty", i + 1));
            }
            if binding.enabled && !seen.insert(binding.name.as_str()) {
                return Err(anyhow!(
                    "duplicate enabled property name '{}'",
                    binding.name
                ));
            }
        }

        if self.enabled_bindings().next().is_none() {
            warn!("No properties are enabled. The bridge will idle until reconfigured.");
        }
        Ok(())
    }

    /// The bindings the client actually subscribes to and writes for.
    pub fn enabled_bindings(&self) -> impl Iterator<Item = &PropertyBinding> {
        self.properties.iter().filter(|b| b.enabled)
    }

    /// Resolves a binding's output file against the sensor directory.
    pub fn sensor_path(&self, binding: &PropertyBinding) -> PathBuf {
        self.sensor_dir.join(&binding.file)
    }
}
