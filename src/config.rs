//! # Configuration Management
//!
//! Centralized configuration for the interchain query host.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Security Considerations
//! - The host starts disabled with an empty allow-list
//! - The per-packet gas limit bounds the work a single packet can trigger

use crate::error::{IcqError, Result};
use crate::protocol::params::HostParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Port the host module binds to
pub const HOST_PORT_ID: &str = "icqhost";

/// Max accepted packet size (1 MB)
pub const MAX_PACKET_SIZE: usize = 1024 * 1024;

/// Default gas limit for one packet
pub const DEFAULT_MAX_GAS_PER_PACKET: u64 = 1_000_000;

/// Largest gas limit a configuration may grant one packet
pub const MAX_GAS_PER_PACKET_CEILING: u64 = 1_000_000_000;

/// Main host configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// Initial host params (enable switch and allow-list)
    #[serde(default)]
    pub params: HostParams,

    /// Gas metering configuration
    #[serde(default)]
    pub gas: GasConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HostConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| IcqError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| IcqError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| IcqError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(enabled) = std::env::var("ICQ_HOST_ENABLED") {
            config.params.host_enabled = enabled.parse::<bool>().map_err(|_| {
                IcqError::ConfigError(format!("Invalid ICQ_HOST_ENABLED value: '{enabled}'"))
            })?;
        }

        if let Ok(queries) = std::env::var("ICQ_ALLOW_QUERIES") {
            config.params.allow_queries = queries
                .split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(gas) = std::env::var("ICQ_MAX_GAS_PER_PACKET") {
            config.gas.max_gas_per_packet = gas.trim().parse::<u64>().map_err(|_| {
                IcqError::ConfigError(format!("Invalid ICQ_MAX_GAS_PER_PACKET value: '{gas}'"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| IcqError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| IcqError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.params.validate() {
            errors.push(e.to_string());
        }

        errors.extend(self.gas.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(IcqError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Gas metering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
    /// Gas available to a whole packet batch
    pub max_gas_per_packet: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_gas_per_packet: DEFAULT_MAX_GAS_PER_PACKET,
        }
    }
}

impl GasConfig {
    /// Validate gas configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_gas_per_packet == 0 {
            errors.push("gas.max_gas_per_packet must be greater than 0".to_string());
        } else if self.max_gas_per_packet > MAX_GAS_PER_PACKET_CEILING {
            errors.push(format!(
                "gas.max_gas_per_packet too large: {} (maximum: {MAX_GAS_PER_PACKET_CEILING})",
                self.max_gas_per_packet
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("interchain-query"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Longest accepted `app_name`; it is stamped on every host log line
    pub const MAX_APP_NAME_LEN: usize = 64;

    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.app_name.len() {
            0 => errors.push("logging.app_name cannot be empty".to_string()),
            len if len > Self::MAX_APP_NAME_LEN => errors.push(format!(
                "logging.app_name too long: {len} characters (maximum: {})",
                Self::MAX_APP_NAME_LEN
            )),
            _ if self.app_name.chars().any(char::is_whitespace) => errors.push(format!(
                "logging.app_name must not contain whitespace: '{}'",
                self.app_name
            )),
            _ => {}
        }

        if self.log_to_file {
            match self.log_file_path.as_deref().map(Path::new) {
                None => errors.push(
                    "logging.log_file_path must be specified when log_to_file is true".to_string(),
                ),
                Some(path) if path.is_dir() => errors.push(format!(
                    "logging.log_file_path points to a directory: {}",
                    path.display()
                )),
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() && !parent.exists() {
                            errors.push(format!(
                                "logging.log_file_path directory does not exist: {}",
                                parent.display()
                            ));
                        }
                    }
                }
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors.push(
                "logging must enable console or file output, or host rejections go unrecorded"
                    .to_string(),
            );
        }

        errors
    }
}

/// `tracing::Level` as a lowercase string (`"info"`), parsed case-insensitively
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&level.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Level>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {raw}")))
    }
}
