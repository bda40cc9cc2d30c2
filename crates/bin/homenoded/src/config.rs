//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homenode.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Management HTTP server settings.
    pub server: ServerConfig,
    /// Poll scheduling settings.
    pub schedule: ScheduleConfig,
    /// Telemetry delivery settings.
    pub telemetry: TelemetryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Management HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Poll scheduling configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Poll period, in whole seconds, shared by all nodes.
    pub period_secs: u64,
}

/// Telemetry delivery configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Whether the thermostat forwards samples to the collector.
    pub enabled: bool,
    /// Base URL of the telemetry collector.
    pub url: String,
    /// Samples per delivered batch.
    pub batch_size: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homenode.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homenode.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMENODE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("HOMENODE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("HOMENODE_PERIOD_SECS") {
            if let Ok(period) = val.parse() {
                self.schedule.period_secs = period;
            }
        }
        if let Ok(val) = std::env::var("HOMENODE_TELEMETRY_URL") {
            self.telemetry.enabled = true;
            self.telemetry.url = val;
        }
        if let Ok(val) = std::env::var("HOMENODE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.schedule.period_secs == 0 {
            return Err(ConfigError::Validation(
                "poll period must be non-zero".to_string(),
            ));
        }
        if self.telemetry.enabled && self.telemetry.batch_size == 0 {
            return Err(ConfigError::Validation(
                "telemetry batch size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { period_secs: 1 }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://127.0.0.1:8000".to_string(),
            batch_size: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homenoded=info,homenode=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
