//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `powerhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use powerhub_domain::consumption::DEFAULT_CAPACITY;
use powerhub_domain::settings::{DEFAULT_MAX_ENERGY, DEFAULT_PEAK_HOURS, Settings};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Initial energy settings, editable at runtime from the dashboard.
    pub energy: EnergyConfig,
    /// Dashboard presentation.
    pub dashboard: DashboardConfig,
    /// Consumption sampling.
    pub sampler: SamplerConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Cap on the total power of devices that are on, in watts.
    pub max_energy: u32,
    pub peak_hours: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page auto-refresh interval.
    pub refresh_seconds: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Delay between two chart points, in milliseconds.
    pub interval_ms: u64,
    /// Number of points kept on the chart.
    pub history: usize,
}

impl Config {
    /// Load configuration from `powerhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("powerhub.toml")?;
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
        if let Ok(val) = std::env::var("POWERHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("POWERHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("POWERHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("POWERHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("POWERHUB_MAX_ENERGY") {
            if let Ok(watts) = val.trim().parse() {
                self.energy.max_energy = watts;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.energy.max_energy == 0 {
            return Err(ConfigError::Validation(
                "energy.max_energy must be positive".to_string(),
            ));
        }
        if self.sampler.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "sampler.interval_ms must be non-zero".to_string(),
            ));
        }
        if self.sampler.history == 0 {
            return Err(ConfigError::Validation(
                "sampler.history must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings the process starts with.
    #[must_use]
    pub fn initial_settings(&self) -> Settings {
        Settings {
            max_energy: self.energy.max_energy,
            peak_hours: self.energy.peak_hours.clone(),
        }
    }

    #[must_use]
    pub fn sampler_interval(&self) -> Duration {
        Duration::from_millis(self.sampler.interval_ms)
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

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "powerhubd=info,powerhub_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: DEFAULT_MAX_ENERGY,
            peak_hours: DEFAULT_PEAK_HOURS.to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_seconds: 1 }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            history: DEFAULT_CAPACITY,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.energy.max_energy, 2000);
        assert_eq!(config.energy.peak_hours, "18:00-22:00");
        assert_eq!(config.dashboard.refresh_seconds, 1);
        assert_eq!(config.sampler_interval(), Duration::from_secs(1));
        assert_eq!(config.sampler.history, 10);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.energy.max_energy, 2000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'

            [energy]
            max_energy = 3500
            peak_hours = '17:00-21:00'

            [dashboard]
            refresh_seconds = 2

            [sampler]
            interval_ms = 500
            history = 20
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.energy.max_energy, 3500);
        assert_eq!(config.energy.peak_hours, "17:00-21:00");
        assert_eq!(config.dashboard.refresh_seconds, 2);
        assert_eq!(config.sampler_interval(), Duration::from_millis(500));
        assert_eq!(config.sampler.history, 20);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_cap() {
        let mut config = Config::default();
        config.energy.max_energy = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_sampler_interval_or_history() {
        let mut config = Config::default();
        config.sampler.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sampler.history = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_build_initial_settings_from_energy_section() {
        let toml = "
            [energy]
            max_energy = 1200
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let settings = config.initial_settings();
        assert_eq!(settings.max_energy, 1200);
        assert_eq!(settings.peak_hours, "18:00-22:00");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
