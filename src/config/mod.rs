//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the FACEIT Data API key.
pub const API_KEY_ENV: &str = "FACEIT_API_KEY";

/// Largest accepted `tracker.hour_offset`, either direction.
pub const MAX_HOUR_OFFSET: i64 = 24;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// FACEIT Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceitConfig {
    /// Base URL for the Data API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Overridden by `FACEIT_API_KEY` when set.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Game identifier used in stats and history paths
    #[serde(default = "default_game")]
    pub game: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://open.faceit.com/data/v4".to_string()
}

fn default_game() -> String {
    "cs2".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for FaceitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            game: default_game(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// How the window aggregator picks its divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Divide by the requested window size even when fewer matches came back.
    #[default]
    RequestedSize,
    /// Divide by the number of matches actually returned.
    ActualCount,
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window size used when the caller does not pick one
    #[serde(default = "default_window")]
    pub default_window: u32,

    /// Page size for the full-history scan
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u32,

    /// Maximum number of history pages before the scan aborts
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default)]
    pub denominator: DenominatorPolicy,

    /// Deadline for a whole engine operation, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_window() -> u32 {
    20
}

fn default_history_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    200
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_window: default_window(),
            history_page_size: default_history_page_size(),
            max_pages: default_max_pages(),
            denominator: DenominatorPolicy::default(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// The player whose monthly wins are tracked against a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// FACEIT player id (not nickname)
    #[serde(default)]
    pub player_id: String,

    /// Name used in the pace message
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Start of the tracked period, epoch seconds
    #[serde(default = "default_since")]
    pub since_timestamp: i64,

    /// Total wins targeted by the end of the month
    #[serde(default = "default_goal_wins")]
    pub goal_wins: u32,

    /// Hours added to "now" before counting remaining days
    #[serde(default = "default_hour_offset")]
    pub hour_offset: i64,
}

fn default_display_name() -> String {
    "Rui".to_string()
}

fn default_since() -> i64 {
    // 2024-08-01T00:00:00Z
    1_722_470_400
}

fn default_goal_wins() -> u32 {
    100
}

fn default_hour_offset() -> i64 {
    1
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            player_id: String::new(),
            display_name: default_display_name(),
            since_timestamp: default_since(),
            goal_wins: default_goal_wins(),
            hour_offset: default_hour_offset(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub faceit: FaceitConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            faceit: FaceitConfig::default(),
            engine: EngineConfig::default(),
            tracker: TrackerConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Pull secrets from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.faceit.api_key = key;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.faceit.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "FACEIT timeout must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.faceit.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "FACEIT base_url is not a valid URL: {}",
                self.faceit.base_url
            )));
        }

        if self.engine.default_window == 0 {
            return Err(ConfigError::ValidationError(
                "Default window must be greater than 0".to_string(),
            ));
        }

        if self.engine.history_page_size == 0 || self.engine.max_pages == 0 {
            return Err(ConfigError::ValidationError(
                "History page size and max pages must be greater than 0".to_string(),
            ));
        }

        if self.engine.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if !(-MAX_HOUR_OFFSET..=MAX_HOUR_OFFSET).contains(&self.tracker.hour_offset) {
            return Err(ConfigError::ValidationError(format!(
                "Tracker hour_offset must be within +/-{} hours, got {}",
                MAX_HOUR_OFFSET, self.tracker.hour_offset
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.faceit.game, "cs2");
        assert_eq!(config.engine.default_window, 20);
        assert_eq!(config.engine.history_page_size, 100);
        assert_eq!(config.engine.denominator, DenominatorPolicy::RequestedSize);
        assert_eq!(config.tracker.hour_offset, 1);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.faceit.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_window() {
        let mut config = AppConfig::default();
        config.engine.default_window = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.faceit.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_hour_offset_range() {
        let mut config = AppConfig::default();

        config.tracker.hour_offset = -MAX_HOUR_OFFSET;
        assert!(config.validate().is_ok());
        config.tracker.hour_offset = MAX_HOUR_OFFSET;
        assert!(config.validate().is_ok());

        config.tracker.hour_offset = MAX_HOUR_OFFSET + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
        config.tracker.hour_offset = i64::MAX / 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[engine]
default_window = 10
denominator = "actual_count"

[tracker]
player_id = "abc-123"
goal_wins = 150
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.engine.default_window, 10);
        assert_eq!(config.engine.denominator, DenominatorPolicy::ActualCount);
        assert_eq!(config.engine.max_pages, 200);
        assert_eq!(config.tracker.player_id, "abc-123");
        assert_eq!(config.tracker.goal_wins, 150);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_serialization_hides_api_key() {
        let mut config = AppConfig::default();
        config.faceit.api_key = "secret".to_string();
        let toml_str = toml::to_string(&config).unwrap();

        assert!(!toml_str.contains("secret"));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine.default_window, config.engine.default_window);
        assert!(parsed.faceit.api_key.is_empty());
    }
}
