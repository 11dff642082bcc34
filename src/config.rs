//! Configuration module
//!
//! Reads `config.toml` from the platform config directory
//! (`~/.config/csms-mobile/config.toml` on Linux) or from the path in
//! `CSMS_MOBILE_CONFIG`. Every section is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::ConfigError;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CSMS_MOBILE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub refresh: RefreshConfig,
    pub errors: ErrorCodesConfig,
    pub messages: MessagesConfig,
    pub projection: ProjectionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Auto-refresh behaviour of data screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    /// Fetches running longer than this fail as a transport timeout.
    /// `0` disables the timeout.
    pub fetch_timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            fetch_timeout_secs: 30,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

/// Domain-specific HTTP status codes of the central server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorCodesConfig {
    pub object_does_not_exist: u16,
    pub unknown_identity: u16,
}

impl Default for ErrorCodesConfig {
    fn default() -> Self {
        Self {
            object_does_not_exist: 550,
            unknown_identity: 550,
        }
    }
}

/// User-facing copy; translation happens in the host app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub unexpected: String,
    pub session_expired: String,
    pub unknown_identity: String,
    pub transaction_not_exist: String,
    pub transaction_unexpected: String,
    pub site_unexpected: String,
    pub charger_unexpected: String,
    pub wrong_email: String,
    pub report_sent: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            unexpected: "An unexpected error occurred".to_string(),
            session_expired: "Your session has expired".to_string(),
            unknown_identity: "Unknown identity".to_string(),
            transaction_not_exist: "Transaction does not exist".to_string(),
            transaction_unexpected: "Unable to load the transaction".to_string(),
            site_unexpected: "Unable to load the site".to_string(),
            charger_unexpected: "Unable to load the charging station".to_string(),
            wrong_email: "Unknown email".to_string(),
            report_sent: "Your report has been sent".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Shown in place of values that cannot be derived yet
    pub placeholder: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            placeholder: "-".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// `$CSMS_MOBILE_CONFIG`, else `<config dir>/csms-mobile/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("csms-mobile")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.refresh.interval(), Duration::from_secs(10));
        assert_eq!(cfg.refresh.fetch_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_sections_override() {
        let cfg = AppConfig::from_toml(
            r#"
            [refresh]
            interval_secs = 3
            fetch_timeout_secs = 0

            [projection]
            placeholder = "--:--:--"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.refresh.interval_secs, 3);
        assert_eq!(cfg.refresh.fetch_timeout(), None);
        assert_eq!(cfg.projection.placeholder, "--:--:--");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = AppConfig::from_toml("[refresh]\ninterval_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AppConfig::load(Path::new("/nonexistent/csms-mobile.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
