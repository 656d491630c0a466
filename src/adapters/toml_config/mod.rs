// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::ports::LogLevel;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:9000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONFIG_FILE: &str = "trimx_config.toml";

/// Client settings, read from the `[trimx]` table of a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub service_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://")) {
            return Err(DomainError::ConfigFail(format!(
                "service_url must be an http(s) URL, got '{}'",
                self.service_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(DomainError::ConfigFail(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_poll_attempts == 0 {
            return Err(DomainError::ConfigFail(
                "max_poll_attempts must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DomainError::ConfigFail(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        LogLevel::parse(&self.log_level)?;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    trimx: ClientConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document; a missing `[trimx]` table yields defaults
    pub fn parse(toml_content: &str) -> Result<ClientConfig, DomainError> {
        let file: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.trimx)
    }

    pub fn load(path: &Path) -> Result<ClientConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn save(config: &ClientConfig, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(&ConfigFile {
            trimx: config.clone(),
        })
        .map_err(|e| DomainError::ConfigFail(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::FsFail(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.max_poll_attempts, 200);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [trimx]
            service_url = "https://media.example.com"
            max_poll_attempts = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.service_url, "https://media.example.com");
        assert_eq!(config.max_poll_attempts, 50);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_missing_table_is_default() {
        assert_eq!(TomlConfigAdapter::parse("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(TomlConfigAdapter::parse("[trimx]\npoll_interval_ms = \"fast\"").is_err());

        let config = ClientConfig {
            max_poll_attempts: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(DomainError::ConfigFail(_))));

        let config = ClientConfig {
            service_url: "ftp://host".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            log_level: "loud".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trimx_config.toml");
        let config = ClientConfig {
            poll_interval_ms: 250,
            ..ClientConfig::default()
        };

        TomlConfigAdapter::save(&config, &path).unwrap();
        assert_eq!(TomlConfigAdapter::load(&path).unwrap(), config);
    }
}
