//! Logging configuration and subscriber setup

use tracing_subscriber::EnvFilter;

use crate::ports::LogLevel;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include target module information
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            target: false,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: LogLevel, json: bool) -> Self {
        Self {
            level,
            format: if json { LogFormat::Json } else { LogFormat::Compact },
            ..Self::default()
        }
    }

    /// `RUST_LOG` wins when set; otherwise the configured level applies to this crate
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("trimx_upload={}", self.level.as_str())))
    }
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Install the global subscriber. Logs go to stderr so stdout stays
    /// free for command output.
    pub fn initialize(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.config.env_filter())
            .with_target(self.config.target)
            .with_writer(std::io::stderr);

        match self.config.format {
            LogFormat::Json => builder.json().try_init()?,
            LogFormat::Compact => builder.compact().try_init()?,
        }

        tracing::debug!(level = self.config.level.as_str(), format = ?self.config.format, "Logging initialized");
        Ok(())
    }

    pub fn log_system_info(&self) {
        tracing::info!("=== TrimX Upload Client ===");
        tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
        tracing::debug!("Logging level: {:?}", self.config.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_selects_format() {
        assert_eq!(LoggingConfig::new(LogLevel::Debug, true).format, LogFormat::Json);
        assert_eq!(LoggingConfig::new(LogLevel::Debug, false).format, LogFormat::Compact);
    }
}
