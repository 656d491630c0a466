//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::adapters::toml_config::{ClientConfig, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::cli::Cli;

/// Where the resolved configuration came from, for the startup log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<(ClientConfig, ConfigSource)> {
    let (mut config, source) = load_config_file(cli.config.as_deref())?;
    apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    apply_cli_overrides(&mut config, cli);

    config.validate()?;
    Ok((config, source))
}

/// An explicit `--config` must exist; the default file is optional
fn load_config_file(explicit: Option<&Path>) -> Result<(ClientConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = TomlConfigAdapter::load(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        let config = TomlConfigAdapter::load(default_path)?;
        return Ok((config, ConfigSource::File(default_path.to_path_buf())));
    }

    Ok((ClientConfig::default(), ConfigSource::Defaults))
}

/// Apply `TRIMX_*` variables; `lookup` abstracts the process environment
pub fn apply_environment_overrides(
    config: &mut ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("TRIMX_SERVICE_URL") {
        config.service_url = value;
    }
    if let Some(value) = lookup("TRIMX_POLL_INTERVAL_MS") {
        config.poll_interval_ms = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid TRIMX_POLL_INTERVAL_MS: {}", value))?;
    }
    if let Some(value) = lookup("TRIMX_MAX_POLL_ATTEMPTS") {
        config.max_poll_attempts = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid TRIMX_MAX_POLL_ATTEMPTS: {}", value))?;
    }
    if let Some(value) = lookup("TRIMX_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid TRIMX_REQUEST_TIMEOUT_SECS: {}", value))?;
    }
    if let Some(value) = lookup("TRIMX_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(value);
    }
    if let Some(value) = lookup("TRIMX_LOG_LEVEL") {
        config.log_level = value;
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut ClientConfig, cli: &Cli) {
    if let Some(url) = &cli.service_url {
        config.service_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
}
