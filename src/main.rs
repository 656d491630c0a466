//! TrimX Upload
//!
//! Command-line front end for selecting a range of a video and having a
//! remote processing service trim, rescale and re-level it.
//!
//! # Usage
//!
//! ```bash
//! trimx-upload submit --input clip.mp4 --start 00:02 --end 00:08 --gain 1.5 --max-size-mb 50
//! trimx-upload replay --input clip.mp4 --script events.json --duration 10
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use trimx_upload::app::container::{AppContainer, DefaultAppContainer};
use trimx_upload::cli::{commands, Cli, Commands};
use trimx_upload::config_initialization::{initialize_configuration_hierarchy, ConfigSource};
use trimx_upload::ports::LogLevel;
use trimx_upload::utils::logging::{LoggingConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, source) = initialize_configuration_hierarchy(&cli)?;

    let logging = LoggingSystem::new(LoggingConfig::new(LogLevel::parse(&config.log_level)?, cli.json));
    logging
        .initialize()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    logging.log_system_info();

    match &source {
        ConfigSource::File(path) => info!("Configuration loaded from {}", path.display()),
        ConfigSource::Defaults => info!("Using default configuration"),
    }

    let container = DefaultAppContainer::new(config)?;
    info!(service_url = %container.config().service_url, "Processing service");

    match cli.command {
        Commands::Submit(args) => commands::submit(&container, args).await?,
        Commands::Replay(args) => commands::replay(&container, args).await?,
    }

    Ok(())
}
