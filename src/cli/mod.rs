//! CLI module for TrimX Upload
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ExportArgs, ReplayArgs, SubmitArgs};

/// TrimX Upload
///
/// Select a range of a video and have the processing service trim,
/// rescale and re-level it.
#[derive(Parser, Debug)]
#[command(name = "trimx-upload")]
#[command(about = "TrimX Upload - trim videos on a remote processing service")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: trimx_config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the processing service
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a range of a video and download the processed result
    Submit(SubmitArgs),
    /// Replay an input event script against an editing session
    Replay(ReplayArgs),
}
