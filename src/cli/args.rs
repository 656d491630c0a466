//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::errors::DomainError;
use crate::domain::model::{ExportOptions, Resolution, SizeLimit};

/// Export settings shared by `submit` and `replay --submit`
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Audio gain applied to the exported file (0.0-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub gain: f64,

    /// Upper bound for the processed file size in megabytes
    #[arg(long)]
    pub max_size_mb: Option<f64>,

    /// Output resolution (720p, 1080p, 480p or WIDTHxHEIGHT)
    #[arg(long)]
    pub resolution: Option<String>,

    /// Output frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Output video bitrate in kbps
    #[arg(long)]
    pub bitrate: Option<u32>,

    /// Where to save the processed video (default: service file name in the output dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn to_options(&self) -> Result<ExportOptions, DomainError> {
        let mut options = ExportOptions::default().with_gain(self.gain);

        if let Some(megabytes) = self.max_size_mb {
            options = options.with_size_limit(SizeLimit::new(megabytes)?);
        }
        if let Some(resolution) = &self.resolution {
            options = options.with_resolution(Resolution::parse(resolution)?);
        }
        if let Some(fps) = self.fps {
            options = options.with_frame_rate(fps)?;
        }
        if let Some(kbps) = self.bitrate {
            options = options.with_bitrate_kbps(kbps)?;
        }

        Ok(options)
    }
}

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(short, long)]
    pub start: String,

    /// End time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(short, long)]
    pub end: String,

    /// Media duration, if the range should be clamped to it
    #[arg(long)]
    pub duration: Option<String>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON array of input events, media events and `{"advance": seconds}` steps
    #[arg(long)]
    pub script: PathBuf,

    /// Duration reported by the simulated player
    #[arg(long)]
    pub duration: String,

    /// Submit the resulting selection when the script ends
    #[arg(long)]
    pub submit: bool,

    #[command(flatten)]
    pub export: ExportArgs,
}
