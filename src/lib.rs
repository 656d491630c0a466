//! TrimX Upload Library
//!
//! Interactive trim session (playback clock, selection, gestures, audio
//! mixing) and a client that submits the selected range to a remote video
//! processing service, polls until the result is ready and downloads it.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{EditorSession, JobSubmissionClient, MediaEvent, PollPolicy, SessionEvent};
pub use domain::errors::DomainError;
pub use domain::model::{
    DownloadedVideo, ExportOptions, JobState, Resolution, SizeLimit, SourceFile, UploadJob,
};
pub use domain::selection::SelectionModel;
pub use error::{JobError, JobResult, ServiceError};
