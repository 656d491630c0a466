//! Error handling module for the upload client

use thiserror::Error;

/// Terminal outcome of a job that did not produce a downloaded file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// Submit was requested without a source file
    #[error("No video file selected")]
    NoFileSelected,

    /// Another job is still submitting, polling or downloading
    #[error("A processing job is already active")]
    JobAlreadyActive,

    /// The service declined the request; the message is passed through verbatim
    #[error("{0}")]
    SubmissionRejected(String),

    /// The result never became available within the poll ceiling
    #[error("Processed video was not ready after {attempts} checks")]
    DownloadTimeout { attempts: u32 },

    /// Transport-level failure talking to the processing service
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The user cancelled the job
    #[error("Job cancelled")]
    Cancelled,
}

impl JobError {
    /// Cancellation ends a job without being a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, JobError::Cancelled)
    }
}

/// Errors reported by processing service adapters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The request never completed (connect, DNS, TLS, timeout)
    #[error("request failed: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

impl From<ServiceError> for JobError {
    fn from(err: ServiceError) -> Self {
        JobError::NetworkFailure(err.to_string())
    }
}

/// Result type alias for job operations
pub type JobResult<T> = std::result::Result<T, JobError>;
