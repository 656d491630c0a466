// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::model::{CheckResponse, UploadRequest, UploadResponse};
use crate::error::ServiceError;

/// Port for the native media-playback primitive.
///
/// Owned by the editing session and driven from its event thread only.
pub trait PlaybackPort: Send {
    /// Media duration once metadata is known
    fn duration(&self) -> Option<f64>;

    /// Last position reported by the primitive
    fn current_time(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, time: f64);

    fn set_volume(&mut self, volume: f64);
}

/// Port for the remote processing service
#[async_trait]
pub trait ProcessingServicePort: Send + Sync {
    /// `POST /upload`
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, ServiceError>;

    /// `GET /check/{filename}`
    async fn check(&self, filename: &str) -> Result<CheckResponse, ServiceError>;

    /// `GET /download/{filename}`
    async fn download(&self, filename: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    async fn info(&self, message: &str);

    async fn warn(&self, message: &str);

    async fn error(&self, message: &str);

    async fn debug(&self, message: &str);

    /// Log structured event
    async fn log_event(&self, event: &LogEvent);
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: Vec<(&'static str, String)>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
