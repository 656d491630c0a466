// Tracing log adapter - Structured logging using tracing crate

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::ports::*;

/// Tracing log adapter
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    /// Forwards to whatever subscriber the binary installed
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn render_context(event: &LogEvent) -> String {
        event
            .context
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        if self.should_log(LogLevel::Info) {
            info!("{}", message);
        }
    }

    async fn warn(&self, message: &str) {
        if self.should_log(LogLevel::Warn) {
            warn!("{}", message);
        }
    }

    async fn error(&self, message: &str) {
        if self.should_log(LogLevel::Error) {
            error!("{}", message);
        }
    }

    async fn debug(&self, message: &str) {
        if self.should_log(LogLevel::Debug) {
            debug!("{}", message);
        }
    }

    async fn log_event(&self, event: &LogEvent) {
        if !self.should_log(event.level) {
            return;
        }

        let context = Self::render_context(event);
        match event.level {
            LogLevel::Error => tracing::error!(message = %event.message, context = %context),
            LogLevel::Warn => tracing::warn!(message = %event.message, context = %context),
            LogLevel::Info => tracing::info!(message = %event.message, context = %context),
            LogLevel::Debug => tracing::debug!(message = %event.message, context = %context),
            LogLevel::Trace => tracing::trace!(message = %event.message, context = %context),
        }
    }
}
