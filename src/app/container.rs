use std::sync::Arc;

use crate::adapters::{ClientConfig, HttpProcessingAdapter, TracingLogAdapter};
use crate::app::job_client::{JobSubmissionClient, PollPolicy};
use crate::domain::errors::DomainError;
use crate::ports::{LogLevel, LogPort, ProcessingServicePort};

pub trait AppContainer: Send + Sync {
    fn job_client(&self) -> Arc<JobSubmissionClient>;
    fn config(&self) -> &ClientConfig;
}

pub struct DefaultAppContainer {
    config: ClientConfig,
    job_client: Arc<JobSubmissionClient>,
}

impl DefaultAppContainer {
    pub fn new(config: ClientConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let service_port = Arc::new(HttpProcessingAdapter::new(
            &config.service_url,
            config.request_timeout(),
        )
        .map_err(|e| DomainError::ConfigFail(e.to_string()))?);
        let log_port = Arc::new(TracingLogAdapter::with_min_level(LogLevel::parse(
            &config.log_level,
        )?));

        Ok(Self::with_ports(config, service_port, log_port))
    }

    /// Wire the client against arbitrary ports (tests, alternative transports)
    pub fn with_ports(
        config: ClientConfig,
        service_port: Arc<dyn ProcessingServicePort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let job_client = Arc::new(JobSubmissionClient::new(
            service_port,
            log_port,
            PollPolicy::from(&config),
        ));

        Self { config, job_client }
    }
}

impl AppContainer for DefaultAppContainer {
    fn job_client(&self) -> Arc<JobSubmissionClient> {
        Arc::clone(&self.job_client)
    }

    fn config(&self) -> &ClientConfig {
        &self.config
    }
}
