// Job submission client - upload, poll until ready, download

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapters::toml_config::{ClientConfig, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};
use crate::domain::model::*;
use crate::domain::selection::SelectionModel;
use crate::error::{JobError, JobResult, ServiceError};
use crate::ports::*;

/// How often and how long to wait for the processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl From<&ClientConfig> for PollPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts.max(1),
        }
    }
}

struct ActiveSlot {
    job: UploadJob,
    cancel: CancellationToken,
}

struct ClientState {
    active: Option<ActiveSlot>,
    last: JobState,
    last_job: Option<UploadJob>,
}

impl ClientState {
    /// Free the slot and remember how its job ended
    fn retire(&mut self, final_state: JobState) {
        if let Some(mut slot) = self.active.take() {
            slot.job.state = final_state.clone();
            self.last = final_state;
            self.last_job = Some(slot.job);
        }
    }
}

/// Drives one job at a time against the processing service.
///
/// State lives behind a plain mutex that is never held across an await;
/// every commit re-checks that the job still owns the slot, so a cancelled
/// or superseded run can never write over a newer job.
pub struct JobSubmissionClient {
    service: Arc<dyn ProcessingServicePort>,
    log_port: Arc<dyn LogPort>,
    policy: PollPolicy,
    state: Mutex<ClientState>,
    next_id: AtomicU64,
}

impl JobSubmissionClient {
    pub fn new(
        service: Arc<dyn ProcessingServicePort>,
        log_port: Arc<dyn LogPort>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            service,
            log_port,
            policy,
            state: Mutex::new(ClientState {
                active: None,
                last: JobState::Idle,
                last_job: None,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// State of the active job, or the outcome of the last one
    pub fn state(&self) -> JobState {
        let state = self.lock();
        match &state.active {
            Some(slot) => slot.job.state.clone(),
            None => state.last.clone(),
        }
    }

    /// Snapshot of the active job, or of the last finished one
    pub fn active_job(&self) -> Option<UploadJob> {
        let state = self.lock();
        match &state.active {
            Some(slot) => Some(slot.job.clone()),
            None => state.last_job.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock()
            .active
            .as_ref()
            .is_some_and(|slot| slot.job.state.is_active())
    }

    /// Abort the active job. Returns false when nothing was running.
    ///
    /// The slot is released immediately; the running submission observes
    /// the token and stops issuing requests.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock();
        let Some(mut slot) = state.active.take() else {
            return false;
        };
        slot.cancel.cancel();
        slot.job.state = JobState::Cancelled;
        tracing::info!(job = %slot.job.id, "Job cancelled");
        state.last = JobState::Cancelled;
        state.last_job = Some(slot.job);
        true
    }

    /// Upload the selected range and wait for the processed result.
    ///
    /// Rejected with [`JobError::NoFileSelected`] when `file` is `None` and
    /// with [`JobError::JobAlreadyActive`] while another job holds the slot;
    /// neither touches the running job.
    pub async fn submit(
        &self,
        file: Option<SourceFile>,
        selection: &SelectionModel,
        options: ExportOptions,
    ) -> JobResult<DownloadedVideo> {
        let file = file.ok_or(JobError::NoFileSelected)?;
        let request = UploadRequest {
            file,
            range: selection.range_ms(),
            options,
        };

        let (id, token) = self.claim(&request)?;
        let _slot = SlotGuard { client: self, id };

        let outcome = self.run(id, &token, &request).await;
        // No await between the last ownership check and freeing the slot
        let outcome = self.finish(id, &token, outcome);

        match &outcome {
            Ok(video) => {
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Info, "Processed video downloaded")
                            .with("job", id)
                            .with("file", &video.filename)
                            .with("bytes", video.bytes.len()),
                    )
                    .await
            }
            Err(JobError::Cancelled) => {
                self.log_port.info(&format!("{} stopped after cancellation", id)).await
            }
            Err(err) => self.log_port.error(&format!("{} failed: {}", id, err)).await,
        }

        outcome
    }

    async fn run(
        &self,
        id: JobId,
        token: &CancellationToken,
        request: &UploadRequest,
    ) -> JobResult<DownloadedVideo> {
        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Uploading video")
                    .with("job", id)
                    .with("file", &request.file.file_name)
                    .with("bytes", request.file.len())
                    .with("start_ms", request.range.start_ms)
                    .with("end_ms", request.range.end_ms)
                    .with("volume", request.options.gain),
            )
            .await;

        let response = tokio::select! {
            _ = token.cancelled() => return Err(JobError::Cancelled),
            response = self.service.upload(request) => response?,
        };

        let filename = match response.status {
            UploadStatus::Error => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Upload rejected by the processing service".to_string());
                self.with_job(id, token, |_| ())?;
                return Err(JobError::SubmissionRejected(message));
            }
            UploadStatus::Success => response.filename.clone().ok_or_else(|| {
                JobError::from(ServiceError::Decode(
                    "upload response is missing a filename".to_string(),
                ))
            })?,
        };

        self.with_job(id, token, |job| {
            job.server_filename = Some(filename.clone());
            job.processed_video = response.processed_video.clone();
            job.state = JobState::Polling;
        })?;
        self.log_port
            .info(&format!("{} accepted as {}, polling for result", id, filename))
            .await;

        self.poll_until_ready(id, token, &filename).await?;
        self.with_job(id, token, |job| job.state = JobState::Ready)?;

        let bytes = tokio::select! {
            _ = token.cancelled() => return Err(JobError::Cancelled),
            bytes = self.service.download(&filename) => bytes?,
        };
        self.with_job(id, token, |_| ())?;

        Ok(DownloadedVideo { filename, bytes })
    }

    async fn poll_until_ready(
        &self,
        id: JobId,
        token: &CancellationToken,
        filename: &str,
    ) -> JobResult<()> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let check = tokio::select! {
                _ = token.cancelled() => return Err(JobError::Cancelled),
                check = self.service.check(filename) => check,
            };
            self.with_job(id, token, |job| job.attempts = attempt)?;

            match check {
                Ok(CheckResponse { exists: true }) => {
                    self.log_port
                        .debug(&format!("{} ready after {} checks", id, attempt))
                        .await;
                    return Ok(());
                }
                Ok(_) => {
                    tracing::trace!(job = %id, attempt, "Result not ready yet");
                }
                // A failed check counts as an attempt; the ceiling still bounds the loop
                Err(err) => {
                    self.log_port
                        .warn(&format!("{} check {} failed: {}", id, attempt, err))
                        .await;
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = token.cancelled() => return Err(JobError::Cancelled),
                    _ = tokio::time::sleep(self.policy.interval) => {}
                }
            }
        }

        Err(JobError::DownloadTimeout {
            attempts: max_attempts,
        })
    }

    fn claim(&self, request: &UploadRequest) -> JobResult<(JobId, CancellationToken)> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(JobError::JobAlreadyActive);
        }

        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        state.active = Some(ActiveSlot {
            job: UploadJob::new(id, request),
            cancel: token.clone(),
        });
        Ok((id, token))
    }

    /// Apply `update` if `id` still owns the slot
    fn with_job<R>(
        &self,
        id: JobId,
        token: &CancellationToken,
        update: impl FnOnce(&mut UploadJob) -> R,
    ) -> JobResult<R> {
        let mut state = self.lock();
        match state.active.as_mut() {
            Some(slot) if slot.job.id == id && !token.is_cancelled() => Ok(update(&mut slot.job)),
            _ => Err(JobError::Cancelled),
        }
    }

    /// Record the outcome if `id` still owns the slot; a lost slot means cancelled
    fn finish(
        &self,
        id: JobId,
        token: &CancellationToken,
        outcome: JobResult<DownloadedVideo>,
    ) -> JobResult<DownloadedVideo> {
        let mut state = self.lock();
        let owned = matches!(&state.active, Some(slot) if slot.job.id == id);
        if !owned || token.is_cancelled() {
            return Err(JobError::Cancelled);
        }

        let final_state = match &outcome {
            Ok(_) => JobState::Downloaded,
            Err(err) if err.is_cancellation() => JobState::Cancelled,
            Err(err) => JobState::Failed(err.clone()),
        };
        state.retire(final_state);
        outcome
    }

    fn release(&self, id: JobId, final_state: JobState) {
        let mut state = self.lock();
        if !matches!(&state.active, Some(slot) if slot.job.id == id) {
            return;
        }
        state.retire(final_state);
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Frees the slot if the submit future is dropped mid-flight
struct SlotGuard<'a> {
    client: &'a JobSubmissionClient,
    id: JobId,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.client.release(self.id, JobState::Cancelled);
    }
}
