// Domain models - Core types and data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::mixer::{clamp_export_gain, DEFAULT_EXPORT_GAIN};
use crate::error::JobError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse `123.45`, `MM:SS.ms` or `HH:MM:SS.ms`
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(DomainError::BadArgs(format!(
                    "Time must be a non-negative number: {}",
                    trimmed
                )));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => (0, parse_component(m, "minutes")?, parse_seconds(s)?),
            [h, m, s] => {
                let minutes = parse_component(m, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                (parse_component(h, "hours")?, minutes, parse_seconds(s)?)
            }
            _ => {
                return Err(DomainError::BadArgs(format!(
                    "Invalid time format '{}'. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                    trimmed
                )))
            }
        };

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
        ))
    }

    /// Format as H:MM:SS.mmm or M:SS.mmm
    pub fn format_hms(&self) -> String {
        let total_ms = (self.seconds.max(0.0) * 1000.0).floor() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let millis = total_ms % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, millis)
        }
    }
}

fn parse_component(value: &str, name: &str) -> Result<u32, DomainError> {
    value
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format: {}", name, value)))
}

fn parse_seconds(value: &str) -> Result<f64, DomainError> {
    let seconds = value
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid seconds format: {}", value)))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Trim range in whole milliseconds, as the processing service expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRangeMs {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TrimRangeMs {
    /// Truncates both bounds (floor, never round)
    pub fn from_seconds(start: f64, end: f64) -> Self {
        Self {
            start_ms: seconds_to_millis_floor(start),
            end_ms: seconds_to_millis_floor(end),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Convert seconds to whole milliseconds, flooring and saturating at zero
pub fn seconds_to_millis_floor(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).floor() as u64
}

/// Output resolution presets offered by the export form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPreset {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    FullHd1080,
    #[serde(rename = "480p")]
    Sd480,
}

impl ResolutionPreset {
    pub const ALL: [ResolutionPreset; 3] = [
        ResolutionPreset::Hd720,
        ResolutionPreset::FullHd1080,
        ResolutionPreset::Sd480,
    ];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionPreset::Hd720 => (1280, 720),
            ResolutionPreset::FullHd1080 => (1920, 1080),
            ResolutionPreset::Sd480 => (854, 480),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResolutionPreset::Hd720 => "720p",
            ResolutionPreset::FullHd1080 => "1080p",
            ResolutionPreset::Sd480 => "480p",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(label))
    }
}

/// Target frame size for the exported video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Custom resolution; both sides must be positive
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadArgs(
                "Resolution width and height must be positive".to_string(),
            ));
        }
        Ok(Self { width, height })
    }

    pub fn from_preset(preset: ResolutionPreset) -> Self {
        let (width, height) = preset.dimensions();
        Self { width, height }
    }

    /// Accepts a preset label (`720p`) or `<width>x<height>`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if let Some(preset) = ResolutionPreset::parse(value) {
            return Ok(Self::from_preset(preset));
        }

        let (width, height) = value
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Invalid resolution '{}'. Use 720p, 1080p, 480p or WIDTHxHEIGHT",
                    value
                ))
            })?;
        let width = width
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid resolution width: {}", width)))?;
        let height = height
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid resolution height: {}", height)))?;

        Self::new(width, height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Upper bound for the exported file size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLimit {
    pub max_megabytes: f64,
}

impl SizeLimit {
    pub fn new(max_megabytes: f64) -> Result<Self, DomainError> {
        if !max_megabytes.is_finite() || max_megabytes <= 0.0 {
            return Err(DomainError::OutOfRange(format!(
                "Maximum size must be a positive number of megabytes, got {}",
                max_megabytes
            )));
        }
        Ok(Self { max_megabytes })
    }
}

/// Export settings sent alongside the trim range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Audio multiplier applied only to the exported file
    pub gain: f64,
    pub size_limit: Option<SizeLimit>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<u32>,
    pub bitrate_kbps: Option<u32>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            gain: DEFAULT_EXPORT_GAIN,
            size_limit: None,
            resolution: None,
            frame_rate: None,
            bitrate_kbps: None,
        }
    }
}

impl ExportOptions {
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = clamp_export_gain(gain, self.gain);
        self
    }

    pub fn with_size_limit(mut self, limit: SizeLimit) -> Self {
        self.size_limit = Some(limit);
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_frame_rate(mut self, fps: u32) -> Result<Self, DomainError> {
        if fps == 0 {
            return Err(DomainError::OutOfRange("Frame rate must be greater than 0".to_string()));
        }
        self.frame_rate = Some(fps);
        Ok(self)
    }

    pub fn with_bitrate_kbps(mut self, kbps: u32) -> Result<Self, DomainError> {
        if kbps == 0 {
            return Err(DomainError::OutOfRange("Bitrate must be greater than 0".to_string()));
        }
        self.bitrate_kbps = Some(kbps);
        Ok(self)
    }
}

/// Video selected by the user, held in memory until submission
#[derive(Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the processing service receives for one job
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file: SourceFile,
    pub range: TrimRangeMs,
    pub options: ExportOptions,
}

impl UploadRequest {
    /// Text parts of the multipart body, in submission order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("startTime", self.range.start_ms.to_string()),
            ("endTime", self.range.end_ms.to_string()),
            ("volume", self.options.gain.to_string()),
        ];

        if let Some(limit) = &self.options.size_limit {
            fields.push(("maxSizeMb", limit.max_megabytes.to_string()));
        }
        if let Some(resolution) = &self.options.resolution {
            fields.push(("resolution", resolution.to_string()));
        }
        if let Some(fps) = self.options.frame_rate {
            fields.push(("fps", fps.to_string()));
        }
        if let Some(kbps) = self.options.bitrate_kbps {
            fields.push(("bitrate", kbps.to_string()));
        }

        fields
    }
}

/// `status` field of the upload response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Body returned by `POST /upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: UploadStatus,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub processed_video: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn success(filename: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Success,
            filename: Some(filename.into()),
            processed_video: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Error,
            filename: None,
            processed_video: None,
            message: Some(message.into()),
        }
    }
}

/// Body returned by `GET /check/{filename}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub exists: bool,
}

/// Lifecycle of an upload job
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Idle,
    Submitting,
    Polling,
    Ready,
    Downloaded,
    Failed(JobError),
    Cancelled,
}

impl JobState {
    /// Submitting, polling and downloading occupy the single job slot
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Submitting | JobState::Polling | JobState::Ready)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Downloaded | JobState::Failed(_) | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::Submitting => write!(f, "submitting"),
            JobState::Polling => write!(f, "polling"),
            JobState::Ready => write!(f, "ready"),
            JobState::Downloaded => write!(f, "downloaded"),
            JobState::Failed(reason) => write!(f, "failed: {}", reason),
            JobState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Client-local job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// The single live job tracked by the submission client
#[derive(Debug, Clone, PartialEq)]
pub struct UploadJob {
    pub id: JobId,
    pub source_name: String,
    pub source_len: usize,
    pub range_ms: TrimRangeMs,
    pub options: ExportOptions,
    pub server_filename: Option<String>,
    pub processed_video: Option<String>,
    pub attempts: u32,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
}

impl UploadJob {
    pub fn new(id: JobId, request: &UploadRequest) -> Self {
        Self {
            id,
            source_name: request.file.file_name.clone(),
            source_len: request.file.len(),
            range_ms: request.range,
            options: request.options.clone(),
            server_filename: None,
            processed_video: None,
            attempts: 0,
            state: JobState::Submitting,
            created_at: Utc::now(),
        }
    }
}

/// Finished result handed back to the caller
#[derive(Clone, PartialEq)]
pub struct DownloadedVideo {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for DownloadedVideo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadedVideo")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
