// Application layer - Editing session and job orchestration

pub mod container;
pub mod editor_session;
pub mod job_client;
pub mod playback_clock;

pub use editor_session::{EditorSession, MediaEvent, SessionEvent};
pub use job_client::{JobSubmissionClient, PollPolicy};
pub use playback_clock::{ClockSnapshot, PlaybackClock};
