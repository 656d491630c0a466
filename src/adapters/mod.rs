// Adapters - External system implementations

pub mod http_service;
pub mod simulated_playback;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use http_service::HttpProcessingAdapter;
pub use simulated_playback::SimulatedPlayer;
pub use toml_config::{ClientConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
