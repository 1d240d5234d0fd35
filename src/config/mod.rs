//! Command-line parsing and the layered configuration snapshot.
//!
//! Configuration is resolved exactly once at startup: config file, then CLI
//! overrides, then credential fallback (env var, dotfile). The controller
//! receives an immutable [`SessionConfig`] and never consults ambient state.

mod file;
#[cfg(test)]
mod tests;
mod validation;

pub use file::{default_config_path, FileConfig};

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// CLI options shared by every front-end style (silent, headless, verbose).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "dictate",
    about = "Record speech, stop on silence, transcribe via a speech API",
    version
)]
pub struct AppConfig {
    /// Output only the transcribed text (no diagnostics)
    #[arg(long, default_value_t = false)]
    pub silent: bool,

    /// Enable debug logging
    #[arg(long, env = "DICTATE_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Silence threshold (0.0-1.0)
    #[arg(long = "threshold", value_name = "LEVEL")]
    pub threshold: Option<f32>,

    /// Trailing silence required before stopping (seconds)
    #[arg(long = "duration", value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Minimum recording time before silence detection starts (seconds)
    #[arg(long = "min-recording-time", value_name = "SECONDS")]
    pub min_recording_time: Option<f32>,

    /// Record for a fixed number of seconds; implies no silence detection
    #[arg(long = "time", value_name = "SECONDS")]
    pub time: Option<f32>,

    /// Disable voice activity detection entirely
    #[arg(long = "no-vad", default_value_t = false)]
    pub no_vad: bool,

    /// Write the transcription to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Append a trailing newline to the transcription
    #[arg(long, default_value_t = false)]
    pub newline: bool,

    /// Path to the configuration file (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dotfile consulted for OPENAI_API_KEY when config and environment
    /// provide none
    #[arg(long = "env-file", value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Preferred audio input device name
    #[arg(long = "input-device", value_name = "NAME")]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Capture sample rate (Hz)
    #[arg(long = "sample-rate", value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Loudness gain applied before threshold comparison
    #[arg(long = "level-gain", value_name = "FACTOR")]
    pub level_gain: Option<f32>,
}

/// Immutable per-session snapshot consumed by the recording controller.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub sample_rate: u32,
    pub chunk_size: usize,
    pub input_device: Option<String>,
    pub vad_enabled: bool,
    pub silence_threshold: f32,
    pub silence_duration: Duration,
    pub min_recording_time: Duration,
    pub time_limit: Option<Duration>,
    pub level_gain: f32,
}

/// Transcription backend settings with the credential already resolved.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_key: String,
    pub model: String,
    pub language: String,
    pub temperature: f32,
    pub endpoint: String,
}

/// Where the transcript goes once the session succeeds.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub output: Option<PathBuf>,
    pub newline: bool,
}

/// Everything `resolve()` produces; the only configuration object the rest
/// of the program sees.
#[derive(Debug, Clone)]
pub struct Settings {
    pub session: SessionConfig,
    pub backend: BackendConfig,
    pub delivery: DeliveryConfig,
}
