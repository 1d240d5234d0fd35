//! Audio capture and the voice-activity recording loop.
//!
//! Microphone data is captured via CPAL on a callback thread, downmixed to
//! mono, resampled to the session sample rate, and fed frame by frame to a
//! small state machine that decides when the speaker has stopped talking.

/// Full-scale magnitude of a 16-bit sample, used to normalize loudness.
pub const MAX_AMPLITUDE: f32 = 32_768.0;

mod dispatch;
mod level;
mod recorder;
mod resample;
mod vad;
mod wav;

pub use level::{level_from_bytes, level_from_samples};
pub use recorder::{Recorder, RecordingStats, SessionRecording};
pub use vad::{StopReason, VadState};
pub use wav::TempWav;
