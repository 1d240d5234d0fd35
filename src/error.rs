//! Failure kinds a dictation session can end with.
//!
//! Each kind is detected at the point of failure and reported to the caller
//! as a definite outcome; nothing is retried inside the core. Front-ends
//! decide presentation (stderr message, exit code).

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The capture device could not be opened or the stream died mid-session.
    DeviceUnavailable(String),
    /// Pre-flight check failed: no usable API credential.
    BackendUnavailable(String),
    /// The remote call errored, returned an error status, or produced no text.
    TranscriptionFailed(String),
    /// The session ended with zero usable frames.
    NoAudioCaptured,
}

impl SessionError {
    pub fn label(&self) -> &'static str {
        match self {
            SessionError::DeviceUnavailable(_) => "device_unavailable",
            SessionError::BackendUnavailable(_) => "backend_unavailable",
            SessionError::TranscriptionFailed(_) => "transcription_failed",
            SessionError::NoAudioCaptured => "no_audio_captured",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DeviceUnavailable(detail) => {
                write!(f, "audio capture unavailable: {detail}")
            }
            SessionError::BackendUnavailable(detail) => {
                write!(f, "transcription backend unavailable: {detail}")
            }
            SessionError::TranscriptionFailed(detail) => {
                write!(f, "transcription failed: {detail}")
            }
            SessionError::NoAudioCaptured => write!(f, "no audio captured"),
        }
    }
}

impl Error for SessionError {}
