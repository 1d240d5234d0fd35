//! Speech-to-text backend seam.
//!
//! The core depends only on this contract: a pre-flight availability check
//! and a path-in/text-out call. Retry policy, if a backend ever wants one,
//! lives behind the trait, not in the session layer.

mod whisper_api;

pub use whisper_api::WhisperApiBackend;

use anyhow::Result;
use std::path::Path;

pub trait SttBackend: Send {
    fn name(&self) -> &'static str;

    /// Cheap pre-flight: is this backend usable at all (credential present)?
    fn is_available(&self) -> bool;

    /// Transcribe a finished audio file. Errors cover network failures and
    /// remote error responses; an empty string is a valid return here and is
    /// judged by the caller.
    fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
