//! Background worker that drives one record-then-transcribe session.
//!
//! The front-end stays responsive: a worker thread owns the recording loop
//! and the blocking HTTP call, and reports exactly one message back over a
//! one-shot channel. Stopping is a flag the worker checks between frames, so
//! a manual stop racing a silence stop cannot double-fire.

use crate::audio::{Recorder, RecordingStats, TempWav};
use crate::backend::SttBackend;
use crate::config::SessionConfig;
use crate::error::SessionError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use tracing::debug;

/// The single message a session worker sends back.
#[derive(Debug)]
pub enum SessionMessage {
    Transcript {
        text: String,
        stats: RecordingStats,
    },
    Failed {
        error: SessionError,
        stats: Option<RecordingStats>,
    },
}

/// Handle the front-end uses to wait for the result or stop early.
pub struct SessionJob {
    pub receiver: mpsc::Receiver<SessionMessage>,
    pub handle: Option<thread::JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

impl SessionJob {
    /// Request a manual stop. Idempotent: the flag only ever goes true once,
    /// and the worker acts on it at most once.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Clone of the stop flag for watcher threads (stdin, signals).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

/// Spawn the worker thread for one session.
pub fn start_session(
    recorder: Recorder,
    backend: Box<dyn SttBackend>,
    config: SessionConfig,
) -> SessionJob {
    let (tx, rx) = mpsc::sync_channel(1);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();

    let handle = thread::spawn(move || {
        let message = run_session(&recorder, backend.as_ref(), &config, stop_flag_clone);
        let _ = tx.send(message);
    });

    SessionJob {
        receiver: rx,
        handle: Some(handle),
        stop_flag,
    }
}

fn run_session(
    recorder: &Recorder,
    backend: &dyn SttBackend,
    config: &SessionConfig,
    stop_flag: Arc<AtomicBool>,
) -> SessionMessage {
    if !backend.is_available() {
        return SessionMessage::Failed {
            error: SessionError::BackendUnavailable(format!(
                "{} has no API credential configured",
                backend.name()
            )),
            stats: None,
        };
    }

    let recording = match recorder.record_session(config, stop_flag) {
        Ok(recording) => recording,
        Err(err) => {
            return SessionMessage::Failed {
                error: SessionError::DeviceUnavailable(format!("{err:#}")),
                stats: None,
            }
        }
    };
    log_session_stats(&recording.stats);

    if recording.samples.is_empty() {
        return SessionMessage::Failed {
            error: SessionError::NoAudioCaptured,
            stats: Some(recording.stats),
        };
    }

    match transcribe_recording(&recording.samples, config.sample_rate, backend) {
        Ok(text) => SessionMessage::Transcript {
            text,
            stats: recording.stats,
        },
        Err(error) => SessionMessage::Failed {
            error,
            stats: Some(recording.stats),
        },
    }
}

/// Persist the buffer to a temp WAV, upload it, and clean up. The guard
/// removes the file on every path out of this function.
fn transcribe_recording(
    samples: &[i16],
    sample_rate: u32,
    backend: &dyn SttBackend,
) -> Result<String, SessionError> {
    let wav = TempWav::write(samples, sample_rate).map_err(|err| {
        SessionError::TranscriptionFailed(format!("could not persist recording: {err:#}"))
    })?;

    let text = backend
        .transcribe(wav.path())
        .map_err(|err| SessionError::TranscriptionFailed(format!("{err:#}")))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(SessionError::TranscriptionFailed(
            "backend returned no recognizable text".to_string(),
        ));
    }
    Ok(text)
}

fn log_session_stats(stats: &RecordingStats) {
    debug!(
        "session_stats|capture_ms={}|speech_ms={}|silence_tail_ms={}|frames_processed={}|frames_dropped={}|stop={}",
        stats.capture_ms,
        stats.speech_ms,
        stats.silence_tail_ms,
        stats.frames_processed,
        stats.frames_dropped,
        stats.stop_reason.label()
    );
}
