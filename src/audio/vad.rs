//! The stop-decision state machine for one recording session.
//!
//! Evaluated once per incoming frame against the session clock. The machine
//! only ever moves forward: once a stop reason is produced the session is
//! over and no later frame can revive it.

use crate::config::SessionConfig;
use std::time::Duration;

/// Why a recording session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The speaker went quiet for the configured silence duration.
    Silence { tail: Duration },
    /// A fixed `--time` deadline elapsed.
    TimeLimit,
    /// Explicit user action (Enter, signal, caller request).
    ManualStop,
    /// The capture stream disconnected under us.
    StreamClosed,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::Silence { .. } => "silence",
            StopReason::TimeLimit => "time_limit",
            StopReason::ManualStop => "manual_stop",
            StopReason::StreamClosed => "stream_closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing above the threshold has been heard yet. Silence in this phase
    /// never starts the stop timer, so a session in a quiet room runs until
    /// a manual stop or deadline.
    WaitingForSpeech,
    InSpeech,
    /// A previously-speaking session dropped below the threshold at `since`
    /// (measured from session start).
    InSilence { since: Duration },
}

/// Per-frame voice activity tracker.
///
/// Loudness at or above the threshold counts as speech. The machine is
/// disabled entirely for the first `min_recording_time` of the session and
/// when `vad_enabled` is off, leaving only manual stops and the time limit.
#[derive(Debug, Clone)]
pub struct VadState {
    enabled: bool,
    threshold: f32,
    silence_duration: Duration,
    min_recording_time: Duration,
    phase: Phase,
}

impl VadState {
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self {
            enabled: cfg.vad_enabled,
            threshold: cfg.silence_threshold,
            silence_duration: cfg.silence_duration,
            min_recording_time: cfg.min_recording_time,
            phase: Phase::WaitingForSpeech,
        }
    }

    /// Feed one frame's loudness, measured `elapsed` after session start.
    /// Returns a stop reason once enough trailing silence has accumulated.
    pub fn on_frame(&mut self, level: f32, elapsed: Duration) -> Option<StopReason> {
        if !self.enabled || elapsed < self.min_recording_time {
            return None;
        }

        if level >= self.threshold {
            self.phase = Phase::InSpeech;
            return None;
        }

        match self.phase {
            Phase::WaitingForSpeech => None,
            Phase::InSpeech => {
                self.phase = Phase::InSilence { since: elapsed };
                None
            }
            Phase::InSilence { since } => {
                let tail = elapsed.saturating_sub(since);
                (tail >= self.silence_duration).then_some(StopReason::Silence { tail })
            }
        }
    }

    /// True while the most recent classified frame was speech.
    pub fn in_speech(&self) -> bool {
        self.phase == Phase::InSpeech
    }
}
