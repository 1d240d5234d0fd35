//! System microphone recording via CPAL.
//!
//! Handles device enumeration and format normalization, then runs the
//! voice-activity recording loop: frames arrive from the capture callback
//! over a bounded channel, get measured, and feed the stop-decision state
//! machine until the session ends.

use super::dispatch::FrameDispatcher;
use super::level::level_from_samples;
use super::resample::{convert_frame_to_target, quantize};
use super::vad::{StopReason, VadState};
use crate::config::SessionConfig;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Frames buffered between the capture callback and the session thread.
const FRAME_CHANNEL_CAPACITY: usize = 64;

/// What one session measured about itself, logged at session end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingStats {
    pub capture_ms: u64,
    pub speech_ms: u64,
    pub silence_tail_ms: u64,
    pub frames_processed: usize,
    pub frames_dropped: usize,
    pub stop_reason: StopReason,
}

/// Mono 16-bit PCM at the session sample rate, plus session stats.
#[derive(Debug, Clone)]
pub struct SessionRecording {
    pub samples: Vec<i16>,
    pub stats: RecordingStats,
}

/// Audio input device wrapper.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Open the default input device, or a named one when the user has
    /// multiple microphones.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Run one recording session to its stop decision.
    ///
    /// Returns the accumulated mono PCM. The caller owns the stop flag; the
    /// loop checks it between frames so a manual stop lands within one frame
    /// duration. An empty `samples` vector means the session ended before any
    /// usable audio arrived.
    pub fn record_session(
        &self,
        cfg: &SessionConfig,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<SessionRecording> {
        let default_config = self
            .device
            .default_input_config()
            .context("failed to query input device configuration")?;
        let format = default_config.sample_format();
        let device_config: StreamConfig = default_config.into();
        let device_rate = device_config.sample_rate.0;
        let channels = usize::from(device_config.channels.max(1));

        let target_frame_samples = cfg.chunk_size.max(1);
        let frame_ms =
            ((target_frame_samples as u64 * 1000) / u64::from(cfg.sample_rate.max(1))).clamp(5, 200);
        let device_frame_samples = ((u64::from(device_rate) * frame_ms) / 1000).max(1) as usize;

        debug!(
            "capture config: format={format:?} device_rate={device_rate}Hz channels={channels} frame={frame_ms}ms"
        );

        let (sender, receiver) = bounded::<Vec<f32>>(FRAME_CHANNEL_CAPACITY);
        let dropped = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(Mutex::new(FrameDispatcher::new(
            device_frame_samples,
            sender,
            dropped.clone(),
        )));

        let err_fn = |err| warn!("audio stream error: {err}");
        let stream = match format {
            SampleFormat::F32 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[f32], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| sample);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[i16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| f32::from(sample) / 32_768.0);
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let dispatcher = dispatcher.clone();
                let dropped = dropped.clone();
                self.device.build_input_stream(
                    &device_config,
                    move |data: &[u16], _| {
                        if let Ok(mut pump) = dispatcher.try_lock() {
                            pump.push(data, channels, |sample| {
                                (f32::from(sample) - 32_768.0) / 32_768.0
                            });
                        } else {
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };

        stream.play().context("failed to start audio stream")?;

        let start = Instant::now();
        let mut vad = VadState::from_config(cfg);
        let mut samples: Vec<i16> = Vec::new();
        let mut frames_processed = 0usize;
        let mut speech_ms = 0u64;
        let mut silence_tail_ms = 0u64;
        let wait_time = Duration::from_millis(frame_ms);

        let stop_reason = loop {
            if stop_flag.load(Ordering::Relaxed) {
                break StopReason::ManualStop;
            }
            if let Some(limit) = cfg.time_limit {
                if start.elapsed() >= limit {
                    break StopReason::TimeLimit;
                }
            }
            match receiver.recv_timeout(wait_time) {
                Ok(frame) => {
                    let frame = convert_frame_to_target(
                        frame,
                        device_rate,
                        cfg.sample_rate,
                        target_frame_samples,
                    );
                    let frame = quantize(&frame);
                    let level = level_from_samples(&frame, cfg.level_gain);
                    let elapsed = start.elapsed();
                    frames_processed += 1;
                    if level >= cfg.silence_threshold {
                        speech_ms = speech_ms.saturating_add(frame_ms);
                    }

                    let was_speaking = vad.in_speech();
                    let decision = vad.on_frame(level, elapsed);
                    if vad.in_speech() != was_speaking {
                        if vad.in_speech() {
                            debug!("speech detected (level {level:.2})");
                        } else {
                            debug!("silence detected (level {level:.2})");
                        }
                    }

                    samples.extend_from_slice(&frame);
                    if let Some(reason) = decision {
                        if let StopReason::Silence { tail } = reason {
                            silence_tail_ms = tail.as_millis() as u64;
                        }
                        break reason;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break StopReason::StreamClosed,
            }
        };

        if let Err(err) = stream.pause() {
            debug!("failed to pause audio stream: {err}");
        }
        drop(stream);

        let stats = RecordingStats {
            capture_ms: start.elapsed().as_millis() as u64,
            speech_ms,
            silence_tail_ms,
            frames_processed,
            frames_dropped: dropped.load(Ordering::Relaxed),
            stop_reason,
        };

        if samples.is_empty() {
            warn!(
                "no samples captured from '{}'. {}",
                self.device_name(),
                mic_permission_hint()
            );
        }

        Ok(SessionRecording { samples, stats })
    }
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
