use super::file::{default_config_path, FileConfig};
use super::{AppConfig, BackendConfig, DeliveryConfig, SessionConfig, Settings};
use anyhow::{bail, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

impl AppConfig {
    /// Layer file + CLI + credential sources into one validated snapshot.
    pub fn resolve(&self) -> Result<Settings> {
        let config_path = self.config.clone().unwrap_or_else(default_config_path);
        let file = FileConfig::load(&config_path);

        let sample_rate = self.sample_rate.unwrap_or(file.audio.sample_rate);
        let chunk_size = file.audio.chunk_size;
        let silence_threshold = self.threshold.unwrap_or(file.recorder.silence_threshold);
        let silence_duration = self.duration.unwrap_or(file.recorder.silence_duration);
        let min_recording_time = self
            .min_recording_time
            .unwrap_or(file.recorder.min_recording_time);
        let level_gain = self.level_gain.unwrap_or(file.recorder.level_gain);

        if !(8_000..=96_000).contains(&sample_rate) {
            bail!("--sample-rate must be between 8000 and 96000 Hz, got {sample_rate}");
        }
        if !(64..=65_536).contains(&chunk_size) {
            bail!("audio.chunk_size must be between 64 and 65536 samples, got {chunk_size}");
        }
        if !(0.0..=1.0).contains(&silence_threshold) {
            bail!("--threshold must be between 0.0 and 1.0, got {silence_threshold}");
        }
        if !(silence_duration > 0.0 && silence_duration <= 600.0) {
            bail!("--duration must be between 0 and 600 seconds, got {silence_duration}");
        }
        if !(0.0..=600.0).contains(&min_recording_time) {
            bail!("--min-recording-time must be between 0 and 600 seconds, got {min_recording_time}");
        }
        if !(level_gain > 0.0 && level_gain <= 100.0) {
            bail!("--level-gain must be between 0 and 100, got {level_gain}");
        }
        if let Some(time) = self.time {
            if !(time > 0.0 && time <= 3_600.0) {
                bail!("--time must be between 0 and 3600 seconds, got {time}");
            }
        }

        // A fixed --time means "record exactly this long": silence detection
        // is pointless there, so it is disabled just like with --no-vad.
        let vad_enabled = file.recorder.vad_enabled && !self.no_vad && self.time.is_none();

        let session = SessionConfig {
            sample_rate,
            chunk_size,
            input_device: self.input_device.clone().or(file.audio.device),
            vad_enabled,
            silence_threshold,
            silence_duration: Duration::from_secs_f32(silence_duration),
            min_recording_time: Duration::from_secs_f32(min_recording_time),
            time_limit: self.time.map(Duration::from_secs_f32),
            level_gain,
        };

        let backend = BackendConfig {
            api_key: resolve_api_key(&file.backend.api_key, &self.env_file),
            model: file.backend.model,
            language: file.backend.language,
            temperature: file.backend.temperature,
            endpoint: file.backend.endpoint,
        };

        let delivery = DeliveryConfig {
            output: self.output.clone(),
            newline: self.newline,
        };

        Ok(Settings {
            session,
            backend,
            delivery,
        })
    }
}

/// Credential fallback order: config file, `OPENAI_API_KEY` in the
/// environment, then the dotfile. Empty means "not configured" and surfaces
/// later as a backend-unavailable failure.
fn resolve_api_key(from_file: &str, env_file: &Path) -> String {
    let trimmed = from_file.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    if let Ok(key) = env::var("OPENAI_API_KEY") {
        let key = key.trim();
        if !key.is_empty() {
            return key.to_string();
        }
    }
    api_key_from_dotfile(env_file).unwrap_or_default()
}

pub(super) fn api_key_from_dotfile(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == "OPENAI_API_KEY" {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
