//! Config file loading.
//!
//! YAML by default, JSON when the path ends in `.json`. Every field has a
//! default so a partial file is fine; a missing file is created with the
//! defaults on first run, and a malformed one is reported and ignored rather
//! than aborting a dictation the user already started.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictate")
        .join("config.yaml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub audio: AudioSection,
    pub recorder: RecorderSection,
    pub backend: BackendSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSection {
    pub sample_rate: u32,
    pub chunk_size: usize,
    pub device: Option<String>,
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            chunk_size: 1024,
            device: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecorderSection {
    pub vad_enabled: bool,
    pub silence_threshold: f32,
    pub silence_duration: f32,
    pub min_recording_time: f32,
    pub level_gain: f32,
}

impl Default for RecorderSection {
    fn default() -> Self {
        Self {
            vad_enabled: true,
            silence_threshold: 0.1,
            silence_duration: 5.0,
            min_recording_time: 3.0,
            level_gain: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendSection {
    pub api_key: String,
    pub model: String,
    pub language: String,
    pub temperature: f32,
    pub endpoint: String,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            temperature: 0.0,
            endpoint: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl FileConfig {
    /// Load the config file, falling back to defaults when it is absent or
    /// unreadable. Absent at the default location means first run: write a
    /// default file there so the user has something to edit.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            match Self::write_default(path) {
                Ok(()) => info!("created default configuration at {}", path.display()),
                Err(err) => warn!("could not create default config: {err:#}"),
            }
            return Self::default();
        }

        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Self::parse(path, &text))
        {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "failed to load config from {}: {err:#}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn parse(path: &Path, text: &str) -> Result<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            serde_json::from_str(text).context("invalid JSON config")
        } else {
            serde_yaml::from_str(text).context("invalid YAML config")
        }
    }

    fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let rendered = serde_yaml::to_string(&Self::default()).context("serialize defaults")?;
        fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
    }
}
