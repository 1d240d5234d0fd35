//! OpenAI-compatible `audio/transcriptions` backend.
//!
//! One blocking multipart POST per session, made after capture has fully
//! stopped, so it never competes with the audio thread.

use super::SttBackend;
use crate::config::BackendConfig;
use anyhow::{bail, Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct WhisperApiBackend {
    client: Client,
    config: BackendConfig,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperApiBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

impl SttBackend for WhisperApiBackend {
    fn name(&self) -> &'static str {
        "whisper_api"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let form = multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("temperature", self.config.temperature.to_string())
            .text("response_format", "json")
            .file("file", audio_path)
            .with_context(|| format!("failed to attach {}", audio_path.display()))?;

        debug!(
            "uploading {} to {} (model {})",
            audio_path.display(),
            self.request_url(),
            self.config.model
        );

        let response = self
            .client
            .post(self.request_url())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .context("transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("transcription endpoint returned {status}: {}", body.trim());
        }

        let parsed: TranscriptionResponse = response
            .json()
            .context("transcription response was not valid JSON")?;
        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(api_key: &str, endpoint: &str) -> WhisperApiBackend {
        WhisperApiBackend::new(BackendConfig {
            api_key: api_key.to_string(),
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            temperature: 0.0,
            endpoint: endpoint.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn availability_tracks_credential_presence() {
        assert!(!backend("", "https://api.openai.com/v1").is_available());
        assert!(!backend("   ", "https://api.openai.com/v1").is_available());
        assert!(backend("sk-test", "https://api.openai.com/v1").is_available());
    }

    #[test]
    fn request_url_joins_without_double_slash() {
        let b = backend("sk-test", "https://api.openai.com/v1/");
        assert_eq!(
            b.request_url(),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }
}
