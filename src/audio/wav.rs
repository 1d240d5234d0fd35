//! Temp-file persistence of a finished recording.
//!
//! The transcription endpoint takes a file upload, so the session buffer is
//! written out as single-channel 16-bit PCM WAV under the OS temp dir. The
//! guard deletes the file on drop, which keeps cleanup idempotent across
//! every exit path, including a manual stop racing a silence stop.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct TempWav {
    path: PathBuf,
}

impl TempWav {
    /// Write `samples` as a mono 16-bit WAV at `sample_rate` and return the
    /// guard owning the file.
    pub fn write(samples: &[i16], sample_rate: u32) -> Result<Self> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let path = env::temp_dir().join(format!("dictate_{stamp}_{}.wav", std::process::id()));

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("failed to create temp WAV at {}", path.display()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .context("failed to write sample to temp WAV")?;
        }
        writer.finalize().context("failed to finalize temp WAV")?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        // Best effort; a file already gone is fine.
        let _ = fs::remove_file(&self.path);
    }
}
