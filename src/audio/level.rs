//! Loudness estimation for voice activity detection.
//!
//! Raw RMS of speech at typical microphone gain rarely approaches full scale,
//! so a multiplicative gain (default 5.0) lifts the value into a range where
//! thresholds around 0.05-0.15 are meaningful. The gain is configurable; it
//! was tuned by ear, not derived.

use super::MAX_AMPLITUDE;

/// Normalized loudness of a 16-bit PCM buffer, in [0.0, 1.0].
///
/// Root-mean-square amplitude over the buffer, normalized by full scale,
/// boosted by `gain`, clamped to 1.0. An empty buffer is 0.0.
pub fn level_from_samples(samples: &[i16], gain: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f64 = samples
        .iter()
        .map(|&s| {
            let normalized = f64::from(s) / f64::from(MAX_AMPLITUDE);
            normalized * normalized
        })
        .sum::<f64>()
        / samples.len() as f64;
    let rms = energy.sqrt() as f32;
    (rms * gain).clamp(0.0, 1.0)
}

/// Same measurement over raw little-endian bytes. An odd trailing byte is
/// truncated rather than rejected.
pub fn level_from_bytes(bytes: &[u8], gain: f32) -> f32 {
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    level_from_samples(&samples, gain)
}
