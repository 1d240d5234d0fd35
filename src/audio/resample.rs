//! Rate conversion between the device's native rate and the session rate.
//!
//! Linear interpolation is enough here: frames are short speech snippets
//! headed for a speech API, where latency matters more than phase accuracy.

use super::MAX_AMPLITUDE;
use std::cmp::Ordering as CmpOrdering;

/// Convert one captured frame to the session rate and pad/trim it to the
/// exact frame length the state machine expects.
pub(super) fn convert_frame_to_target(
    frame: Vec<f32>,
    device_rate: u32,
    target_rate: u32,
    desired_len: usize,
) -> Vec<f32> {
    if device_rate == target_rate || device_rate == 0 {
        return adjust_frame_length(frame, desired_len);
    }
    let ratio = target_rate as f32 / device_rate as f32;
    adjust_frame_length(resample_linear(&frame, ratio), desired_len)
}

pub(super) fn resample_linear(input: &[f32], ratio: f32) -> Vec<f32> {
    let input_len = input.len();
    let output_len = (input_len as f32 * ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_idx = i as f32 / ratio;
        let idx = src_idx.floor() as usize;
        let frac = src_idx - idx as f32;

        if idx + 1 < input_len {
            output.push(input[idx] * (1.0 - frac) + input[idx + 1] * frac);
        } else {
            output.push(input.last().copied().unwrap_or(0.0));
        }
    }

    output
}

pub(super) fn adjust_frame_length(mut data: Vec<f32>, desired: usize) -> Vec<f32> {
    match data.len().cmp(&desired) {
        CmpOrdering::Greater => data.truncate(desired),
        CmpOrdering::Less => {
            let pad = data.last().copied().unwrap_or(0.0);
            data.resize(desired, pad);
        }
        CmpOrdering::Equal => {}
    }
    data
}

/// Quantize normalized f32 samples back to the 16-bit PCM the level
/// estimator and the WAV writer operate on.
pub(super) fn quantize(frame: &[f32]) -> Vec<i16> {
    frame
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * (MAX_AMPLITUDE - 1.0)) as i16)
        .collect()
}
