//! Per-frame timestamp and voicing derivation
//!
//! Both functions are pure: timestamps depend only on the frame count, the
//! voicing mask only on the model outputs and the configured gates. Every
//! invocation with the same inputs produces identical results.

use crate::model::{CENTER_OFFSET, HOP_LENGTH, TARGET_SAMPLE_RATE};
use crate::{Error, Result};

/// Frame-center times in seconds for `n_frames` consecutive frames.
///
/// `t[i] = (i * hop + center_offset) / sample_rate`, so the spacing is a
/// constant `hop / sample_rate` and the sequence is strictly increasing.
pub fn timestamps(n_frames: usize) -> Vec<f32> {
    (0..n_frames)
        .map(|i| ((i * HOP_LENGTH) as f32 + CENTER_OFFSET) / TARGET_SAMPLE_RATE as f32)
        .collect()
}

/// Per-frame voicing decisions.
///
/// A frame is voiced when its confidence strictly exceeds the threshold
/// and its pitch lies inside the inclusive `[fmin, fmax]` band. Frames are
/// decided independently; there is no smoothing or hysteresis.
///
/// The two sequences must be parallel; a length mismatch is an error
/// rather than a truncation.
pub fn voicing_mask(
    pitch_hz: &[f32],
    confidence: &[f32],
    threshold: f32,
    fmin: f32,
    fmax: f32,
) -> Result<Vec<bool>> {
    if pitch_hz.len() != confidence.len() {
        return Err(Error::InvalidInput(format!(
            "pitch and confidence lengths differ: {} vs {}",
            pitch_hz.len(),
            confidence.len()
        )));
    }

    Ok(pitch_hz
        .iter()
        .zip(confidence.iter())
        .map(|(&hz, &conf)| conf > threshold && hz >= fmin && hz <= fmax)
        .collect())
}
