//! Sample-rate conversion by linear interpolation
//!
//! Single pass, one allocation, no anti-aliasing filter. The model is
//! tolerant of the aliasing this introduces, and the trade buys exact
//! reproducibility and speed. Callers needing band-limited resampling
//! should convert upstream.

use crate::{Error, Result};

/// Resample a mono buffer from `orig_sr` to `target_sr`.
///
/// When the rates already match the input is returned unchanged (an exact
/// copy, not an approximation). Otherwise each output sample is the linear
/// interpolation of the two nearest input samples; the output length is
/// `floor(len * target_sr / orig_sr)`.
pub fn resample(samples: &[f32], orig_sr: u32, target_sr: u32) -> Result<Vec<f32>> {
    if samples.is_empty() {
        return Err(Error::InvalidInput("cannot resample an empty buffer".into()));
    }
    if orig_sr == 0 || target_sr == 0 {
        return Err(Error::InvalidInput("sample rates must be positive".into()));
    }

    if orig_sr == target_sr {
        return Ok(samples.to_vec());
    }

    let ratio = target_sr as f64 / orig_sr as f64;
    let new_len = (samples.len() as f64 * ratio) as usize;
    let mut out = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src = i as f64 / ratio;
        let lo = src.floor() as usize;
        // Clamp so the final sample never reads past the end.
        let hi = (lo + 1).min(samples.len() - 1);
        let frac = src - lo as f64;

        out.push((samples[lo] as f64 * (1.0 - frac) + samples[hi] as f64 * frac) as f32);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_rates_match() {
        let samples = vec![0.25, -0.5, 0.75, -1.0];
        let result = resample(&samples, 44100, 44100).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn test_upsample_length_law() {
        // 8000 -> 16000 doubles the length exactly.
        let samples = vec![0.0f32; 123];
        let result = resample(&samples, 8000, 16000).unwrap();
        assert_eq!(result.len(), 246);
    }

    #[test]
    fn test_downsample_length() {
        let samples = vec![0.0f32; 441];
        let result = resample(&samples, 44100, 16000).unwrap();
        assert_eq!(result.len(), (441.0f64 * 16000.0 / 44100.0) as usize);
    }

    #[test]
    fn test_linear_interpolation_midpoints() {
        // Doubling a ramp puts every odd output exactly between neighbors.
        let samples = vec![0.0, 1.0, 2.0, 3.0];
        let result = resample(&samples, 8000, 16000).unwrap();
        assert_eq!(result.len(), 8);
        assert!((result[0] - 0.0).abs() < 1e-6);
        assert!((result[1] - 0.5).abs() < 1e-6);
        assert!((result[2] - 1.0).abs() < 1e-6);
        assert!((result[3] - 1.5).abs() < 1e-6);
        // Tail is clamped to the last input sample.
        assert!((result[7] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = resample(&[], 8000, 16000).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_zero_rate_fails() {
        let samples = vec![0.1, 0.2];
        assert!(matches!(
            resample(&samples, 0, 16000),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            resample(&samples, 16000, 0),
            Err(Error::InvalidInput(_))
        ));
    }
}
