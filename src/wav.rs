//! WAV ingestion
//!
//! Decodes a WAV file to normalized mono f32 samples. Supports 16-bit
//! integer PCM (divided by 32768) and 32-bit float PCM; anything else is
//! rejected. Multi-channel audio is downmixed to mono.

use std::path::Path;

use crate::{Error, Result};

/// Decoded audio buffer
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Mono samples in roughly [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels in the original file
    pub channels: u16,
}

/// Read a WAV file to mono f32 samples.
///
/// The RIFF/WAVE container check happens inside hound; malformed files
/// surface as [`Error::Wav`].
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<_, _>>()?,
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (format, bits) => {
            return Err(Error::UnsupportedFormat(format!(
                "{}-bit {:?} PCM (supported: 16-bit Int, 32-bit Float)",
                bits, format
            )));
        }
    };

    let samples = if spec.channels > 1 {
        tracing::debug!("Downmixing {} channels to mono", spec.channels);
        downmix_to_mono(&interleaved, spec.channels as usize)
    } else {
        interleaved
    };

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Downmix interleaved multi-channel audio to mono by unweighted averaging
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    let num_frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(num_frames);
    let scale = 1.0 / channels as f32;

    for frame in 0..num_frames {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += interleaved[frame * channels + ch];
        }
        mono.push(sum * scale);
    }

    mono
}
