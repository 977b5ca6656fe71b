//! ONNX inference wrapper and model framing constants
//!
//! The pretrained network consumes a `[1, L]` f32 tensor of 16 kHz mono
//! samples and reports per-frame pitch and confidence. The constants below
//! describe its internal framing geometry and travel with the model
//! artifact; they are never rederived from the audio.

use std::path::Path;

use ort::inputs;
use ort::session::{builder::SessionBuilder, Session};
use ort::value::Value;

use crate::{Error, Result};

/// Sample rate the model was trained on.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Stride between consecutive frame centers, in samples.
pub const HOP_LENGTH: usize = 256;

/// Analysis window length, in samples.
pub const FRAME_LENGTH: usize = 1024;

/// Internal STFT padding applied by the model on each side.
pub const STFT_PADDING: usize = (FRAME_LENGTH - HOP_LENGTH) / 2;

/// Correction that places frame 0's timestamp at the acoustic center of
/// its analysis window rather than its leading edge. 127.5 samples.
pub const CENTER_OFFSET: f32 = (FRAME_LENGTH - 1) as f32 / 2.0 - STFT_PADDING as f32;

/// Shortest buffer the model accepts; anything shorter is zero-padded.
pub const MIN_INPUT_LENGTH: usize = 256;

/// Lowest frequency the model can report.
pub const MODEL_FMIN: f32 = 46.875;

/// Highest frequency the model can report.
pub const MODEL_FMAX: f32 = 2093.75;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.9;

/// Raw per-frame sequences as reported by the model.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    pub pitch_hz: Vec<f32>,
    pub confidence: Vec<f32>,
}

/// The inference seam.
///
/// The detector drives any implementation of this trait; tests substitute
/// stubs with canned outputs, production uses [`OnnxModel`].
pub trait PitchModel {
    /// Run inference over a mono 16 kHz buffer of at least
    /// [`MIN_INPUT_LENGTH`] samples.
    fn infer(&mut self, samples: &[f32]) -> Result<ModelOutput>;
}

/// ORT-backed pitch model.
///
/// Owns its session exclusively; dropping the value releases the ONNX
/// runtime resources deterministically.
pub struct OnnxModel {
    session: Session,
}

impl OnnxModel {
    /// Load a model from an .onnx file.
    pub fn from_file(path: &Path) -> Result<Self> {
        // Initialize ORT environment (global). Ignore the error if some
        // other component already initialized it.
        let _ = ort::init().with_name("pitchline").commit();

        // intra_threads=1: single short inference call, threads don't pay off
        let session = SessionBuilder::new()?
            .with_intra_threads(1)?
            .commit_from_file(path)?;

        Ok(Self { session })
    }
}

impl PitchModel for OnnxModel {
    fn infer(&mut self, samples: &[f32]) -> Result<ModelOutput> {
        let input = Value::from_array((vec![1usize, samples.len()], samples.to_vec()))?;

        let outputs = self.session.run(inputs![input])?;

        if outputs.len() < 2 {
            return Err(Error::Inference(format!(
                "model returned {} output(s), need pitch and confidence",
                outputs.len()
            )));
        }

        let (pitch_shape, pitch_data) = outputs[0].try_extract_tensor::<f32>()?;
        let (conf_shape, conf_data) = outputs[1].try_extract_tensor::<f32>()?;

        Ok(ModelOutput {
            pitch_hz: frame_sequence(pitch_shape, pitch_data)?,
            confidence: frame_sequence(conf_shape, conf_data)?,
        })
    }
}

/// Interpret one model output as a single `[1, N]` frame sequence.
///
/// The frame count comes from the model's reported trailing dimension; the
/// framing relationship is not recomputed here. Any shape whose element
/// count exceeds that dimension (batched or otherwise unexpected) is
/// rejected rather than sliced down.
fn frame_sequence(shape: &[i64], data: &[f32]) -> Result<Vec<f32>> {
    let n_frames = shape
        .last()
        .map(|&d| d as usize)
        .ok_or_else(|| Error::Inference("model output has no shape".into()))?;

    if data.len() != n_frames {
        return Err(Error::Inference(format!(
            "model output shape {:?} is not a single sequence of {} frames",
            shape, n_frames
        )));
    }

    Ok(data.to_vec())
}

/// Right-pad with silence up to the model's minimum input length.
pub fn pad_to_min(mut samples: Vec<f32>) -> Vec<f32> {
    if samples.len() < MIN_INPUT_LENGTH {
        samples.resize(MIN_INPUT_LENGTH, 0.0);
    }
    samples
}
