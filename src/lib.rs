//! Pitchline – model-backed pitch and voicing detection
//!
//! # Architecture
//!
//! ```text
//! Audio File (.wav)
//!     │
//!     ▼
//! ┌─────────┐    ┌───────────┐    ┌─────────┐    ┌───────────┐
//! │   WAV    │───▶│ Resampler │───▶│ Padding │───▶│ Inference │
//! │  hound   │    │  linear   │    │  ≥ 256  │    │  ORT/ONNX │
//! └─────────┘    └───────────┘    └─────────┘    └───────────┘
//!                                                      │
//!                                  ┌───────────────────┤
//!                                  ▼                   ▼
//!                           ┌────────────┐      ┌────────────┐
//!                           │ Timestamps │      │  Voicing   │
//!                           └────────────┘      └────────────┘
//!                                  └─────────┬─────────┘
//!                                            ▼
//!                                       PitchResult
//! ```
//!
//! The model is a black box: a pretrained ONNX network that maps a mono
//! 16 kHz buffer to per-frame pitch (Hz) and confidence ([0, 1]) sequences.
//! Everything here is the synchronous pre/post-processing around that call.

pub mod detector;
pub mod frames;
pub mod model;
pub mod resample;
pub mod wav;

use thiserror::Error;

pub use detector::{DetectorConfig, PitchDetector, PitchResult};
pub use model::{ModelOutput, OnnxModel, PitchModel};
pub use wav::{read_wav, AudioBuffer};

#[derive(Error, Debug)]
pub enum Error {
    /// Detector parameters rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Bad caller input rejected before any processing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed or unreadable WAV container.
    #[error("Failed to read audio file: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The model returned something other than the contracted outputs.
    #[error("Inference error: {0}")]
    Inference(String),

    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
