//! Pitch detection orchestration
//!
//! A [`PitchDetector`] is built once (the ONNX session is the expensive
//! part) and reused across many detection calls. Each call is synchronous:
//! validate → resample → pad → infer → derive voicing and timestamps.

use std::path::Path;

use crate::frames;
use crate::model::{
    self, OnnxModel, PitchModel, DEFAULT_CONFIDENCE_THRESHOLD, MODEL_FMAX, MODEL_FMIN,
};
use crate::resample::resample;
use crate::wav;
use crate::{Error, Result};

/// Detection parameters, validated at construction and immutable after.
///
/// Fields are private so [`DetectorConfig::new`] and [`Default`] are the
/// only construction paths; a value of this type always holds a valid
/// combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    confidence_threshold: f32,
    fmin: f32,
    fmax: f32,
}

impl DetectorConfig {
    /// Validate and build a configuration.
    ///
    /// Out-of-range values fail here with [`Error::Config`]; nothing is
    /// silently clamped.
    pub fn new(confidence_threshold: f32, fmin: f32, fmax: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold must be in [0, 1], got {confidence_threshold}"
            )));
        }
        if fmin < MODEL_FMIN {
            return Err(Error::Config(format!(
                "fmin {fmin} is below the model minimum {MODEL_FMIN}"
            )));
        }
        if fmax > MODEL_FMAX {
            return Err(Error::Config(format!(
                "fmax {fmax} is above the model maximum {MODEL_FMAX}"
            )));
        }
        if fmin > fmax {
            return Err(Error::Config(format!(
                "fmin {fmin} cannot be greater than fmax {fmax}"
            )));
        }

        Ok(Self {
            confidence_threshold,
            fmin,
            fmax,
        })
    }

    /// A frame is voiced only when confidence strictly exceeds this.
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Lower edge of the accepted pitch band, inclusive.
    pub fn fmin(&self) -> f32 {
        self.fmin
    }

    /// Upper edge of the accepted pitch band, inclusive.
    pub fn fmax(&self) -> f32 {
        self.fmax
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            fmin: MODEL_FMIN,
            fmax: MODEL_FMAX,
        }
    }
}

/// One detection call's output: four parallel per-frame sequences.
#[derive(Debug, Clone)]
pub struct PitchResult {
    /// Raw model pitch estimates in Hz; may be spurious on unvoiced frames.
    pub pitch_hz: Vec<f32>,
    /// Model confidence in [0, 1].
    pub confidence: Vec<f32>,
    /// Frame-center times in seconds, strictly increasing.
    pub timestamps: Vec<f32>,
    /// Derived per-frame voicing decisions.
    pub voicing: Vec<bool>,
}

impl PitchResult {
    /// Number of analysis frames.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn voiced_count(&self) -> usize {
        self.voicing.iter().filter(|&&v| v).count()
    }
}

/// Pitch detector wrapping a model and a validated configuration.
///
/// Owns its model exclusively; the underlying inference session is
/// released when the detector is dropped.
pub struct PitchDetector {
    config: DetectorConfig,
    model: Box<dyn PitchModel>,
}

impl PitchDetector {
    /// Build a detector over an ONNX model file.
    pub fn from_onnx_file(model_path: &Path, config: DetectorConfig) -> Result<Self> {
        let model = OnnxModel::from_file(model_path)?;
        Ok(Self::with_model(Box::new(model), config))
    }

    /// Build a detector over any [`PitchModel`] implementation.
    ///
    /// `config` was already validated by [`DetectorConfig::new`]; no
    /// further checks happen here.
    pub fn with_model(model: Box<dyn PitchModel>, config: DetectorConfig) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect pitch and voicing over a mono buffer at `sample_rate`.
    ///
    /// Validation failures abort before the model is invoked; there is no
    /// partial inference and no retry.
    pub fn detect(&mut self, samples: &[f32], sample_rate: u32) -> Result<PitchResult> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("input audio cannot be empty".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive".into()));
        }

        let audio_16k = resample(samples, sample_rate, model::TARGET_SAMPLE_RATE)?;
        let padded = model::pad_to_min(audio_16k);

        tracing::debug!("Running inference over {} samples", padded.len());
        let output = self.model.infer(&padded)?;

        if output.pitch_hz.len() != output.confidence.len() {
            return Err(Error::Inference(format!(
                "pitch and confidence lengths differ: {} vs {}",
                output.pitch_hz.len(),
                output.confidence.len()
            )));
        }

        let voicing = frames::voicing_mask(
            &output.pitch_hz,
            &output.confidence,
            self.config.confidence_threshold,
            self.config.fmin,
            self.config.fmax,
        )?;
        let timestamps = frames::timestamps(output.pitch_hz.len());

        Ok(PitchResult {
            pitch_hz: output.pitch_hz,
            confidence: output.confidence,
            timestamps,
            voicing,
        })
    }

    /// Read a WAV file and detect pitch over its contents.
    pub fn detect_file(&mut self, path: &Path) -> Result<PitchResult> {
        let buffer = wav::read_wav(path)?;
        tracing::debug!(
            "Decoded {:?}: {} samples at {} Hz",
            path,
            buffer.samples.len(),
            buffer.sample_rate
        );
        self.detect(&buffer.samples, buffer.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelOutput;

    /// Model stub returning fixed sequences regardless of input.
    struct FixedModel {
        pitch_hz: Vec<f32>,
        confidence: Vec<f32>,
    }

    impl PitchModel for FixedModel {
        fn infer(&mut self, _samples: &[f32]) -> Result<ModelOutput> {
            Ok(ModelOutput {
                pitch_hz: self.pitch_hz.clone(),
                confidence: self.confidence.clone(),
            })
        }
    }

    fn detector_with(pitch_hz: Vec<f32>, confidence: Vec<f32>) -> PitchDetector {
        PitchDetector::with_model(
            Box::new(FixedModel {
                pitch_hz,
                confidence,
            }),
            DetectorConfig::default(),
        )
    }

    #[test]
    fn test_config_rejects_bad_threshold() {
        assert!(matches!(
            DetectorConfig::new(1.5, MODEL_FMIN, MODEL_FMAX),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DetectorConfig::new(-0.1, MODEL_FMIN, MODEL_FMAX),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_accepts_closed_interval_ends() {
        assert!(DetectorConfig::new(0.0, MODEL_FMIN, MODEL_FMAX).is_ok());
        assert!(DetectorConfig::new(1.0, MODEL_FMIN, MODEL_FMAX).is_ok());
    }

    #[test]
    fn test_config_getters_expose_validated_values() {
        let config = DetectorConfig::new(0.8, 100.0, 1000.0).unwrap();
        assert_eq!(config.confidence_threshold(), 0.8);
        assert_eq!(config.fmin(), 100.0);
        assert_eq!(config.fmax(), 1000.0);

        let default = DetectorConfig::default();
        assert_eq!(default.confidence_threshold(), 0.9);
        assert_eq!(default.fmin(), MODEL_FMIN);
        assert_eq!(default.fmax(), MODEL_FMAX);
    }

    #[test]
    fn test_config_rejects_band_outside_model_range() {
        assert!(matches!(
            DetectorConfig::new(0.9, 10.0, MODEL_FMAX),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            DetectorConfig::new(0.9, MODEL_FMIN, 3000.0),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_rejects_inverted_band() {
        assert!(matches!(
            DetectorConfig::new(0.9, 500.0, 100.0),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_detect_rejects_empty_audio() {
        let mut det = detector_with(vec![], vec![]);
        assert!(matches!(
            det.detect(&[], 16000),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_detect_rejects_zero_sample_rate() {
        let mut det = detector_with(vec![], vec![]);
        assert!(matches!(
            det.detect(&[0.0; 100], 0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_detect_rejects_mismatched_model_outputs() {
        let mut det = detector_with(vec![440.0, 440.0], vec![0.95]);
        let err = det.detect(&[0.0; 1000], 16000).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_detect_assembles_parallel_sequences() {
        let mut det = detector_with(vec![440.0, 880.0, 5000.0], vec![0.95, 0.5, 0.99]);
        let result = det.detect(&[0.0; 1000], 16000).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.pitch_hz.len(), 3);
        assert_eq!(result.confidence.len(), 3);
        assert_eq!(result.timestamps.len(), 3);
        // Frame 0 voiced, frame 1 below threshold, frame 2 out of band.
        assert_eq!(result.voicing, vec![true, false, false]);
        assert_eq!(result.voiced_count(), 1);
    }
}
