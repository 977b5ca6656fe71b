//! Pitchline CLI
//!
//! Runs model-backed pitch detection over a WAV file and prints per-frame
//! results plus aggregate voiced statistics.
//!
//! # Usage
//!
//! ```bash
//! pitchline recording.wav --model model.onnx --threshold 0.9
//! pitchline recording.wav --fmin 80 --fmax 400
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pitchline::model::{DEFAULT_CONFIDENCE_THRESHOLD, MODEL_FMAX, MODEL_FMIN};
use pitchline::{DetectorConfig, PitchDetector, PitchResult};

#[derive(Parser)]
#[command(name = "pitchline")]
#[command(about = "Model-backed pitch and voicing detection for WAV files")]
#[command(version)]
struct Cli {
    /// Input WAV file
    audio: PathBuf,

    /// Path to the ONNX model file
    #[arg(short, long, default_value = "model.onnx")]
    model: PathBuf,

    /// Lower edge of the accepted pitch band in Hz (inclusive)
    #[arg(long, default_value_t = MODEL_FMIN)]
    fmin: f32,

    /// Upper edge of the accepted pitch band in Hz (inclusive)
    #[arg(long, default_value_t = MODEL_FMAX)]
    fmax: f32,

    /// Confidence threshold; frames at or below it are unvoiced
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// Maximum number of frames to print in the per-frame table
    #[arg(long, default_value = "1000")]
    max_frames: usize,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = DetectorConfig::new(cli.threshold, cli.fmin, cli.fmax)?;

    tracing::info!("Loading model from {:?}", cli.model);
    let mut detector = PitchDetector::from_onnx_file(&cli.model, config)?;

    tracing::info!(
        "Analyzing {:?} (band {}-{} Hz, threshold {})",
        cli.audio,
        cli.fmin,
        cli.fmax,
        cli.threshold
    );
    let result = detector.detect_file(&cli.audio)?;

    print_result(&result, cli.max_frames);

    Ok(())
}

fn print_result(result: &PitchResult, max_frames: usize) {
    println!("Pitch Detection Results");
    println!("=======================");
    println!("Total frames: {}\n", result.len());

    if result.is_empty() {
        return;
    }

    let voiced = result.voiced_count();
    println!(
        "Voiced frames: {} / {} ({:.1}%)\n",
        voiced,
        result.len(),
        100.0 * voiced as f64 / result.len() as f64
    );

    if voiced > 0 {
        let mut min_pitch = f32::INFINITY;
        let mut max_pitch = f32::NEG_INFINITY;
        let mut pitch_sum = 0.0f64;
        let mut conf_sum = 0.0f64;

        for i in 0..result.len() {
            if result.voicing[i] {
                min_pitch = min_pitch.min(result.pitch_hz[i]);
                max_pitch = max_pitch.max(result.pitch_hz[i]);
                pitch_sum += result.pitch_hz[i] as f64;
                conf_sum += result.confidence[i] as f64;
            }
        }

        println!("Voiced frame statistics:");
        println!("  Min pitch: {:.2} Hz", min_pitch);
        println!("  Max pitch: {:.2} Hz", max_pitch);
        println!("  Avg pitch: {:.2} Hz", pitch_sum / voiced as f64);
        println!("  Avg confidence: {:.4}\n", conf_sum / voiced as f64);
    }

    let shown = result.len().min(max_frames);
    println!("First {} frames:", shown);
    println!(
        "{:>12} {:>12} {:>12} {:>8}",
        "Time (s)", "Pitch (Hz)", "Confidence", "Voiced"
    );
    println!("{}", "-".repeat(48));

    for i in 0..shown {
        println!(
            "{:>12.4} {:>12.2} {:>12.4} {:>8}",
            result.timestamps[i], result.pitch_hz[i], result.confidence[i], result.voicing[i]
        );
    }
}
