//! Whisper speech-to-text backend (`audio` feature).
//!
//! The model is loaded once at startup and kept for the life of the
//! process; per-request work is decode → resample → inference. Whisper
//! wants 16 kHz mono f32 PCM, so WAV input in any common sample format is
//! decoded with hound, downmixed, and resampled with rubato before
//! inference.

use crate::error::TextpressError;
use crate::extract::Transcriber;
use std::path::Path;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Whisper-backed [`Transcriber`].
pub struct WhisperTranscriber {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    /// Load a Whisper GGML model from `model_path`.
    ///
    /// Heavy: reads the whole model into memory. Call once at startup.
    pub fn load(model_path: &Path) -> Result<Self, TextpressError> {
        if !model_path.exists() {
            return Err(TextpressError::Internal(format!(
                "Whisper model not found at {}",
                model_path.display()
            )));
        }

        info!("Loading Whisper model from {}", model_path.display());
        let ctx = WhisperContext::new_with_params(
            &model_path.to_string_lossy(),
            WhisperContextParameters::default(),
        )
        .map_err(|e| TextpressError::Internal(format!("Failed to load Whisper model: {e}")))?;

        Ok(Self { ctx })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, path: &Path) -> Result<String, TextpressError> {
        let samples = read_wav_mono_16k(path)?;
        debug!(
            "Transcribing {:.1}s of audio from {}",
            samples.len() as f32 / WHISPER_SAMPLE_RATE as f32,
            path.display()
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_no_context(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_suppress_blank(true);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| conversion(format!("Failed to create Whisper state: {e}")))?;
        state
            .full(params, &samples)
            .map_err(|e| conversion(format!("Whisper inference failed: {e}")))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| conversion(format!("Whisper segment read failed: {e}")))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| conversion(format!("Whisper segment {i} read failed: {e}")))?;
            text.push_str(&segment);
        }

        Ok(text.trim().to_string())
    }
}

fn conversion(detail: String) -> TextpressError {
    TextpressError::Conversion { detail }
}

/// Decode a WAV file into 16 kHz mono f32 PCM.
fn read_wav_mono_16k(path: &Path) -> Result<Vec<f32>, TextpressError> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| conversion(format!("Failed to read WAV file: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| conversion(format!("Failed to decode WAV samples: {e}")))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
                .map_err(|e| conversion(format!("Failed to decode WAV samples: {e}")))?
        }
    };

    if samples.is_empty() {
        return Err(conversion("The WAV file contains no audio samples.".into()));
    }

    let mono = downmix(&samples, spec.channels);
    resample_to_16k(&mono, spec.sample_rate)
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let n = channels as usize;
    samples
        .chunks(n)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample mono PCM to 16 kHz (no-op when already there).
fn resample_to_16k(samples: &[f32], input_rate: u32) -> Result<Vec<f32>, TextpressError> {
    use rubato::{FftFixedIn, Resampler};

    if input_rate == WHISPER_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        input_rate as usize,
        WHISPER_SAMPLE_RATE as usize,
        1024,
        1,
        1,
    )
    .map_err(|e| conversion(format!("Resampler init failed: {e}")))?;

    let input_frames = resampler.input_frames_next();
    let mut output = Vec::new();

    for chunk in samples.chunks(input_frames) {
        let input = if chunk.len() < input_frames {
            let mut padded = chunk.to_vec();
            padded.resize(input_frames, 0.0);
            vec![padded]
        } else {
            vec![chunk.to_vec()]
        };

        let resampled = resampler
            .process(&input, None)
            .map_err(|e| conversion(format!("Resampling failed: {e}")))?;
        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_stereo_frames() {
        let stereo = [0.0, 1.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&stereo, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix(&mono, 1), mono.to_vec());
    }

    #[test]
    fn resample_is_identity_at_16k() {
        let samples = vec![0.25; 1600];
        let out = resample_to_16k(&samples, 16_000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn resample_halves_48k_to_16k_roughly() {
        let samples = vec![0.0; 48_000];
        let out = resample_to_16k(&samples, 48_000).unwrap();
        // One second of input should come out near one second at 16 kHz.
        assert!(
            (out.len() as i64 - 16_000).unsigned_abs() < 2_048,
            "got {} samples",
            out.len()
        );
    }

    #[test]
    fn unreadable_wav_is_a_conversion_error() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = read_wav_mono_16k(f.path()).unwrap_err();
        assert!(matches!(err, TextpressError::Conversion { .. }));
    }
}
