use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use myra_config::SpeechSettings;
use tracing::{debug, info, warn};

use super::decoder::decode_file;
use super::filter::{AudioFilter, HighPassFilter, SpectralGate};
use super::mime::ContainerHint;
use super::resampler::resample_mono;
use super::{TARGET_SAMPLE_RATE, Waveform, pad_to, samples_for_ms};
use crate::error::SpeechError;

/// Turns browser-recorded bytes into a canonical 16kHz mono waveform.
///
/// Stages: scratch file → container sniff + decode → downmix → resample →
/// optional filters → silence padding to the duration floor.
pub struct AudioNormalizer {
    filters: Vec<Box<dyn AudioFilter>>,
    min_duration_ms: u32,
    scratch_dir: Option<PathBuf>,
}

impl AudioNormalizer {
    pub fn new(min_duration_ms: u32) -> Self {
        Self {
            filters: Vec::new(),
            min_duration_ms,
            scratch_dir: None,
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        let mut normalizer = Self::new(settings.min_duration_ms);
        if settings.noise_reduction_enabled {
            normalizer = normalizer.with_filter(Box::new(SpectralGate::default()));
        }
        if settings.highpass_enabled {
            normalizer =
                normalizer.with_filter(Box::new(HighPassFilter::new(settings.highpass_cutoff_hz)));
        }
        if let Some(dir) = &settings.scratch_dir {
            normalizer = normalizer.with_scratch_dir(dir);
        }
        normalizer
    }

    /// Appends a filter; filters run in insertion order.
    pub fn with_filter(mut self, filter: Box<dyn AudioFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Decodes `audio` (declared as `mime_type`) into a canonical waveform.
    ///
    /// Blocking; call from a worker thread. The scratch file is removed when
    /// this returns, on success and on every error path.
    pub fn normalize(&self, audio: &[u8], mime_type: &str) -> Result<Waveform, SpeechError> {
        let started = Instant::now();
        let container = ContainerHint::from_mime(mime_type);

        let suffix = format!(".{}", container.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix("myra-utterance-").suffix(&suffix);
        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        scratch.write_all(audio)?;
        scratch.flush()?;
        debug!(
            path = %scratch.path().display(),
            size = audio.len(),
            ext = container.extension(),
            "Utterance written to scratch file"
        );

        let t0 = Instant::now();
        let decoded = decode_file(scratch.path(), container.extension())?;
        info!(
            step = "audio_decode",
            ext = container.extension(),
            source_rate = decoded.sample_rate,
            duration_ms = t0.elapsed().as_secs_f64() * 1000.0,
            "Audio decoded"
        );

        let t0 = Instant::now();
        let mut samples = resample_mono(&decoded.samples, decoded.sample_rate, TARGET_SAMPLE_RATE)?;
        info!(
            step = "audio_resample",
            duration_ms = t0.elapsed().as_secs_f64() * 1000.0,
            "Audio resampled"
        );

        for filter in &self.filters {
            samples = self.apply_filter(filter.as_ref(), samples);
        }

        let min_samples = samples_for_ms(self.min_duration_ms, TARGET_SAMPLE_RATE);
        let original_ms = samples.len() as u64 * 1000 / TARGET_SAMPLE_RATE as u64;
        if pad_to(&mut samples, min_samples) {
            warn!(
                original_ms,
                min_duration_ms = self.min_duration_ms,
                "Audio too short, padded with silence"
            );
        }

        let waveform = Waveform::new(samples, TARGET_SAMPLE_RATE);
        info!(
            step = "total_audio_convert",
            size_bytes = audio.len(),
            audio_duration_ms = waveform.duration_ms(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Audio normalized"
        );
        Ok(waveform)
    }

    /// Runs one optional filter, keeping the input when it fails.
    fn apply_filter(&self, filter: &dyn AudioFilter, samples: Vec<f32>) -> Vec<f32> {
        let t0 = Instant::now();
        match filter.apply(&samples, TARGET_SAMPLE_RATE) {
            Ok(filtered) if filtered.len() == samples.len() => {
                info!(
                    step = filter.name(),
                    duration_ms = t0.elapsed().as_secs_f64() * 1000.0,
                    "Audio filter applied"
                );
                filtered
            }
            Ok(filtered) => {
                warn!(
                    filter = filter.name(),
                    expected = samples.len(),
                    got = filtered.len(),
                    "Audio filter changed clip length, using unfiltered audio"
                );
                samples
            }
            Err(e) => {
                warn!(filter = filter.name(), error = %e, "Audio filter skipped, using unfiltered audio");
                samples
            }
        }
    }
}
