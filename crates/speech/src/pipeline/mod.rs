pub mod decoder;
pub mod filter;
pub mod mime;
pub mod normalizer;
pub mod resampler;

pub use filter::{AudioFilter, HighPassFilter, SpectralGate};
pub use mime::ContainerHint;
pub use normalizer::AudioNormalizer;

/// Sample rate every downstream stage expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Canonical mono PCM, f32 normalized to [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}

/// Number of samples covering `ms` at `sample_rate`, rounded up.
pub(crate) fn samples_for_ms(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64).div_ceil(1000) as usize
}

/// Extends `samples` with trailing silence up to `min_samples`.
pub(crate) fn pad_to(samples: &mut Vec<f32>, min_samples: usize) -> bool {
    if samples.len() >= min_samples {
        return false;
    }
    samples.resize(min_samples, 0.0);
    true
}
