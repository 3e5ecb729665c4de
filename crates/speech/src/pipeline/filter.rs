use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use crate::error::SpeechError;

/// An optional clean-up stage applied to 16kHz mono audio.
///
/// Failures are never fatal: the normalizer keeps the unfiltered samples.
pub trait AudioFilter: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, SpeechError>;
}

/// One second-order section, transposed direct form II.
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    fn highpass(cutoff_hz: f32, sample_rate: u32, q: f32) -> Self {
        let w0 = std::f32::consts::TAU * cutoff_hz / sample_rate as f32;
        let cos = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos) / 2.0 / a0,
            b1: -(1.0 + cos) / a0,
            b2: (1.0 + cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// 4th-order Butterworth high-pass; removes rumble below the cutoff.
pub struct HighPassFilter {
    cutoff_hz: f32,
}

impl HighPassFilter {
    /// Section Qs of a 4th-order Butterworth response.
    const SECTION_Q: [f32; 2] = [0.541_196_1, 1.306_563];

    pub fn new(cutoff_hz: f32) -> Self {
        Self { cutoff_hz }
    }
}

impl AudioFilter for HighPassFilter {
    fn name(&self) -> &'static str {
        "highpass"
    }

    fn apply(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, SpeechError> {
        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < sample_rate as f32 / 2.0) {
            return Err(SpeechError::Filter(format!(
                "cutoff {}Hz outside (0, {}Hz)",
                self.cutoff_hz,
                sample_rate / 2
            )));
        }

        let mut sections: Vec<Biquad> = Self::SECTION_Q
            .iter()
            .map(|q| Biquad::highpass(self.cutoff_hz, sample_rate, *q))
            .collect();

        Ok(samples
            .iter()
            .map(|&x| sections.iter_mut().fold(x, |acc, s| s.process(acc)))
            .collect())
    }
}

/// Spectral gating noise reduction.
///
/// Estimates a per-bin noise floor from the quieter frames of the clip itself
/// and attenuates bins that do not rise clearly above it.
pub struct SpectralGate {
    n_fft: usize,
    hop: usize,
    /// Fraction of gated energy removed (0 = no-op, 1 = hard gate).
    prop_decrease: f32,
    /// Bins below `floor * gate_ratio` are gated.
    gate_ratio: f32,
    /// Percentile of per-bin magnitudes taken as the noise floor.
    floor_percentile: f32,
}

impl Default for SpectralGate {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            hop: 256,
            prop_decrease: 0.75,
            gate_ratio: 1.5,
            floor_percentile: 0.2,
        }
    }
}

impl SpectralGate {
    fn hann(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.5 - 0.5 * (std::f32::consts::TAU * i as f32 / n as f32).cos())
            .collect()
    }
}

impl AudioFilter for SpectralGate {
    fn name(&self) -> &'static str {
        "spectral_gate"
    }

    fn apply(&self, samples: &[f32], _sample_rate: u32) -> Result<Vec<f32>, SpeechError> {
        let n = self.n_fft;
        if samples.len() < n {
            return Err(SpeechError::Filter(format!(
                "clip of {} samples is shorter than the {}-sample window",
                samples.len(),
                n
            )));
        }

        let window = Self::hann(n);
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);

        // Pad so the last hop is fully covered
        let frame_count = (samples.len() - n).div_ceil(self.hop) + 1;
        let padded_len = (frame_count - 1) * self.hop + n;
        let mut padded = samples.to_vec();
        padded.resize(padded_len, 0.0);

        let mut spectra: Vec<Vec<Complex<f32>>> = Vec::with_capacity(frame_count);
        for f in 0..frame_count {
            let start = f * self.hop;
            let mut frame: Vec<Complex<f32>> = padded[start..start + n]
                .iter()
                .zip(&window)
                .map(|(s, w)| Complex::new(s * w, 0.0))
                .collect();
            forward.process(&mut frame);
            spectra.push(frame);
        }

        // Per-bin noise floor
        let rank = ((frame_count as f32 * self.floor_percentile) as usize).min(frame_count - 1);
        let mut floors = vec![0.0f32; n];
        let mut column = Vec::with_capacity(frame_count);
        for (bin, floor) in floors.iter_mut().enumerate() {
            column.clear();
            column.extend(spectra.iter().map(|s| s[bin].norm()));
            column.sort_by(|a, b| a.total_cmp(b));
            *floor = column[rank];
        }

        let attenuation = 1.0 - self.prop_decrease.clamp(0.0, 1.0);
        let mut output = vec![0.0f32; padded_len];
        let mut norm = vec![0.0f32; padded_len];
        for (f, spectrum) in spectra.iter_mut().enumerate() {
            for (bin, value) in spectrum.iter_mut().enumerate() {
                if value.norm() < floors[bin] * self.gate_ratio {
                    *value *= attenuation;
                }
            }
            inverse.process(spectrum);

            let start = f * self.hop;
            for i in 0..n {
                // rustfft does not normalize the inverse transform
                output[start + i] += spectrum[i].re / n as f32 * window[i];
                norm[start + i] += window[i] * window[i];
            }
        }

        let cleaned: Vec<f32> = output
            .iter()
            .zip(&norm)
            .zip(samples)
            .map(|((y, w), original)| if *w > 1e-6 { y / w } else { *original })
            .collect();

        if cleaned.iter().any(|s| !s.is_finite()) {
            return Err(SpeechError::Filter("noise reduction produced non-finite samples".into()));
        }
        Ok(cleaned)
    }
}
