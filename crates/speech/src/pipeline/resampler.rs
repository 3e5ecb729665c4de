use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{
    Async as AsyncResampler, FixedAsync, Indexing, Resampler as RubatoResampler,
    SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::SpeechError;

/// Input frames fed to the sinc resampler per call.
const CHUNK_FRAMES: usize = 1024;

fn resample_error(e: impl std::fmt::Display) -> SpeechError {
    SpeechError::Decode(format!("Resampling failed: {e}"))
}

/// Resamples a whole mono clip from `src_rate` to `dst_rate`.
///
/// The output is time-aligned with the input: the filter delay is dropped from
/// the front and the tail is flushed, so sample `n` of the output corresponds
/// to time `n / dst_rate` in the source.
pub fn resample_mono(audio: &[f32], src_rate: u32, dst_rate: u32) -> Result<Vec<f32>, SpeechError> {
    if src_rate == dst_rate || audio.is_empty() {
        return Ok(audio.to_vec());
    }
    if src_rate == 0 || dst_rate == 0 {
        return Err(SpeechError::Decode(format!(
            "Cannot resample {src_rate}Hz to {dst_rate}Hz"
        )));
    }

    let ratio = f64::from(dst_rate) / f64::from(src_rate);
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    // Fixed ratio, so no headroom for ratio changes
    let mut resampler =
        AsyncResampler::<f32>::new_sinc(ratio, 1.0, &params, CHUNK_FRAMES, 1, FixedAsync::Input)
            .map_err(resample_error)?;

    let delay = resampler.output_delay();
    let target_len = (audio.len() as f64 * ratio).round() as usize;
    let input = InterleavedSlice::new(audio, 1, audio.len()).map_err(resample_error)?;

    let mut block = vec![0.0f32; resampler.output_frames_max()];
    let mut output = Vec::with_capacity(delay + target_len + block.len());
    let mut consumed = 0usize;

    // Keep pumping (zeros once the input runs out) until the delayed tail is out
    while output.len() < delay + target_len {
        let offset = consumed.min(audio.len());
        let remaining = audio.len() - offset;
        let indexing = Indexing {
            input_offset: offset,
            output_offset: 0,
            partial_len: (remaining < resampler.input_frames_next()).then_some(remaining),
            active_channels_mask: None,
        };

        let block_frames = block.len();
        let mut sink = InterleavedSlice::new_mut(&mut block, 1, block_frames).map_err(resample_error)?;
        let (frames_in, frames_out) = resampler
            .process_into_buffer(&input, &mut sink, Some(&indexing))
            .map_err(resample_error)?;

        consumed += frames_in;
        output.extend_from_slice(&block[..frames_out]);
    }

    output.drain(..delay);
    output.truncate(target_len);
    Ok(output)
}
