use std::path::Path;

use audiopus::coder::Decoder as OpusDecoder;
use audiopus::{Channels, SampleRate};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CODEC_TYPE_OPUS, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::SpeechError;

/// Opus always decodes at 48kHz.
const OPUS_SAMPLE_RATE: u32 = 48_000;
/// Largest Opus frame: 120ms @ 48kHz.
const MAX_OPUS_FRAME_SAMPLES: usize = 5760;

/// Mono PCM straight out of the container, at the stream's native rate.
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decodes an audio file to mono f32 PCM.
///
/// The container is sniffed from the file contents; `extension_hint` only
/// changes which readers are tried first.
pub fn decode_file(path: &Path, extension_hint: &str) -> Result<DecodedAudio, SpeechError> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension_hint);

    let sniffed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SpeechError::Decode(format!("Unrecognised audio container: {e}")))?;
    let mut format = sniffed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SpeechError::Decode("No supported audio tracks found in input".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let audio = if codec_params.codec == CODEC_TYPE_OPUS {
        debug!(track_id, "Decoding Opus track with libopus");
        DecodedAudio {
            samples: decode_opus(format.as_mut(), track_id)?,
            sample_rate: OPUS_SAMPLE_RATE,
        }
    } else {
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| SpeechError::Decode(format!("Unsupported codec: {e}")))?;

        let mut samples = Vec::new();
        let mut sample_rate = codec_params.sample_rate.unwrap_or(0);

        while let Some(packet) = next_packet(format.as_mut())? {
            if packet.track_id() != track_id {
                continue;
            }
            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    let channels = spec.channels.count().max(1);
                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    downmix_into(&mut samples, buf.samples(), channels);
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping corrupt audio packet: {}", e);
                }
                Err(e) => return Err(SpeechError::Decode(e.to_string())),
            }
        }

        DecodedAudio {
            samples,
            sample_rate,
        }
    };

    // A parsed stream with no frames is silence; the normalizer pads it
    if audio.samples.is_empty() {
        debug!(track_id, "Stream contained no audio frames");
        return Ok(audio);
    }
    if audio.sample_rate == 0 {
        return Err(SpeechError::Decode("Stream did not declare a sample rate".into()));
    }
    Ok(audio)
}

/// Reads the next packet, treating end-of-stream as `None`.
fn next_packet(format: &mut dyn FormatReader) -> Result<Option<Packet>, SpeechError> {
    match format.next_packet() {
        Ok(packet) => Ok(Some(packet)),
        Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Ok(None)
        }
        Err(SymphoniaError::ResetRequired) => Ok(None),
        Err(e) => Err(SpeechError::Decode(format!("Failed to read packet: {e}"))),
    }
}

/// Decodes every packet of an Opus track straight to mono (libopus downmixes).
fn decode_opus(format: &mut dyn FormatReader, track_id: u32) -> Result<Vec<f32>, SpeechError> {
    let mut decoder = OpusDecoder::new(SampleRate::Hz48000, Channels::Mono)
        .map_err(|e| SpeechError::Decode(format!("Failed to create Opus decoder: {e}")))?;

    let mut frame = vec![0.0f32; MAX_OPUS_FRAME_SAMPLES];
    let mut pcm = Vec::new();

    while let Some(packet) = next_packet(format)? {
        if packet.track_id() != track_id || packet.data.is_empty() {
            continue;
        }
        match decoder.decode_float(Some(packet.buf()), &mut frame, false) {
            Ok(n) => pcm.extend_from_slice(&frame[..n]),
            Err(e) => warn!("Opus decode error: {}", e),
        }
    }
    Ok(pcm)
}

/// Averages interleaved frames into mono and appends them to `out`.
pub(crate) fn downmix_into(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        let mut out = Vec::new();
        downmix_into(&mut out, &[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mut out = vec![0.25];
        downmix_into(&mut out, &[0.1, 0.2], 1);
        assert_eq!(out, vec![0.25, 0.1, 0.2]);
    }

    fn wav_file(dir: &Path, frames: usize) -> std::path::PathBuf {
        let path = dir.join("clip.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample((i % 100) as i16 * 100).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn header_only_stream_decodes_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let audio = decode_file(&wav_file(dir.path(), 0), "wav").unwrap();
        assert!(audio.samples.is_empty());
    }

    #[test]
    fn pcm_stream_keeps_native_rate() {
        let dir = tempfile::tempdir().unwrap();
        let audio = decode_file(&wav_file(dir.path(), 800), "wav").unwrap();
        assert_eq!(audio.sample_rate, 16_000);
        assert_eq!(audio.samples.len(), 800);
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.webm");
        std::fs::write(&path, b"definitely not an audio container").unwrap();
        let err = decode_file(&path, "webm").err().unwrap();
        assert!(matches!(err, SpeechError::Decode(_)), "{err}");
    }
}
