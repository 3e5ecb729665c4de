use std::path::Path;

use myra_config::SpeechSettings;
use tracing::warn;

/// Voice activity detection handed to whisper.cpp's built-in Silero model.
///
/// Non-speech stretches anywhere in the clip (leading, trailing or between
/// syllables) are dropped before decoding; a clip with no speech at all
/// decodes to an empty transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct VadOptions {
    pub model_path: String,
    /// Speech probability above which a frame counts as voiced.
    pub threshold: f32,
    pub min_speech_ms: u32,
    pub min_silence_ms: u32,
    /// Context kept around each detected speech segment.
    pub speech_pad_ms: u32,
}

impl VadOptions {
    /// Resolves the VAD configuration, or `None` when it is switched off or
    /// its model file cannot be used. Inference then runs on the whole clip.
    pub fn from_settings(settings: &SpeechSettings) -> Option<Self> {
        if !settings.vad_enabled {
            return None;
        }
        let model_path = settings.vad_model_path.trim();
        if model_path.is_empty() || model_path.contains('\0') {
            warn!(vad_model_path = %model_path, "Invalid VAD model path, VAD disabled");
            return None;
        }
        if !Path::new(model_path).is_file() {
            warn!(vad_model_path = %model_path, "VAD model not found, VAD disabled");
            return None;
        }

        Some(Self {
            model_path: model_path.to_string(),
            threshold: settings.vad_threshold,
            min_speech_ms: settings.vad_min_speech_ms,
            min_silence_ms: settings.vad_min_silence_ms,
            speech_pad_ms: settings.vad_speech_pad_ms,
        })
    }
}
