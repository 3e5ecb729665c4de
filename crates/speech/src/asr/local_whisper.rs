use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use myra_config::SpeechSettings;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperVadParams,
};

use super::lazy::LazyModel;
use super::{AsrBackend, AsrRequest, join_segments};
use crate::error::SpeechError;
use crate::vad::VadOptions;

/// Fixed decoding configuration tuned for short single-word utterances.
#[derive(Debug, Clone)]
struct DecodeOptions {
    threads: i32,
    max_tokens: i32,
    vad: Option<VadOptions>,
}

fn to_c_int(value: u32) -> i32 {
    value.min(i32::MAX as u32) as i32
}

/// Turns on whisper.cpp's Silero VAD so non-speech audio is never decoded.
fn apply_vad(params: &mut FullParams<'_, '_>, vad: &VadOptions) {
    let mut vad_params = WhisperVadParams::new();
    vad_params.set_threshold(vad.threshold);
    vad_params.set_min_speech_duration(to_c_int(vad.min_speech_ms));
    vad_params.set_min_silence_duration(to_c_int(vad.min_silence_ms));
    vad_params.set_speech_pad(to_c_int(vad.speech_pad_ms));

    params.set_vad_model_path(Some(&vad.model_path));
    params.set_vad_params(vad_params);
    params.enable_vad(true);
}

/// Local Whisper ASR backend using whisper.cpp via whisper-rs.
///
/// The model is created once, on the first transcription, and shared by every
/// later call. Inference calls run on the blocking pool, bounded by a semaphore.
pub struct LocalWhisperBackend {
    model_path: String,
    model: LazyModel<WhisperContext>,
    permits: Arc<Semaphore>,
    options: DecodeOptions,
}

impl LocalWhisperBackend {
    /// Creates the backend handle. No weights are read until the first transcription.
    pub fn new(settings: &SpeechSettings) -> Self {
        Self {
            model_path: settings.model_path.clone(),
            model: LazyModel::new(),
            permits: Arc::new(Semaphore::new(settings.max_concurrent_inference.max(1))),
            options: DecodeOptions {
                threads: i32::from(settings.threads.max(1)),
                max_tokens: to_c_int(settings.max_tokens),
                vad: VadOptions::from_settings(settings),
            },
        }
    }

    async fn context(&self) -> Result<Arc<WhisperContext>, SpeechError> {
        let model_path = self.model_path.clone();
        self.model
            .get_or_load(move || {
                info!(model_path = %model_path, "Loading Whisper model");
                WhisperContext::new_with_params(&model_path, WhisperContextParameters::default())
                    .map_err(|e| {
                        SpeechError::ModelUnavailable(format!(
                            "Failed to load Whisper model '{}': {}",
                            model_path, e
                        ))
                    })
            })
            .await
    }

    /// Loads the model ahead of the first request.
    pub async fn warm_up(&self) -> Result<(), SpeechError> {
        self.context().await.map(|_| ())
    }
}

#[async_trait]
impl AsrBackend for LocalWhisperBackend {
    async fn transcribe(&self, request: AsrRequest) -> Result<String, SpeechError> {
        let ctx = self.context().await?;

        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| SpeechError::Inference(format!("inference pool closed: {e}")))?;

        let options = self.options.clone();
        let audio = request.audio;
        let language = request.language;
        let prompt = request.prompt;

        // whisper-rs is CPU-bound; run on blocking thread pool
        tokio::task::spawn_blocking(move || -> Result<String, SpeechError> {
            // Held until inference finishes, even if the caller stops waiting
            let _permit = permit;
            let started = Instant::now();
            let mut state = ctx
                .create_state()
                .map_err(|e| SpeechError::Inference(format!("Failed to create Whisper state: {}", e)))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_language(Some(&language));
            params.set_translate(false);
            params.set_n_threads(options.threads);
            params.set_no_timestamps(true);
            // Conditioning on earlier output spirals into repetition on Indic scripts
            params.set_no_context(true);
            params.set_single_segment(true);
            params.set_max_tokens(options.max_tokens);
            params.set_temperature(0.0);
            params.set_temperature_inc(0.0);
            params.set_no_speech_thold(0.6);
            params.set_suppress_blank(true);
            if let Some(vad) = &options.vad {
                apply_vad(&mut params, vad);
            }
            if let Some(prompt) = prompt.as_deref().filter(|p| !p.trim().is_empty()) {
                params.set_initial_prompt(prompt);
            }

            params.set_print_progress(false);
            params.set_print_special(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);

            state
                .full(params, audio.samples())
                .map_err(|e| SpeechError::Inference(format!("Whisper transcription failed: {}", e)))?;

            let n_segments = state.full_n_segments();
            let mut segments = Vec::new();
            for i in 0..n_segments {
                if let Some(segment) = state.get_segment(i)
                    && let Ok(seg_text) = segment.to_str()
                {
                    segments.push(seg_text.to_string());
                }
            }
            let text = join_segments(segments);

            debug!(
                %language,
                n_segments,
                vad = options.vad.is_some(),
                text = %text,
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Whisper transcription complete"
            );
            Ok(text)
        })
        .await
        .map_err(|e| SpeechError::Inference(format!("Whisper task join error: {}", e)))?
    }

    fn name(&self) -> &str {
        "local_whisper"
    }
}
