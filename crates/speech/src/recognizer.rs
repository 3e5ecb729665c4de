use std::sync::Arc;
use std::time::{Duration, Instant};

use myra_config::{PassStrategy, SpeechSettings};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::asr::{AsrBackend, AsrRequest};
use crate::error::SpeechError;
use crate::language::{is_supported, whisper_code};
use crate::pipeline::{AudioNormalizer, Waveform};
use crate::scoring::{round_score, similarity};
use crate::verdict::{
    ExpectedTarget, PassReport, PassReports, RecognitionRequest, TranscriptPair, Utterance, Verdict,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Native,
    Romanized,
}

impl Pass {
    fn step(self) -> &'static str {
        match self {
            Pass::Native => "pass_native",
            Pass::Romanized => "pass_romanized",
        }
    }
}

/// Judges one spoken attempt against an expected word.
///
/// Created once at startup and shared via `Arc`. Owns the normalizer and the
/// transcription backend; every request gets its own scratch file and waveform.
pub struct Recognizer {
    normalizer: Arc<AudioNormalizer>,
    asr: Arc<dyn AsrBackend>,
    strategy: PassStrategy,
    pivot_language: String,
    fallback_language_code: String,
    initial_prompt_enabled: bool,
    pass_timeout: Option<Duration>,
}

impl Recognizer {
    pub fn new(
        normalizer: Arc<AudioNormalizer>,
        asr: Arc<dyn AsrBackend>,
        settings: &SpeechSettings,
    ) -> Self {
        let strategy = settings.effective_strategy();
        info!(
            backend = asr.name(),
            ?strategy,
            pivot = %settings.pivot_language,
            "Recognizer created"
        );
        Self {
            normalizer,
            asr,
            strategy,
            pivot_language: settings.pivot_language.clone(),
            fallback_language_code: settings.fallback_language_code.clone(),
            initial_prompt_enabled: settings.initial_prompt_enabled,
            pass_timeout: settings.pass_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Overrides the per-pass timeout from settings.
    pub fn with_pass_timeout(mut self, timeout: Duration) -> Self {
        self.pass_timeout = Some(timeout);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.asr.name()
    }

    pub fn strategy(&self) -> PassStrategy {
        self.strategy
    }

    /// Runs the full pipeline for one utterance.
    ///
    /// Never fails: any decode or transcription error becomes a zeroed verdict
    /// with `error` set.
    pub async fn recognize(&self, utterance: Utterance, request: RecognitionRequest) -> Verdict {
        let request_id = Uuid::new_v4();
        let span = info_span!("recognize", %request_id, language = %request.language);

        async move {
            let started = Instant::now();
            let verdict = match self.try_recognize(utterance, &request).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    error!(kind = e.kind(), error = %e, "Speech recognition failed");
                    Verdict::failed(&request, &e)
                }
            };
            info!(
                step = "total_recognize",
                is_correct = verdict.is_correct,
                similarity = verdict.similarity,
                script_similarity = verdict.script_similarity,
                roman_similarity = verdict.roman_similarity,
                native_skipped = verdict.passes.native.skipped,
                failed = verdict.is_error(),
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Recognition complete"
            );
            verdict
        }
        .instrument(span)
        .await
    }

    async fn try_recognize(
        &self,
        utterance: Utterance,
        request: &RecognitionRequest,
    ) -> Result<Verdict, SpeechError> {
        let normalizer = Arc::clone(&self.normalizer);
        let waveform = tokio::task::spawn_blocking(move || {
            normalizer.normalize(&utterance.audio, &utterance.mime_type)
        })
        .await??;
        let audio = Arc::new(waveform);

        if !is_supported(&request.language) {
            warn!(
                language = %request.language,
                fallback = %self.fallback_language_code,
                "Unknown language, using fallback code"
            );
        }
        let expected = &request.expected;

        let (transcripts, passes) = match self.strategy {
            PassStrategy::Concurrent => {
                let (native, romanized) = tokio::join!(
                    self.run_pass(Pass::Native, self.native_request(&audio, request)),
                    self.run_pass(Pass::Romanized, self.romanized_request(&audio, expected)),
                );
                let (native, native_ms) = native?;
                let (romanized, romanized_ms) = romanized?;
                (
                    TranscriptPair { native, romanized },
                    PassReports {
                        native: PassReport::ran(native_ms),
                        romanized: PassReport::ran(romanized_ms),
                    },
                )
            }
            PassStrategy::RomanizedFirst => {
                let (romanized, romanized_ms) = self
                    .run_pass(Pass::Romanized, self.romanized_request(&audio, expected))
                    .await?;

                let early = round_score(roman_score(expected, &romanized)) >= request.threshold;
                let (native, native_report) = if early {
                    log_skipped(Pass::Native, "romanized score already clears threshold");
                    (String::new(), PassReport::skipped())
                } else {
                    let (native, native_ms) = self
                        .run_pass(Pass::Native, self.native_request(&audio, request))
                        .await?;
                    (native, PassReport::ran(native_ms))
                };
                (
                    TranscriptPair { native, romanized },
                    PassReports {
                        native: native_report,
                        romanized: PassReport::ran(romanized_ms),
                    },
                )
            }
            PassStrategy::RomanizedOnly => {
                log_skipped(Pass::Native, "native pass disabled");
                let (romanized, romanized_ms) = self
                    .run_pass(Pass::Romanized, self.romanized_request(&audio, expected))
                    .await?;
                (
                    TranscriptPair {
                        native: String::new(),
                        romanized,
                    },
                    PassReports {
                        native: PassReport::skipped(),
                        romanized: PassReport::ran(romanized_ms),
                    },
                )
            }
        };

        let script = similarity(&expected.native, &transcripts.native);
        let roman = roman_score(expected, &transcripts.romanized);
        Ok(Verdict::from_scores(request, transcripts, script, roman, passes))
    }

    fn native_request(&self, audio: &Arc<Waveform>, request: &RecognitionRequest) -> AsrRequest {
        AsrRequest {
            audio: Arc::clone(audio),
            language: whisper_code(&request.language, &self.fallback_language_code).to_string(),
            prompt: self.prompt(&request.expected.native),
        }
    }

    fn romanized_request(&self, audio: &Arc<Waveform>, expected: &ExpectedTarget) -> AsrRequest {
        let hint = if expected.has_romanized() {
            &expected.romanized
        } else {
            &expected.native
        };
        AsrRequest {
            audio: Arc::clone(audio),
            language: self.pivot_language.clone(),
            prompt: self.prompt(hint),
        }
    }

    fn prompt(&self, hint: &str) -> Option<String> {
        let hint = hint.trim();
        (self.initial_prompt_enabled && !hint.is_empty()).then(|| hint.to_string())
    }

    async fn run_pass(&self, pass: Pass, request: AsrRequest) -> Result<(String, u64), SpeechError> {
        let started = Instant::now();
        let language = request.language.clone();
        let transcription = self.asr.transcribe(request);

        let text = match self.pass_timeout {
            Some(limit) => tokio::time::timeout(limit, transcription)
                .await
                .map_err(|_| SpeechError::Timeout(limit))??,
            None => transcription.await?,
        };
        let text = text.trim().to_string();

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            step = pass.step(),
            %language,
            transcript = %text,
            duration_ms,
            "Transcription pass complete"
        );
        Ok((text, duration_ms))
    }
}

fn roman_score(expected: &ExpectedTarget, romanized: &str) -> f64 {
    if expected.has_romanized() {
        similarity(&expected.romanized, romanized)
    } else {
        0.0
    }
}

fn log_skipped(pass: Pass, reason: &str) {
    info!(step = pass.step(), skipped = true, duration_ms = 0u64, reason, "Transcription pass skipped");
}
