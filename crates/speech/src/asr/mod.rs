pub mod lazy;

#[cfg(feature = "local-whisper")]
pub mod local_whisper;

#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::pipeline::Waveform;

/// Request to transcribe one utterance under one language hypothesis.
#[derive(Debug, Clone)]
pub struct AsrRequest {
    /// Canonical 16kHz mono audio, shared between passes.
    pub audio: Arc<Waveform>,
    /// Whisper language code the decoder is forced to (e.g. "te", "en").
    pub language: String,
    /// Soft decoding bias toward an expected word.
    pub prompt: Option<String>,
}

/// Trait for pluggable ASR backends.
///
/// An empty string is a valid result: nothing intelligible was heard.
#[async_trait]
pub trait AsrBackend: Send + Sync + 'static {
    async fn transcribe(&self, request: AsrRequest) -> Result<String, SpeechError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Non-speech tags whisper emits in place of a transcript.
const PLACEHOLDERS: &[&str] = &[
    "[blank_audio]",
    "[silence]",
    "[music]",
    "(silence)",
    "(music)",
    "[inaudible]",
];

/// Returns true if the text is a known Whisper placeholder.
pub fn is_hallucination(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

/// Joins segment texts into one trimmed transcript.
///
/// Placeholder segments are dropped; real words next to them are kept.
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = Vec::new();
    for segment in segments {
        words.extend(
            segment
                .as_ref()
                .split_whitespace()
                .filter(|word| !is_hallucination(word))
                .map(str::to_string),
        );
    }
    words.join(" ")
}
