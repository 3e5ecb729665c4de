use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The bytes could not be parsed as any supported container/codec.
    #[error("Audio decode failed: {0}")]
    Decode(String),
    /// The transcription model could not be constructed.
    #[error("Transcription model unavailable: {0}")]
    ModelUnavailable(String),
    /// The model exists but an inference call crashed.
    #[error("Transcription failed: {0}")]
    Inference(String),
    #[error("Transcription pass timed out after {0:?}")]
    Timeout(Duration),
    /// An optional filter stage failed. Never escapes the normalizer.
    #[error("Audio filter failed: {0}")]
    Filter(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Stable tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SpeechError::Decode(_) => "decode",
            SpeechError::ModelUnavailable(_) => "model_unavailable",
            SpeechError::Inference(_) => "inference",
            SpeechError::Timeout(_) => "timeout",
            SpeechError::Filter(_) => "filter",
            SpeechError::Io(_) => "io",
        }
    }

    /// Whether the failure belongs to the transcription engine rather than the input audio.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            SpeechError::ModelUnavailable(_) | SpeechError::Inference(_) | SpeechError::Timeout(_)
        )
    }
}

impl From<tokio::task::JoinError> for SpeechError {
    fn from(err: tokio::task::JoinError) -> Self {
        SpeechError::Inference(format!("worker task failed: {err}"))
    }
}
