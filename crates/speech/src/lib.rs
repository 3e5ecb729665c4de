pub mod asr;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod recognizer;
pub mod scoring;
pub mod vad;
pub mod verdict;

pub use asr::lazy::LazyModel;
#[cfg(feature = "local-whisper")]
pub use asr::local_whisper::LocalWhisperBackend;
pub use asr::{AsrBackend, AsrRequest};
pub use error::SpeechError;
pub use pipeline::{AudioNormalizer, Waveform};
pub use recognizer::Recognizer;
pub use scoring::{normalize_text, similarity};
pub use verdict::{
    ExpectedTarget, PassReport, PassReports, RecognitionRequest, TranscriptPair, Utterance, Verdict,
};
