use serde::Serialize;

use crate::error::SpeechError;
use crate::scoring::round_score;

/// Raw browser-recorded audio plus its declared (untrusted) MIME type.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub audio: Vec<u8>,
    pub mime_type: String,
}

impl Utterance {
    pub fn new(audio: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// The word the child was asked to say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedTarget {
    /// Target word in its own script.
    pub native: String,
    /// Latin pronunciation guide. Empty means no romanized comparison.
    pub romanized: String,
}

impl ExpectedTarget {
    pub fn new(native: impl Into<String>, romanized: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            romanized: romanized.into(),
        }
    }

    pub fn has_romanized(&self) -> bool {
        !self.romanized.trim().is_empty()
    }
}

/// Everything besides the audio that one recognition needs.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// Application language name, e.g. "telugu".
    pub language: String,
    pub expected: ExpectedTarget,
    /// Minimum best similarity (0..=100) for a correct verdict.
    pub threshold: f64,
}

/// Transcripts produced by the two passes. A pass that did not run is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptPair {
    pub native: String,
    pub romanized: String,
}

/// Whether one pass ran and how long it took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PassReport {
    pub ran: bool,
    pub skipped: bool,
    pub duration_ms: u64,
}

impl PassReport {
    pub fn ran(duration_ms: u64) -> Self {
        Self {
            ran: true,
            skipped: false,
            duration_ms,
        }
    }

    pub fn skipped() -> Self {
        Self {
            ran: false,
            skipped: true,
            duration_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PassReports {
    pub native: PassReport,
    pub romanized: PassReport,
}

/// Outcome of one recognition request.
///
/// Built only through [`Verdict::from_scores`] and [`Verdict::failed`], which
/// keep `similarity`, `is_correct` and `transcribed` consistent with the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Transcript of whichever pass scored higher (native on ties).
    pub transcribed: String,
    pub expected: String,
    pub similarity: f64,
    pub script_similarity: f64,
    pub roman_similarity: f64,
    pub is_correct: bool,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub passes: PassReports,
    #[serde(skip)]
    pub transcripts: TranscriptPair,
}

impl Verdict {
    /// Derives the verdict from the two raw scores.
    ///
    /// Scores are rounded to one decimal first so the reported numbers satisfy
    /// `similarity == max(script, roman)` and `is_correct == similarity >= threshold`.
    pub fn from_scores(
        request: &RecognitionRequest,
        transcripts: TranscriptPair,
        script_similarity: f64,
        roman_similarity: f64,
        passes: PassReports,
    ) -> Self {
        let script_similarity = round_score(script_similarity);
        let roman_similarity = round_score(roman_similarity);
        let similarity = script_similarity.max(roman_similarity);

        let transcribed = if roman_similarity > script_similarity {
            transcripts.romanized.clone()
        } else {
            transcripts.native.clone()
        };

        Self {
            transcribed,
            expected: request.expected.native.clone(),
            similarity,
            script_similarity,
            roman_similarity,
            is_correct: similarity >= request.threshold,
            language: request.language.clone(),
            error: None,
            passes,
            transcripts,
        }
    }

    /// The zeroed verdict returned for any failure inside recognition.
    pub fn failed(request: &RecognitionRequest, error: &SpeechError) -> Self {
        Self {
            transcribed: String::new(),
            expected: request.expected.native.clone(),
            similarity: 0.0,
            script_similarity: 0.0,
            roman_similarity: 0.0,
            is_correct: false,
            language: request.language.clone(),
            error: Some(error.to_string()),
            passes: PassReports::default(),
            transcripts: TranscriptPair::default(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
