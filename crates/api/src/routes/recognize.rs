use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use myra_speech::language::is_supported;
use myra_speech::{ExpectedTarget, RecognitionRequest, Utterance, Verdict};
use tracing::{debug, info};
use validator::{Validate, ValidationError};

use crate::{error::ApiError, state::AppState};

const DEFAULT_AUDIO_FORMAT: &str = "audio/webm";

/// Validated text fields of a recognition upload.
#[derive(Debug, Validate)]
pub struct RecognizeForm {
    #[validate(custom(function = "validate_language"))]
    pub language: String,
    #[validate(length(min = 1, message = "expected_word cannot be empty"))]
    pub expected_word: String,
    pub romanized: String,
    pub audio_format: String,
    #[validate(custom(function = "validate_threshold"))]
    pub similarity_threshold: f64,
}

impl RecognizeForm {
    /// Enforces the configured text length limit (in characters, not bytes).
    fn check_text_len(&self, max: usize) -> Result<(), ApiError> {
        for (field, value) in [("expected_word", &self.expected_word), ("romanized", &self.romanized)] {
            if value.chars().count() > max {
                return Err(ApiError::Validation(format!(
                    "{field} must be at most {max} characters"
                )));
            }
        }
        Ok(())
    }
}

fn validate_language(language: &str) -> Result<(), ValidationError> {
    if is_supported(language) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_language")
            .with_message(format!("Unsupported language '{language}'").into()))
    }
}

// validator passes Copy fields by value
fn validate_threshold(threshold: f64) -> Result<(), ValidationError> {
    if threshold.is_finite() && (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ValidationError::new("threshold_range")
            .with_message("similarity_threshold must be between 0 and 100".into()))
    }
}

#[derive(Default)]
struct Upload {
    audio: Option<Bytes>,
    audio_content_type: Option<String>,
    language: Option<String>,
    expected_word: Option<String>,
    romanized: Option<String>,
    audio_format: Option<String>,
    similarity_threshold: Option<String>,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut upload = Upload::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "audio" => {
                    upload.audio_content_type = field.content_type().map(str::to_string);
                    upload.audio = Some(field.bytes().await?);
                }
                "language" => upload.language = Some(field.text().await?),
                "expected_word" => upload.expected_word = Some(field.text().await?),
                "romanized" => upload.romanized = Some(field.text().await?),
                "audio_format" => upload.audio_format = Some(field.text().await?),
                "similarity_threshold" => upload.similarity_threshold = Some(field.text().await?),
                _ => debug!(field = %name, "Ignoring unknown form field"),
            }
        }
        Ok(upload)
    }

    fn into_form(self, default_threshold: f64) -> Result<(Bytes, RecognizeForm), ApiError> {
        let audio = self
            .audio
            .ok_or_else(|| ApiError::Validation("audio file is required".to_string()))?;
        let language = self
            .language
            .ok_or_else(|| ApiError::Validation("language is required".to_string()))?;
        let expected_word = self
            .expected_word
            .ok_or_else(|| ApiError::Validation("expected_word is required".to_string()))?;

        let similarity_threshold = match self.similarity_threshold {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                ApiError::Validation(format!("similarity_threshold must be a number, got '{raw}'"))
            })?,
            None => default_threshold,
        };

        let audio_format = self
            .audio_format
            .or(self.audio_content_type)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string());

        Ok((
            audio,
            RecognizeForm {
                language,
                expected_word,
                romanized: self.romanized.unwrap_or_default(),
                audio_format,
                similarity_threshold,
            },
        ))
    }
}

/// Judges one spoken attempt uploaded as multipart form data.
pub async fn recognize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Verdict>, ApiError> {
    let limits = &state.settings.server;
    let (audio, form) =
        Upload::read(multipart).await?.into_form(state.settings.defaults.similarity_threshold)?;

    if audio.len() > limits.max_audio_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Audio upload exceeds {} bytes",
            limits.max_audio_bytes
        )));
    }
    if audio.is_empty() {
        return Err(ApiError::BadRequest("Empty audio file received.".to_string()));
    }
    form.validate()?;
    form.check_text_len(limits.max_text_len)?;

    info!(
        language = %form.language,
        size_bytes = audio.len(),
        audio_format = %form.audio_format,
        threshold = form.similarity_threshold,
        "Recognition requested"
    );

    let verdict = state
        .recognizer
        .recognize(
            Utterance::new(audio.to_vec(), form.audio_format),
            RecognitionRequest {
                language: form.language,
                expected: ExpectedTarget::new(form.expected_word, form.romanized),
                threshold: form.similarity_threshold,
            },
        )
        .await;

    Ok(Json(verdict))
}
