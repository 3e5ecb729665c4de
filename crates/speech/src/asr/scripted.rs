use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AsrBackend, AsrRequest};
use crate::error::SpeechError;

/// What a scripted backend answers for one language code.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    /// Fails as if the model could not be constructed.
    Fail(String),
}

/// A recorded call to [`ScriptedBackend::transcribe`].
#[derive(Debug, Clone)]
pub struct ScriptedCall {
    pub language: String,
    pub prompt: Option<String>,
    pub samples: usize,
}

/// In-memory backend with canned transcripts per language code.
///
/// Languages without a script return the empty transcript.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, ScriptedReply>,
    delay: Option<Duration>,
    calls: Mutex<Vec<ScriptedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, language: &str, text: &str) -> Self {
        self.replies
            .insert(language.to_string(), ScriptedReply::Text(text.to_string()));
        self
    }

    pub fn fail(mut self, language: &str, message: &str) -> Self {
        self.replies
            .insert(language.to_string(), ScriptedReply::Fail(message.to_string()));
        self
    }

    /// Makes every call sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Highest number of calls that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AsrBackend for ScriptedBackend {
    async fn transcribe(&self, request: AsrRequest) -> Result<String, SpeechError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ScriptedCall {
                language: request.language.clone(),
                prompt: request.prompt.clone(),
                samples: request.audio.samples().len(),
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&request.language) {
            Some(ScriptedReply::Text(text)) => Ok(text.clone()),
            Some(ScriptedReply::Fail(message)) => Err(SpeechError::ModelUnavailable(message.clone())),
            None => Ok(String::new()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
