use std::sync::Arc;

use myra_api::{build_router, state::AppState};
use myra_config::Settings;
use myra_speech::asr::scripted::ScriptedBackend;
use myra_speech::{AudioNormalizer, Recognizer};
use reqwest::multipart::{Form, Part};

/// Upload limit used by test servers, small enough to exceed cheaply.
pub const TEST_MAX_AUDIO_BYTES: usize = 256 * 1024;

/// A running API server on an ephemeral port, backed by a scripted transcriber.
pub struct TestApp {
    pub addr: String,
    pub client: reqwest::Client,
    pub backend: Arc<ScriptedBackend>,
}

impl TestApp {
    /// Server whose transcriber hears "పిల్లి" in Telugu and "pilli" in English.
    pub async fn spawn() -> Self {
        let backend = ScriptedBackend::new()
            .reply("te", "పిల్లి")
            .reply("en", "pilli");
        Self::spawn_with(backend, |_| {}).await
    }

    pub async fn spawn_with(backend: ScriptedBackend, configure: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::default();
        settings.server.max_audio_bytes = TEST_MAX_AUDIO_BYTES;
        configure(&mut settings);

        let backend = Arc::new(backend);
        let recognizer = Recognizer::new(
            Arc::new(AudioNormalizer::from_settings(&settings.speech)),
            backend.clone(),
            &settings.speech,
        );
        let app = build_router(AppState::new(settings, recognizer));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = format!("http://{}", listener.local_addr().expect("local addr"));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            backend,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST JSON request")
    }

    pub async fn recognize(&self, form: Form) -> reqwest::Response {
        self.client
            .post(self.url("/api/recognize"))
            .multipart(form)
            .send()
            .await
            .expect("POST /api/recognize")
    }
}

/// Multipart form with the required recognition fields.
pub fn recognize_form(audio: Vec<u8>, language: &str, expected_word: &str) -> Form {
    let part = Part::bytes(audio)
        .file_name("attempt.wav")
        .mime_str("audio/wav")
        .expect("valid mime");
    Form::new()
        .part("audio", part)
        .text("language", language.to_string())
        .text("expected_word", expected_word.to_string())
}
