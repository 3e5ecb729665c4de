use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Top-level application settings.
///
/// Layered as: built-in defaults, `config/default.toml`, `config/local.toml`,
/// then `MYRA__*` environment variables (e.g. `MYRA__SPEECH__THREADS=4`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub speech: SpeechSettings,
    pub defaults: ClientDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on an uploaded utterance, in bytes.
    pub max_audio_bytes: usize,
    /// Upper bound on the expected word and its romanization, in characters.
    pub max_text_len: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_audio_bytes: 10 * 1024 * 1024,
            max_text_len: 200,
        }
    }
}

/// Order in which the native-script and romanized passes are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStrategy {
    /// Both passes are dispatched together and joined before scoring.
    #[default]
    Concurrent,
    /// Romanized pass first; the native pass is skipped when the romanized
    /// score already clears the threshold.
    RomanizedFirst,
    /// Native pass never runs.
    RomanizedOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// GGML Whisper model file. The tiny q8_0 profile keeps CPU inference low-latency.
    pub model_path: String,
    /// CPU threads per inference call.
    pub threads: u16,
    /// Inference calls allowed to run at once across the process.
    pub max_concurrent_inference: usize,
    /// Hard cap on generated tokens per segment; single words need far fewer.
    pub max_tokens: u32,
    /// Language forced on the romanized pass.
    pub pivot_language: String,
    /// Whisper code used when an application language is not in the table.
    pub fallback_language_code: String,
    /// Bias decoding toward the expected word.
    pub initial_prompt_enabled: bool,
    pub noise_reduction_enabled: bool,
    pub highpass_enabled: bool,
    pub highpass_cutoff_hz: f32,
    /// Shorter clips are padded with trailing silence up to this length.
    pub min_duration_ms: u32,
    /// Drop non-speech audio with whisper.cpp's Silero VAD before decoding.
    pub vad_enabled: bool,
    /// GGML Silero VAD model. VAD is skipped with a warning when the file is missing.
    pub vad_model_path: String,
    /// Speech probability above which a frame counts as voiced.
    pub vad_threshold: f32,
    pub vad_min_speech_ms: u32,
    pub vad_min_silence_ms: u32,
    pub vad_speech_pad_ms: u32,
    pub pass_strategy: PassStrategy,
    /// Legacy switch: forces `PassStrategy::RomanizedOnly` when set.
    pub disable_native_pass: bool,
    /// Per-pass timeout. A pass that does not return in time fails the request.
    pub pass_timeout_secs: Option<u64>,
    /// Directory for request-scoped scratch files. `None` uses the OS temp dir.
    pub scratch_dir: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            model_path: "models/ggml-tiny-q8_0.bin".to_string(),
            threads: 2,
            max_concurrent_inference: 2,
            max_tokens: 50,
            pivot_language: "en".to_string(),
            fallback_language_code: "te".to_string(),
            initial_prompt_enabled: true,
            noise_reduction_enabled: false,
            highpass_enabled: false,
            highpass_cutoff_hz: 80.0,
            min_duration_ms: 1000,
            vad_enabled: true,
            vad_model_path: "models/ggml-silero-v5.1.2.bin".to_string(),
            vad_threshold: 0.5,
            vad_min_speech_ms: 100,
            vad_min_silence_ms: 100,
            vad_speech_pad_ms: 100,
            pass_strategy: PassStrategy::Concurrent,
            disable_native_pass: false,
            pass_timeout_secs: None,
            scratch_dir: None,
        }
    }
}

impl SpeechSettings {
    /// The strategy actually in force once the legacy switch is applied.
    pub fn effective_strategy(&self) -> PassStrategy {
        if self.disable_native_pass {
            PassStrategy::RomanizedOnly
        } else {
            self.pass_strategy
        }
    }
}

/// Defaults handed to the browser client, which keeps its own copy in session storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDefaults {
    pub languages: Vec<String>,
    /// Word categories to practice. Empty selects every category.
    pub categories: Vec<String>,
    pub child_name: String,
    pub show_romanized: bool,
    pub similarity_threshold: f64,
    pub max_attempts: u32,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            languages: vec!["telugu".to_string(), "assamese".to_string()],
            categories: Vec::new(),
            child_name: "Myra".to_string(),
            show_romanized: true,
            similarity_threshold: 50.0,
            max_attempts: 3,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("MYRA")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("defaults.languages")
                    .with_list_parse_key("defaults.categories")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let speech = &self.speech;
        if speech.model_path.trim().is_empty() {
            return Err(ConfigError::Invalid("speech.model_path cannot be empty".into()));
        }
        if speech.max_concurrent_inference == 0 {
            return Err(ConfigError::Invalid(
                "speech.max_concurrent_inference must be greater than 0".into(),
            ));
        }
        if speech.threads == 0 {
            return Err(ConfigError::Invalid("speech.threads must be greater than 0".into()));
        }
        if speech.max_tokens == 0 {
            return Err(ConfigError::Invalid("speech.max_tokens must be greater than 0".into()));
        }
        if speech.pivot_language.trim().is_empty() {
            return Err(ConfigError::Invalid("speech.pivot_language cannot be empty".into()));
        }
        if speech.highpass_cutoff_hz.is_nan() || speech.highpass_cutoff_hz <= 0.0 {
            return Err(ConfigError::Invalid("speech.highpass_cutoff_hz must be positive".into()));
        }
        if !(0.0..=1.0).contains(&speech.vad_threshold) {
            return Err(ConfigError::Invalid(
                "speech.vad_threshold must be within 0.0..=1.0".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.defaults.similarity_threshold) {
            return Err(ConfigError::Invalid(
                "defaults.similarity_threshold must be within 0..=100".into(),
            ));
        }
        if self.server.max_audio_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_audio_bytes must be greater than 0".into()));
        }
        if self.server.max_text_len == 0 {
            return Err(ConfigError::Invalid("server.max_text_len must be greater than 0".into()));
        }
        Ok(())
    }
}
