use std::sync::Arc;

use anyhow::Context;
use myra_api::{build_router, state::AppState};
use myra_config::Settings;
use myra_speech::{AudioNormalizer, LocalWhisperBackend, Recognizer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,myra=debug"));
    let json = std::env::var("MYRA_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::load().context("loading settings")?;
    info!(
        model_path = %settings.speech.model_path,
        strategy = ?settings.speech.effective_strategy(),
        noise_reduction = settings.speech.noise_reduction_enabled,
        highpass = settings.speech.highpass_enabled,
        "Settings loaded"
    );

    let backend = Arc::new(LocalWhisperBackend::new(&settings.speech));
    // A missing model is reported per request, not at startup
    if let Err(e) = backend.warm_up().await {
        warn!(error = %e, "Whisper model warm-up failed");
    }

    let normalizer = Arc::new(AudioNormalizer::from_settings(&settings.speech));
    let recognizer = Recognizer::new(normalizer, backend, &settings.speech);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = build_router(AppState::new(settings, recognizer));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
