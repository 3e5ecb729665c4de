pub mod error;
pub mod routes;
pub mod state;
pub mod words;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Room for the text fields and multipart framing around the audio part.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.settings.server.max_audio_bytes + FORM_OVERHEAD_BYTES;
    let api = Router::new()
        .route("/config", get(routes::config::get).post(routes::config::save))
        .route("/word", get(routes::words::random))
        .route("/words/all", get(routes::words::all))
        .route(
            "/recognize",
            post(routes::recognize::recognize).layer(DefaultBodyLimit::max(body_limit)),
        );

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use myra_config::Settings;
    use myra_speech::asr::scripted::ScriptedBackend;
    use myra_speech::{AudioNormalizer, Recognizer};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let settings = Settings::default();
        let recognizer = Recognizer::new(
            Arc::new(AudioNormalizer::from_settings(&settings.speech)),
            Arc::new(ScriptedBackend::new()),
            &settings.speech,
        );
        build_router(AppState::new(settings, recognizer))
    }

    async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
        let resp = app()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, json) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn config_serves_client_defaults() {
        let (status, json) = get_json("/api/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["similarity_threshold"], 50.0);
        assert_eq!(json["languages"], serde_json::json!(["telugu", "assamese"]));
        assert_eq!(json["categories"].as_array().unwrap().len(), words::CATEGORIES.len());
    }

    #[tokio::test]
    async fn word_route_serves_requested_category() {
        let (status, json) = get_json("/api/word?languages=assamese&categories=numbers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["language"], "assamese");
        assert_eq!(json["category"], "numbers");
    }
}
