use std::time::Duration;

use myra_config::PassStrategy;
use myra_speech::asr::scripted::ScriptedBackend;
use reqwest::multipart::Part;
use serde_json::Value;

use crate::fixtures::audio::tone_wav;
use crate::fixtures::test_app::{TEST_MAX_AUDIO_BYTES, TestApp, recognize_form};

#[tokio::test]
async fn recognize_correct_attempt() {
    let app = TestApp::spawn().await;

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి")
        .text("romanized", "pilli")
        .text("audio_format", "audio/wav")
        .text("similarity_threshold", "50");
    let resp = app.recognize(form).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["transcribed"], "పిల్లి");
    assert_eq!(json["expected"], "పిల్లి");
    assert_eq!(json["similarity"], 100.0);
    assert_eq!(json["script_similarity"], 100.0);
    assert_eq!(json["roman_similarity"], 100.0);
    assert_eq!(json["is_correct"], true);
    assert_eq!(json["language"], "telugu");
    assert!(json.get("error").is_none());
    assert_eq!(json["passes"]["native"]["ran"], true);
    assert_eq!(json["passes"]["romanized"]["ran"], true);
    assert_eq!(app.backend.call_count(), 2);
}

#[tokio::test]
async fn recognize_wrong_word_is_incorrect() {
    let backend = ScriptedBackend::new()
        .reply("te", "కుక్క")
        .reply("en", "kukka");
    let app = TestApp::spawn_with(backend, |_| {}).await;

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి")
        .text("romanized", "pilli")
        .text("similarity_threshold", "80");
    let json: Value = app.recognize(form).await.json().await.unwrap();

    assert_eq!(json["is_correct"], false);
    let similarity = json["similarity"].as_f64().unwrap();
    assert!(similarity < 80.0);
    assert_eq!(
        similarity,
        json["script_similarity"]
            .as_f64()
            .unwrap()
            .max(json["roman_similarity"].as_f64().unwrap())
    );
}

#[tokio::test]
async fn recognize_romanized_first_reports_skipped_pass() {
    let backend = ScriptedBackend::new()
        .reply("te", "పిల్లి")
        .reply("en", "pilli");
    let app = TestApp::spawn_with(backend, |settings| {
        settings.speech.pass_strategy = PassStrategy::RomanizedFirst;
    })
    .await;

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి")
        .text("romanized", "pilli");
    let json: Value = app.recognize(form).await.json().await.unwrap();

    assert_eq!(json["is_correct"], true);
    assert_eq!(json["passes"]["native"]["skipped"], true);
    assert_eq!(json["passes"]["native"]["duration_ms"], 0);
    assert_eq!(json["transcribed"], "pilli");
    assert_eq!(app.backend.call_count(), 1);
}

#[tokio::test]
async fn recognize_undecodable_audio_returns_error_verdict() {
    let app = TestApp::spawn().await;

    let form = recognize_form(b"not really audio".to_vec(), "telugu", "పిల్లి");
    let resp = app.recognize(form).await;

    // Recognition failures still use a normal response envelope
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["is_correct"], false);
    assert_eq!(json["similarity"], 0.0);
    assert_eq!(json["expected"], "పిల్లి");
    assert!(json["error"].as_str().unwrap().contains("decode"));
    assert_eq!(app.backend.call_count(), 0);
}

#[tokio::test]
async fn recognize_model_failure_returns_error_verdict() {
    let backend = ScriptedBackend::new()
        .fail("te", "model weights missing")
        .fail("en", "model weights missing");
    let app = TestApp::spawn_with(backend, |_| {}).await;

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి");
    let resp = app.recognize(form).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["is_correct"], false);
    assert!(json["error"].as_str().unwrap().contains("model weights missing"));
}

#[tokio::test]
async fn recognize_pass_timeout_returns_error_verdict() {
    let backend = ScriptedBackend::new()
        .reply("te", "పిల్లి")
        .with_delay(Duration::from_secs(3));
    let app = TestApp::spawn_with(backend, |settings| {
        settings.speech.pass_timeout_secs = Some(1);
    })
    .await;

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి");
    let json: Value = app.recognize(form).await.json().await.unwrap();
    assert_eq!(json["is_correct"], false);
    assert!(json["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn recognize_rejects_empty_audio() {
    let app = TestApp::spawn().await;

    let resp = app
        .recognize(recognize_form(Vec::new(), "telugu", "పిల్లి"))
        .await;
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
    assert_eq!(json["message"], "Empty audio file received.");
}

#[tokio::test]
async fn recognize_rejects_oversized_audio() {
    let app = TestApp::spawn().await;

    let resp = app
        .recognize(recognize_form(vec![0u8; TEST_MAX_AUDIO_BYTES + 1], "telugu", "పిల్లి"))
        .await;
    assert_eq!(resp.status().as_u16(), 413);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "payload_too_large");
    assert_eq!(app.backend.call_count(), 0);
}

#[tokio::test]
async fn recognize_rejects_unknown_language() {
    let app = TestApp::spawn().await;

    let resp = app
        .recognize(recognize_form(tone_wav(0.6, 16_000, 1), "klingon", "పిల్లి"))
        .await;
    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");
}

#[tokio::test]
async fn recognize_accepts_every_supported_language() {
    let app = TestApp::spawn().await;

    for language in ["telugu", "assamese", "english"] {
        let resp = app
            .recognize(recognize_form(tone_wav(0.6, 16_000, 1), language, "cat"))
            .await;
        assert_eq!(resp.status().as_u16(), 200, "{language} was rejected");
    }
}

#[tokio::test]
async fn recognize_rejects_bad_thresholds() {
    let app = TestApp::spawn().await;

    for threshold in ["-1", "100.1", "abc", "NaN"] {
        let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి")
            .text("similarity_threshold", threshold);
        let resp = app.recognize(form).await;
        assert_eq!(resp.status().as_u16(), 422, "threshold {threshold} accepted");
    }
}

#[tokio::test]
async fn recognize_rejects_overlong_text() {
    let app = TestApp::spawn().await;

    let resp = app
        .recognize(recognize_form(tone_wav(0.6, 16_000, 1), "telugu", &"a".repeat(201)))
        .await;
    assert_eq!(resp.status().as_u16(), 422);

    let form = recognize_form(tone_wav(0.6, 16_000, 1), "telugu", "పిల్లి")
        .text("romanized", "p".repeat(201));
    assert_eq!(app.recognize(form).await.status().as_u16(), 422);
}

#[tokio::test]
async fn recognize_requires_audio_part() {
    let app = TestApp::spawn().await;

    let form = reqwest::multipart::Form::new()
        .text("language", "telugu")
        .text("expected_word", "పిల్లి");
    assert_eq!(app.recognize(form).await.status().as_u16(), 422);
}

#[tokio::test]
async fn recognize_uses_part_content_type_without_audio_format() {
    let app = TestApp::spawn().await;

    // Declared as webm but actually WAV: the container is sniffed from the bytes
    let part = Part::bytes(tone_wav(0.6, 44_100, 2))
        .file_name("attempt.webm")
        .mime_str("audio/webm;codecs=opus")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("audio", part)
        .text("language", "telugu")
        .text("expected_word", "పిల్లి")
        .text("romanized", "pilli");
    let json: Value = app.recognize(form).await.json().await.unwrap();

    assert!(json.get("error").is_none(), "unexpected error: {}", json["error"]);
    assert_eq!(json["is_correct"], true);
}
