use serde_json::Value;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn word_has_every_field() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/word?languages=telugu&categories=animals").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    for key in ["english", "translation", "romanized", "emoji", "language", "category"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["language"], "telugu");
    assert_eq!(json["category"], "animals");
    assert!(json["romanized"].as_str().unwrap().is_ascii());
}

#[tokio::test]
async fn word_language_comes_from_selection() {
    let app = TestApp::spawn().await;

    for _ in 0..10 {
        let json: Value = app
            .get("/api/word?languages=telugu,assamese&categories=animals")
            .await
            .json()
            .await
            .unwrap();
        let language = json["language"].as_str().unwrap();
        assert!(["telugu", "assamese"].contains(&language), "got {language}");
    }
}

#[tokio::test]
async fn word_without_params_uses_defaults() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/word").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let language = json["language"].as_str().unwrap();
    assert!(["telugu", "assamese"].contains(&language));
}

#[tokio::test]
async fn word_rejects_blank_selections() {
    let app = TestApp::spawn().await;

    for query in ["languages=,&categories=animals", "languages=telugu&categories=,"] {
        let resp = app.get(&format!("/api/word?{query}")).await;
        assert_eq!(resp.status().as_u16(), 400, "{query}");
        let json: Value = resp.json().await.unwrap();
        assert!(json["message"].as_str().unwrap().contains("Go to Settings"));
    }
}

#[tokio::test]
async fn all_words_lists_each_language() {
    let app = TestApp::spawn().await;

    let json: Value = app
        .get("/api/words/all?languages=telugu,assamese&categories=colors")
        .await
        .json()
        .await
        .unwrap();
    let telugu = json["telugu"].as_array().unwrap();
    let assamese = json["assamese"].as_array().unwrap();
    assert!(!telugu.is_empty());
    assert_eq!(telugu.len(), assamese.len());
    assert!(telugu.iter().all(|w| w["category"] == "colors"));
    assert_ne!(telugu[0]["translation"], assamese[0]["translation"]);
}

#[tokio::test]
async fn all_words_without_params_covers_every_category() {
    let app = TestApp::spawn().await;

    let json: Value = app.get("/api/words/all").await.json().await.unwrap();
    let telugu = json["telugu"].as_array().unwrap();
    assert_eq!(telugu.len(), 62);
    assert!(json.get("assamese").is_some());
}
