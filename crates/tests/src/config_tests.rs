use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn health_check_reports_version() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn config_returns_client_defaults() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/config").await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    for key in [
        "languages",
        "categories",
        "child_name",
        "show_romanized",
        "similarity_threshold",
        "max_attempts",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["similarity_threshold"], 50.0);
    assert_eq!(json["max_attempts"], 3);
}

#[tokio::test]
async fn config_reflects_overrides() {
    let app = TestApp::spawn_with(Default::default(), |settings| {
        settings.defaults.child_name = "Anu".to_string();
        settings.defaults.similarity_threshold = 65.0;
    })
    .await;

    let json: Value = app.get("/api/config").await.json().await.unwrap();
    assert_eq!(json["child_name"], "Anu");
    assert_eq!(json["similarity_threshold"], 65.0);
}

#[tokio::test]
async fn save_config_merges_over_defaults() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json("/api/config", &json!({ "languages": ["telugu"], "child_name": "Anu" }))
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["config"]["languages"], json!(["telugu"]));
    assert_eq!(json["config"]["child_name"], "Anu");
    // Untouched fields keep their defaults
    assert_eq!(json["config"]["max_attempts"], 3);
    assert!(json["config"]["categories"].as_array().unwrap().contains(&json!("animals")));
}

#[tokio::test]
async fn save_config_rejects_non_list_selections() {
    let app = TestApp::spawn().await;

    for field in ["languages", "categories"] {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), json!("telugu"));
        let resp = app.post_json("/api/config", &Value::Object(body)).await;
        assert_eq!(resp.status().as_u16(), 400, "{field} accepted as a string");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], format!("'{field}' must be a list"));
    }
}

#[tokio::test]
async fn save_config_rejects_non_object_body() {
    let app = TestApp::spawn().await;

    let resp = app.post_json("/api/config", &json!(["telugu"])).await;
    assert_eq!(resp.status().as_u16(), 400);
}
