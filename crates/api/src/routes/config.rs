use axum::{Json, extract::State};
use myra_config::ClientDefaults;
use serde_json::{Value, json};

use crate::{error::ApiError, state::AppState};

/// Fields a client may only send as JSON arrays.
const LIST_FIELDS: &[&str] = &["languages", "categories"];

/// Client-facing defaults: languages, categories, child name, threshold, attempts.
pub async fn get(State(state): State<AppState>) -> Json<ClientDefaults> {
    Json(state.client_defaults())
}

/// Checks a client configuration and returns it merged over the defaults.
///
/// Nothing is stored; the browser keeps its configuration in session storage.
pub async fn save(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(overrides) = body else {
        return Err(ApiError::BadRequest("config must be a JSON object".into()));
    };
    for field in LIST_FIELDS {
        if overrides.get(*field).is_some_and(|v| !v.is_array()) {
            return Err(ApiError::BadRequest(format!("'{field}' must be a list")));
        }
    }

    let mut merged = serde_json::to_value(state.client_defaults())?;
    if let Value::Object(config) = &mut merged {
        config.extend(overrides);
    }
    Ok(Json(json!({ "status": "ok", "config": merged })))
}
