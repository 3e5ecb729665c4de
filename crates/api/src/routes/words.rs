use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ApiError,
    state::AppState,
    words::{self, ListedWord, PracticeWord},
};

/// Comma-separated selections, e.g. `?languages=telugu,assamese&categories=animals`.
#[derive(Debug, Default, Deserialize)]
pub struct WordQuery {
    pub languages: Option<String>,
    pub categories: Option<String>,
}

/// Splits a comma list. A missing or empty parameter means "use the defaults";
/// a list of blanks (`","`) selects nothing.
fn selection(raw: Option<&str>, defaults: impl FnOnce() -> Vec<String>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => defaults(),
    }
}

impl WordQuery {
    fn languages(&self, state: &AppState) -> Vec<String> {
        selection(self.languages.as_deref(), || state.settings.defaults.languages.clone())
    }

    fn categories(&self, state: &AppState) -> Vec<String> {
        selection(self.categories.as_deref(), || state.client_defaults().categories)
    }
}

fn pick(languages: &[String], categories: &[String]) -> Result<PracticeWord, ApiError> {
    let mut rng = rand::rng();
    let language = languages
        .choose(&mut rng)
        .ok_or_else(|| ApiError::BadRequest("No languages configured. Go to Settings.".into()))?;
    let category = categories
        .choose(&mut rng)
        .ok_or_else(|| ApiError::BadRequest("No categories configured. Go to Settings.".into()))?;
    Ok(words::random_word(&mut rng, category, language))
}

/// A random practice word from the selected languages and categories.
pub async fn random(
    State(state): State<AppState>,
    Query(query): Query<WordQuery>,
) -> Result<Json<PracticeWord>, ApiError> {
    let word = pick(&query.languages(&state), &query.categories(&state))?;
    debug!(english = word.english, language = %word.language, "Practice word picked");
    Ok(Json(word))
}

/// Every word of the selected categories, per language, for progress tracking.
pub async fn all(
    State(state): State<AppState>,
    Query(query): Query<WordQuery>,
) -> Json<BTreeMap<String, Vec<ListedWord>>> {
    let categories = query.categories(&state);
    let listing = query
        .languages(&state)
        .into_iter()
        .map(|language| {
            let words = words::words_for(&language, &categories);
            (language, words)
        })
        .collect();
    Json(listing)
}
