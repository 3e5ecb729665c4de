use std::sync::Arc;

use myra_config::{ClientDefaults, Settings};
use myra_speech::Recognizer;

use crate::words;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub recognizer: Arc<Recognizer>,
}

impl AppState {
    pub fn new(settings: Settings, recognizer: Recognizer) -> Self {
        Self {
            settings: Arc::new(settings),
            recognizer: Arc::new(recognizer),
        }
    }

    /// Configured client defaults, with an empty category list expanded to every category.
    pub fn client_defaults(&self) -> ClientDefaults {
        let mut defaults = self.settings.defaults.clone();
        if defaults.categories.is_empty() {
            defaults.categories = words::all_categories();
        }
        defaults
    }
}
