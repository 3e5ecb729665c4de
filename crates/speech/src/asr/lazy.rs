use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::info;

use crate::error::SpeechError;

/// A model that is loaded on first use and then kept for the life of the process.
///
/// Concurrent first callers wait on the same load, so the loader runs at most
/// once unless it fails (a failed load is retried by the next caller). The load
/// runs in its own task: a caller that stops waiting (a pass timeout) does not
/// cancel it, and the finished model is still stored for the next request.
pub struct LazyModel<T> {
    cell: Arc<OnceCell<Arc<T>>>,
    loads: Arc<AtomicUsize>,
}

impl<T: Send + Sync + 'static> LazyModel<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the model, running `loader` on a blocking thread if it is not loaded yet.
    pub async fn get_or_load<F>(&self, loader: F) -> Result<Arc<T>, SpeechError>
    where
        F: FnOnce() -> Result<T, SpeechError> + Send + 'static,
    {
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        let cell = Arc::clone(&self.cell);
        let loads = Arc::clone(&self.loads);
        let load = tokio::spawn(async move {
            cell.get_or_try_init(|| async move {
                loads.fetch_add(1, Ordering::SeqCst);
                let started = Instant::now();
                let model = tokio::task::spawn_blocking(loader).await.map_err(|e| {
                    SpeechError::ModelUnavailable(format!("model load task failed: {e}"))
                })??;
                info!(
                    step = "model_load",
                    cold_start = true,
                    duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                    "Model loaded"
                );
                Ok::<_, SpeechError>(Arc::new(model))
            })
            .await
            .map(Arc::clone)
        });

        load.await
            .map_err(|e| SpeechError::ModelUnavailable(format!("model load task failed: {e}")))?
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of load attempts so far.
    pub fn load_attempts(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl<T: Send + Sync + 'static> Default for LazyModel<T> {
    fn default() -> Self {
        Self::new()
    }
}
