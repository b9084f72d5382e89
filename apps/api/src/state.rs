use std::sync::Arc;

use crate::llm_client::GenerativeBackend;
use crate::tracker::store::TrackerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TrackerStore>,
    /// `None` when the backend credential is absent; the submit pipeline
    /// then reports a blocking error without touching the store.
    pub llm: Option<Arc<dyn GenerativeBackend>>,
}
