use std::sync::Arc;

use quire_export::pdf::PdfRenderer;
use quire_storage::store::ObjectStore;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Built once at startup. Nothing in here is mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn PdfRenderer>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn PdfRenderer>, store: Arc<dyn ObjectStore>) -> Self {
        Self { renderer, store }
    }
}
