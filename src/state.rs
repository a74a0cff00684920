//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortenerService;
use crate::domain::repositories::MappingRepository;

/// State cloned into every handler.
///
/// The store adapter is reached only through the service; there is no global
/// store handle.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<dyn MappingRepository>>,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService<dyn MappingRepository>>) -> Self {
        Self { shortener }
    }
}
