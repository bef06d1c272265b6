//! Application state for the API server

use crate::{Config, Library};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request; both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The media library
    pub library: Arc<Library>,

    /// Configuration (read-only at runtime)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(library: Arc<Library>, config: Arc<Config>) -> Self {
        Self { library, config }
    }
}
