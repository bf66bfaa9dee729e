use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ArgumentModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model behind the generate endpoint. `None` when no API key is configured.
    pub model: Option<Arc<dyn ArgumentModel>>,
}
