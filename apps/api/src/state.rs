use std::sync::Arc;

use crate::config::Config;
use crate::interview::service::SessionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owner of the interview core. Also driven by the countdown ticker.
    pub sessions: Arc<SessionService>,
    pub config: Config,
}
