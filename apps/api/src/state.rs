use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::ResumeBackend;
use crate::config::Config;
use crate::session::MatchSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable backend client. Default: `HttpBackend` against `config.backend_url`.
    pub backend: Arc<dyn ResumeBackend>,
    /// The one matching session this process serves. Reset replaces it with `Default`.
    pub session: Arc<RwLock<MatchSession>>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn ResumeBackend>) -> Self {
        Self {
            config,
            backend,
            session: Arc::new(RwLock::new(MatchSession::default())),
        }
    }
}
