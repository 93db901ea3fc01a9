use std::sync::Arc;

use crate::session::SessionRegistry;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Registry owning every active transcription session
    pub registry: Arc<SessionRegistry>,

    /// NATS connection used to wire per-session channels and listeners
    pub nats: async_nats::Client,
}
