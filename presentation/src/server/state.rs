//! Shared server state

use relay_application::RelayChatUseCase;
use std::sync::Arc;

/// State handed to every request handler
///
/// Cheap to clone; nothing in it is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayChatUseCase,
    /// Bearer token required on the chat endpoint, if any.
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(relay: RelayChatUseCase) -> Self {
        Self {
            relay,
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.map(Arc::from);
        self
    }
}
