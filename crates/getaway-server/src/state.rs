//! Shared application state for the API server.

use getaway_engine::{AccessTokens, GameService};

/// State shared by all request handlers.
pub struct AppState {
    /// The game service over the configured storage backend.
    pub service: GameService,
    /// Access tokens for the two participants.
    pub tokens: AccessTokens,
}

impl AppState {
    /// Bundle a service and token set into shared state.
    pub const fn new(service: GameService, tokens: AccessTokens) -> Self {
        Self { service, tokens }
    }
}
