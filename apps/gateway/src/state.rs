//! Shared handler state.

use axum_helpers::JwtAuth;
use messaging::{CommandClient, MessageBroker};

/// Cloned into every request; both fields are cheap handles.
pub struct AppState<B: MessageBroker> {
    /// Forwards commands to the dispatcher
    pub client: CommandClient<B>,
    /// Verifies bearer tokens
    pub auth: JwtAuth,
}

impl<B: MessageBroker> AppState<B> {
    pub fn new(client: CommandClient<B>, auth: JwtAuth) -> Self {
        Self { client, auth }
    }
}

// derive(Clone) would require B: Clone
impl<B: MessageBroker> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            auth: self.auth.clone(),
        }
    }
}
