//! HTTP routes of the gateway

pub mod events;
pub mod health;

use crate::state::AppState;
use axum::Router;
use messaging::MessageBroker;

/// `/events2` plus `/ready`; `/health` and the docs are added by [`crate::build_app`].
pub fn routes<B: MessageBroker>(state: AppState<B>) -> Router {
    Router::new()
        .merge(events::router(state.clone()))
        .merge(health::router(state))
}
