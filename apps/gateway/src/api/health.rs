//! Readiness of the bus connection

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use messaging::MessageBroker;
use serde_json::Value;

pub fn router<B: MessageBroker>(state: AppState<B>) -> Router {
    Router::new()
        .route("/ready", get(readiness_check::<B>))
        .with_state(state)
}

async fn readiness_check<B: MessageBroker>(
    State(state): State<AppState<B>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let connected = state.client.broker().is_connected();
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "nats",
        Box::pin(async move {
            if connected {
                Ok(())
            } else {
                Err("disconnected".to_string())
            }
        }),
    )];
    run_health_checks(checks).await
}
