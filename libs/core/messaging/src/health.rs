//! Liveness and readiness probes for bus responders.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub bus_connected: bool,
    pub storage_connected: bool,
}

/// Shared probe state, updated by the responder's watchdog.
#[derive(Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthStateInner>>,
}

struct HealthStateInner {
    bus_connected: bool,
    storage_connected: bool,
    last_error: Option<String>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthStateInner {
                bus_connected: true,
                storage_connected: true,
                last_error: None,
            })),
        }
    }

    pub async fn set_bus_connected(&self, connected: bool) {
        self.inner.write().await.bus_connected = connected;
    }

    pub async fn set_storage_connected(&self, connected: bool) {
        self.inner.write().await.storage_connected = connected;
    }

    pub async fn set_error(&self, error: Option<String>) {
        self.inner.write().await.last_error = error;
    }

    /// Ready to take commands: both the bus and storage are reachable.
    pub async fn is_ready(&self) -> bool {
        let inner = self.inner.read().await;
        inner.bus_connected && inner.storage_connected
    }

    pub async fn status(&self) -> HealthStatus {
        let inner = self.inner.read().await;
        let status = if inner.bus_connected && inner.storage_connected {
            "healthy".to_string()
        } else {
            format!(
                "unhealthy: {}",
                inner.last_error.as_deref().unwrap_or("unknown")
            )
        };
        HealthStatus {
            status,
            bus_connected: inner.bus_connected,
            storage_connected: inner.storage_connected,
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// `/health`, `/healthz`, `/ready`, `/readyz` and, with a handle, `/metrics`.
///
/// Liveness always answers 200 while the process runs; a lost connection
/// only fails readiness.
pub fn health_router(
    state: HealthState,
    metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/readyz", get(ready_handler))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    router
}

async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.status().await))
}

async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let code = if state.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(state.status().await))
}
