//! Events gateway
//!
//! Serves `/events2` over HTTP. Each request is authenticated with a bearer
//! JWT and checked for the permission named after its command. It is then
//! forwarded over NATS to the analytic service and the reply envelope is
//! translated back into an HTTP status and `{message, data, errors}` body.
//!
//! ```text
//! client ─► jwt_auth_middleware ─► require_permission(<command>)
//!        ─► handler(Caller) ─► CommandClient ─► NATS ─► analytic
//! ```

pub mod api;
pub mod caller;
pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::{JwtAuth, ShutdownCoordinator, create_production_app, create_router, health_router};
use config::Config;
use core_config::AppInfo;
use core_config::tracing::init_tracing;
use eyre::WrapErr;
use messaging::nats::NatsBroker;
use messaging::{CommandClient, MessageBroker};
use state::AppState;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Full HTTP app: API routes, docs, middleware stack and `/health`.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is not usable.
pub fn build_app<B: MessageBroker>(state: AppState<B>, app: AppInfo) -> io::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(api::routes(state))?;
    Ok(router.merge(health_router(app)))
}

/// Run the gateway until SIGINT/SIGTERM.
pub async fn run() -> eyre::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = ?config.environment,
        "Starting events gateway"
    );

    let broker = Arc::new(
        NatsBroker::connect(&config.nats)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", config.nats.url))?,
    );

    let state = AppState::new(
        CommandClient::new(Arc::clone(&broker), config.nats.request_timeout),
        JwtAuth::new(&config.jwt),
    );
    let app = build_app(state, config.app).wrap_err("Failed to build router")?;

    create_production_app(
        app,
        &config.server,
        ShutdownCoordinator::new(),
        Duration::from_secs(30),
        async move {
            if let Err(e) = broker.flush().await {
                warn!(error = %e, "Failed to flush NATS connection");
            }
            info!("NATS connection closed");
        },
    )
    .await
    .wrap_err("Server error")?;

    info!("Events gateway shutdown complete");
    Ok(())
}
