//! Analytic service
//!
//! Answers the event commands (`event_search_by_user_id`, `event_create`,
//! `event_update_by_id`, `event_delete_by_id`) arriving over NATS and stores
//! events in MongoDB.
//!
//! ```text
//! NATS (queue group "analytic")
//!   ↓ request frames
//! CommandServer<NatsBroker, EventCommandHandler>
//!   ↓
//! EventService ─► MongoEventRepository ─► MongoDB
//! ```
//!
//! A small HTTP server exposes `/health`, `/ready` and `/metrics` for probes.

pub mod config;
pub mod watchdog;

use axum_helpers::{ShutdownCoordinator, create_production_app};
use config::Config;
use core_config::tracing::init_tracing;
use domain_events::{EventCommandHandler, EventService, MongoEventRepository};
use eyre::WrapErr;
use messaging::health::{HealthState, health_router};
use messaging::nats::NatsBroker;
use messaging::CommandServer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Run the dispatcher until SIGINT/SIGTERM.
///
/// # Errors
///
/// Fails when configuration is invalid, MongoDB or NATS cannot be reached at
/// startup, or the probe server cannot bind.
pub async fn run() -> eyre::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = ?config.environment,
        "Starting analytic service"
    );

    let metrics_handle = messaging::metrics::init_metrics()
        .inspect_err(|e| warn!(error = %e, "Prometheus recorder not installed"))
        .ok();

    let mongo_client = database::mongodb::connect_from_config_with_retry(&config.mongodb, None)
        .await
        .wrap_err("Failed to connect to MongoDB")?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = %config.mongodb.database(), "Connected to MongoDB");

    let repository = MongoEventRepository::new(&db);
    repository
        .create_indexes()
        .await
        .wrap_err("Failed to create event indexes")?;

    let broker = Arc::new(
        NatsBroker::connect(&config.nats)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", config.nats.url))?,
    );

    let handler = Arc::new(EventCommandHandler::new(EventService::new(repository)));
    let server = CommandServer::new(Arc::clone(&broker), handler)
        .with_queue_group(config.nats.queue_group.clone())
        .with_max_concurrent(config.nats.max_concurrent);

    let coordinator = ShutdownCoordinator::new();
    let health = HealthState::new();

    let responder = {
        let coordinator = coordinator.clone();
        let shutdown_rx = coordinator.subscribe();
        tokio::spawn(async move {
            let result = server.run(shutdown_rx).await;
            if let Err(e) = &result {
                error!(error = %e, "Command server failed");
            }
            // Without a responder the process has nothing left to do
            coordinator.shutdown();
            result
        })
    };

    let watchdog = tokio::spawn(watchdog::run(
        Arc::clone(&broker),
        mongo_client.clone(),
        health.clone(),
        config.health_interval,
        coordinator.subscribe(),
    ));

    let app = health_router(health, metrics_handle);

    create_production_app(
        app,
        &config.server,
        coordinator,
        Duration::from_secs(30),
        async move {
            match responder.await {
                Ok(Ok(())) => info!("Command server drained"),
                Ok(Err(e)) => error!(error = %e, "Command server stopped with error"),
                Err(e) => error!(error = %e, "Command server task panicked"),
            }
            let _ = watchdog.await;
            if let Err(e) = broker.flush().await {
                warn!(error = %e, "Failed to flush NATS connection");
            }
            info!("Connections closed");
        },
    )
    .await
    .wrap_err("Probe server error")?;

    info!("Analytic service shutdown complete");
    Ok(())
}
