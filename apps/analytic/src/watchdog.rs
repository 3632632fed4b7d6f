//! Keeps the readiness probe in step with the bus and MongoDB connections.

use messaging::MessageBroker;
use messaging::health::HealthState;
use mongodb::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Poll both connections every `interval` until shutdown.
pub async fn run<B: MessageBroker>(
    broker: Arc<B>,
    mongo: Client,
    health: HealthState,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let storage = database::mongodb::check_health(&mongo).await;
                refresh(&health, broker.is_connected(), storage).await;
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
    info!("Health watchdog stopped");
}

/// Record one observation, logging only transitions.
pub async fn refresh(health: &HealthState, bus_connected: bool, storage_connected: bool) {
    let was_ready = health.is_ready().await;

    health.set_bus_connected(bus_connected).await;
    health.set_storage_connected(storage_connected).await;
    let error = match (bus_connected, storage_connected) {
        (true, true) => None,
        (false, true) => Some("NATS connection lost"),
        (true, false) => Some("MongoDB unreachable"),
        (false, false) => Some("NATS connection lost, MongoDB unreachable"),
    };
    health.set_error(error.map(str::to_string)).await;

    match (was_ready, error) {
        (true, Some(error)) => warn!(error, "Dispatcher not ready"),
        (false, None) => info!("Dispatcher ready"),
        _ => {}
    }
}
