//! Prometheus metrics for the responding side.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Per-pattern command counters.
#[derive(Clone)]
pub struct CommandMetrics {
    handler: &'static str,
}

impl CommandMetrics {
    pub fn new(handler: &'static str) -> Self {
        Self { handler }
    }

    pub fn command_received(&self, pattern: &str) {
        counter!(
            "command_bus_commands_received_total",
            "handler" => self.handler,
            "pattern" => pattern.to_string()
        )
        .increment(1);
    }

    pub fn command_handled(&self, pattern: &str, duration: Duration) {
        counter!(
            "command_bus_commands_handled_total",
            "handler" => self.handler,
            "pattern" => pattern.to_string()
        )
        .increment(1);

        histogram!(
            "command_bus_command_duration_seconds",
            "handler" => self.handler,
            "pattern" => pattern.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// The handler returned an error, so the reply carried `err`.
    pub fn command_failed(&self, pattern: &str) {
        counter!(
            "command_bus_commands_failed_total",
            "handler" => self.handler,
            "pattern" => pattern.to_string()
        )
        .increment(1);
    }

    /// A command was admitted past the concurrency limit.
    pub fn command_started(&self) {
        gauge!("command_bus_commands_in_flight", "handler" => self.handler).increment(1.0);
    }

    /// The reply for an admitted command was sent.
    pub fn command_finished(&self) {
        gauge!("command_bus_commands_in_flight", "handler" => self.handler).decrement(1.0);
    }
}

/// Install the global Prometheus recorder.
#[cfg(feature = "health")]
pub fn init_metrics()
-> Result<metrics_exporter_prometheus::PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
}
