//! Bus connection settings.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::time::Duration;

/// Settings shared by the requesting and the responding side.
///
/// Environment variables:
/// - `NATS_URL` (default: `nats://localhost:4222`)
/// - `NATS_CLIENT_NAME` (default: `events`)
/// - `NATS_QUEUE_GROUP` (default: `analytic`)
/// - `NATS_REQUEST_TIMEOUT_MS` (default: 5000)
/// - `NATS_MAX_CONCURRENT` (default: 64) - commands handled in parallel per responder
#[derive(Debug, Clone, PartialEq)]
pub struct NatsConfig {
    pub url: String,
    pub client_name: String,
    pub queue_group: String,
    pub request_timeout: Duration,
    pub max_concurrent: usize,
}

impl NatsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            client_name: "events".to_string(),
            queue_group: "analytic".to_string(),
            request_timeout: Duration::from_millis(5000),
            max_concurrent: 64,
        }
    }
}

impl FromEnv for NatsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_concurrent: usize = env_parse("NATS_MAX_CONCURRENT", "64")?;
        if max_concurrent == 0 {
            return Err(ConfigError::ParseError {
                key: "NATS_MAX_CONCURRENT".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            url: env_or_default("NATS_URL", "nats://localhost:4222"),
            client_name: env_or_default("NATS_CLIENT_NAME", "events"),
            queue_group: env_or_default("NATS_QUEUE_GROUP", "analytic"),
            request_timeout: Duration::from_millis(env_parse("NATS_REQUEST_TIMEOUT_MS", "5000")?),
            max_concurrent,
        })
    }
}
