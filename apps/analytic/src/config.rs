use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::mongodb::MongoConfig;
use messaging::NatsConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Probe port, kept apart from the gateway's 8080
pub const DEFAULT_PORT: u16 = 8081;

/// Dispatcher configuration composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub nats: NatsConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// How often the watchdog refreshes `/ready`
    pub health_interval: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env_with_port(DEFAULT_PORT)?;

        let mut nats = NatsConfig::from_env()?;
        if std::env::var("NATS_CLIENT_NAME").is_err() {
            nats = nats.with_client_name(app.name);
        }

        let health_interval = Duration::from_secs(health_interval_secs()?);

        Ok(Self {
            app,
            mongodb,
            nats,
            server,
            environment,
            health_interval,
        })
    }
}

fn health_interval_secs() -> Result<u64, ConfigError> {
    let secs: u64 = env_parse("HEALTH_CHECK_INTERVAL_SECS", "10")?;
    if secs == 0 {
        return Err(ConfigError::ParseError {
            key: "HEALTH_CHECK_INTERVAL_SECS".to_string(),
            details: "must be at least 1".to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", None),
                ("PORT", None),
                ("NATS_CLIENT_NAME", None),
                ("NATS_QUEUE_GROUP", None),
                ("HEALTH_CHECK_INTERVAL_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), "chat-with-me-analytic");
                assert_eq!(config.server.port, DEFAULT_PORT);
                assert_eq!(config.nats.client_name, "analytic");
                assert_eq!(config.nats.queue_group, "analytic");
                assert_eq!(config.health_interval, Duration::from_secs(10));
            },
        );
    }

    #[test]
    fn test_mongo_url_is_required() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL", "MONGO_DSN"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_zero_health_interval_is_rejected() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("HEALTH_CHECK_INTERVAL_SECS", Some("0")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("HEALTH_CHECK_INTERVAL_SECS"));
            },
        );
    }
}
