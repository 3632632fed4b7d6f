use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use messaging::NatsConfig;

pub use core_config::Environment;

/// Gateway configuration composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub jwt: JwtConfig,
    pub nats: NatsConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let jwt = JwtConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let mut nats = NatsConfig::from_env()?;
        if std::env::var("NATS_CLIENT_NAME").is_err() {
            nats = nats.with_client_name(app.name);
        }

        Ok(Self {
            app,
            jwt,
            nats,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECRET: &str = "gateway-test-secret-with-enough-length";

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("PORT", None),
                ("NATS_CLIENT_NAME", None),
                ("NATS_REQUEST_TIMEOUT_MS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.nats.client_name, "gateway");
                assert_eq!(config.nats.request_timeout, Duration::from_secs(5));
                assert_eq!(config.jwt.secret, SECRET);
            },
        );
    }

    #[test]
    fn test_jwt_secret_required() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_explicit_client_name_wins() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("NATS_CLIENT_NAME", Some("gateway-blue")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.nats.client_name, "gateway-blue");
            },
        );
    }
}
