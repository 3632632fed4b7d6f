//! Authentication and authorization module.
//!
//! - HS256 JWT verification ([`JwtAuth`])
//! - [`jwt_auth_middleware`] for protected routers
//! - [`require_permission`] to gate a single route on a named permission
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware, require_permission};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/events2", get(list).layer(from_fn_with_state("event_search_by_user_id", require_permission)))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::{jwt_auth_middleware, require_permission};
