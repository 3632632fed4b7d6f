//! Type-safe error codes for API responses.
//!
//! Each code carries a client-facing identifier (`"NOT_FOUND"`), an integer
//! for logs and dashboards (`1004`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Forbidden;
//! assert_eq!(code.as_str(), "FORBIDDEN");
//! assert_eq!(code.code(), 1007);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ranges: 1000s client errors, 2000s command bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    /// Missing or invalid credentials
    Unauthorized,
    /// Authenticated but lacking a permission
    Forbidden,
    JsonExtraction,

    /// No responder answered on the command bus
    BusUnavailable,
    /// The responder answered with an error frame
    BusRemote,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::BusUnavailable => "BUS_UNAVAILABLE",
            Self::BusRemote => "BUS_REMOTE",
        }
    }

    /// Integer code used in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,

            Self::BusUnavailable => 2001,
            Self::BusRemote => 2002,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::JsonExtraction => "Failed to parse request body",
            Self::BusUnavailable => "Backend service did not respond",
            Self::BusRemote => "Backend service failed to handle the request",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
