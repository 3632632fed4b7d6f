//! Error types for the command bus.

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MessagingError>;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("failed to connect to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("no responders for '{subject}'")]
    NoResponders { subject: String },

    #[error("request on '{subject}' timed out after {after:?}")]
    Timeout { subject: String, after: Duration },

    #[error("request on '{subject}' failed: {message}")]
    Request { subject: String, message: String },

    #[error("publish to '{subject}' failed: {message}")]
    Publish { subject: String, message: String },

    #[error("subscribe to '{subject}' failed: {message}")]
    Subscribe { subject: String, message: String },

    /// The responder answered with an error frame instead of a response.
    #[error("'{pattern}' failed on the responder: {message}")]
    Remote { pattern: String, message: String },

    #[error("no handler registered for pattern '{0}'")]
    UnknownPattern(String),

    #[error("handler error: {0}")]
    Handler(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MessagingError {
    pub fn handler(err: impl std::fmt::Display) -> Self {
        Self::Handler(err.to_string())
    }

    /// True when nobody answered, as opposed to an answer that was an error.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::NoResponders { .. } | Self::Timeout { .. }
        )
    }
}
