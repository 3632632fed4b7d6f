//! Requesting side of the command bus.

use crate::broker::MessageBroker;
use crate::error::{MessagingError, Result};
use crate::frame::{ReplyFrame, RequestFrame};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Sends named commands and waits for their typed reply.
pub struct CommandClient<B: MessageBroker> {
    broker: Arc<B>,
    timeout: Duration,
}

impl<B: MessageBroker> Clone for CommandClient<B> {
    fn clone(&self) -> Self {
        Self {
            broker: Arc::clone(&self.broker),
            timeout: self.timeout,
        }
    }
}

impl<B: MessageBroker> CommandClient<B> {
    pub fn new(broker: Arc<B>, timeout: Duration) -> Self {
        Self { broker, timeout }
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Send `data` under `pattern` and decode the responder's answer.
    ///
    /// Fails with [`MessagingError::Timeout`] when no reply arrives in time
    /// and [`MessagingError::Remote`] when the responder replied with an error.
    #[instrument(skip(self, data), fields(request_id = tracing::field::Empty))]
    pub async fn send<T, R>(&self, pattern: &str, data: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let frame = RequestFrame::new(pattern, serde_json::to_value(data)?);
        tracing::Span::current().record("request_id", frame.id.as_str());

        let raw = tokio::time::timeout(self.timeout, self.broker.request(pattern, frame.encode()?))
            .await
            .map_err(|_| MessagingError::Timeout {
                subject: pattern.to_string(),
                after: self.timeout,
            })??;

        let reply = ReplyFrame::decode(&raw)?;
        if let Some(message) = reply.err {
            return Err(MessagingError::Remote {
                pattern: pattern.to_string(),
                message,
            });
        }

        debug!("Reply received");
        Ok(serde_json::from_value(reply.response.unwrap_or(Value::Null))?)
    }
}
