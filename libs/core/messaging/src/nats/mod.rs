//! NATS core request/reply transport.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::config::NatsConfig;
use crate::error::{MessagingError, Result};
use async_nats::client::{RequestError, RequestErrorKind};
use async_nats::connection::State;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::{info, instrument};

/// [`MessageBroker`] backed by a NATS connection.
#[derive(Clone)]
pub struct NatsBroker {
    client: async_nats::Client,
    request_timeout: Duration,
}

impl NatsBroker {
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &NatsConfig) -> Result<Self> {
        let client = async_nats::ConnectOptions::new()
            .name(config.client_name.as_str())
            .request_timeout(Some(config.request_timeout))
            .connect(config.url.as_str())
            .await
            .map_err(|e| MessagingError::Connection {
                url: config.url.clone(),
                message: e.to_string(),
            })?;

        info!(client_name = %config.client_name, "Connected to NATS");
        Ok(Self {
            client,
            request_timeout: config.request_timeout,
        })
    }

    /// Wrap an existing client; `request_timeout` is the one it was built with.
    pub fn from_client(client: async_nats::Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    pub fn client(&self) -> &async_nats::Client {
        &self.client
    }

    /// Flush buffered publishes, used before shutting down.
    pub async fn flush(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .map_err(|e| MessagingError::Publish {
                subject: "*".to_string(),
                message: e.to_string(),
            })
    }
}

fn request_error(subject: &str, timeout: Duration, e: RequestError) -> MessagingError {
    match e.kind() {
        RequestErrorKind::NoResponders => MessagingError::NoResponders {
            subject: subject.to_string(),
        },
        RequestErrorKind::TimedOut => MessagingError::Timeout {
            subject: subject.to_string(),
            after: timeout,
        },
        _ => MessagingError::Request {
            subject: subject.to_string(),
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl MessageBroker for NatsBroker {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| MessagingError::Publish {
                subject: subject.to_string(),
                message: e.to_string(),
            })
    }

    async fn request(&self, subject: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        self.client
            .request(subject.to_string(), payload.into())
            .await
            .map(|message| message.payload.to_vec())
            .map_err(|e| request_error(subject, self.request_timeout, e))
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .map_err(|e| MessagingError::Subscribe {
                subject: subject.to_string(),
                message: e.to_string(),
            })?;

        Ok(Box::new(NatsStream { subscriber }))
    }

    fn is_connected(&self) -> bool {
        self.client.connection_state() == State::Connected
    }
}

struct NatsStream {
    subscriber: async_nats::Subscriber,
}

#[async_trait]
impl MessageStream for NatsStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        let message = self.subscriber.next().await?;
        Some(ReceivedMessage {
            subject: message.subject.to_string(),
            payload: message.payload.to_vec(),
            reply: message.reply.map(|reply| reply.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_reports_configured_duration() {
        let err = request_error(
            "event_create",
            Duration::from_millis(250),
            RequestError::from(RequestErrorKind::TimedOut),
        );
        assert!(matches!(err, MessagingError::Timeout { after, .. } if after == Duration::from_millis(250)));
        assert_eq!(err.to_string(), "request on 'event_create' timed out after 250ms");
    }

    #[test]
    fn test_no_responders_is_unavailable() {
        let err = request_error(
            "event_create",
            Duration::from_secs(5),
            RequestError::from(RequestErrorKind::NoResponders),
        );
        assert!(matches!(err, MessagingError::NoResponders { ref subject } if subject == "event_create"));
        assert!(err.is_unavailable());
    }
}
