//! Transport abstraction.

use crate::error::Result;
use async_trait::async_trait;

/// Message delivered to a subscriber
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub subject: String,
    pub payload: Vec<u8>,
    /// Inbox to answer on for request/reply
    pub reply: Option<String>,
}

/// Subject-based transport: NATS in deployments, [`crate::InMemoryBroker`]
/// in tests and single-process runs.
#[async_trait]
pub trait MessageBroker: Send + Sync + 'static {
    /// Fire-and-forget publish; also used to answer on a reply inbox.
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()>;

    /// Send a request and wait for the first reply.
    async fn request(&self, subject: &str, payload: Vec<u8>) -> Result<Vec<u8>>;

    /// Load-balanced subscription: each message goes to one member of the group.
    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>>;

    fn is_connected(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait MessageStream: Send {
    /// Next message, or `None` once the subscription is closed.
    async fn next(&mut self) -> Option<ReceivedMessage>;
}
