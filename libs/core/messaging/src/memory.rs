//! In-process broker with NATS-like queue-group and request/reply semantics.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::{MessagingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};
use uuid::Uuid;

#[derive(Default)]
struct QueueGroup {
    members: Vec<mpsc::UnboundedSender<ReceivedMessage>>,
    next: usize,
}

#[derive(Default)]
struct Inner {
    subjects: Mutex<HashMap<String, QueueGroup>>,
    inboxes: Mutex<HashMap<String, oneshot::Sender<Vec<u8>>>>,
}

/// Broker living entirely inside the process.
///
/// Every subscriber on a subject is treated as one queue group member and
/// messages are handed out round-robin. Clones share the same bus.
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    inner: Arc<Inner>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand `message` to one live member of the subject's group.
    fn deliver(&self, message: ReceivedMessage) -> bool {
        let mut subjects = self
            .inner
            .subjects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(group) = subjects.get_mut(&message.subject) else {
            return false;
        };

        let mut message = message;
        while !group.members.is_empty() {
            let index = group.next % group.members.len();
            match group.members[index].send(message) {
                Ok(()) => {
                    group.next = index + 1;
                    return true;
                }
                Err(mpsc::error::SendError(returned)) => {
                    trace!(subject = %returned.subject, "Dropping closed subscriber");
                    group.members.remove(index);
                    message = returned;
                }
            }
        }
        false
    }

    fn take_inbox(&self, subject: &str) -> Option<oneshot::Sender<Vec<u8>>> {
        self.inner
            .inboxes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(subject)
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        if let Some(inbox) = self.take_inbox(subject) {
            // The requester may have timed out already.
            let _ = inbox.send(payload);
            return Ok(());
        }

        let delivered = self.deliver(ReceivedMessage {
            subject: subject.to_string(),
            payload,
            reply: None,
        });
        if !delivered {
            debug!(subject, "Published with no subscribers");
        }
        Ok(())
    }

    async fn request(&self, subject: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        let inbox = format!("_INBOX.{}", Uuid::new_v4().simple());
        let (tx, rx) = oneshot::channel();
        self.inner
            .inboxes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(inbox.clone(), tx);

        let delivered = self.deliver(ReceivedMessage {
            subject: subject.to_string(),
            payload,
            reply: Some(inbox.clone()),
        });
        if !delivered {
            self.take_inbox(&inbox);
            return Err(MessagingError::NoResponders {
                subject: subject.to_string(),
            });
        }

        rx.await.map_err(|_| MessagingError::Request {
            subject: subject.to_string(),
            message: "reply inbox closed".to_string(),
        })
    }

    async fn queue_subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Box<dyn MessageStream>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subjects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(subject.to_string())
            .or_default()
            .members
            .push(tx);

        debug!(subject, queue_group, "In-memory queue subscription");
        Ok(Box::new(InMemoryStream { rx }))
    }
}

struct InMemoryStream {
    rx: mpsc::UnboundedReceiver<ReceivedMessage>,
}

#[async_trait]
impl MessageStream for InMemoryStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        self.rx.recv().await
    }
}
