//! Responding side of the command bus.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::Result;
use crate::frame::{ReplyFrame, RequestFrame};
use crate::metrics::CommandMetrics;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Business logic behind a set of command patterns.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Patterns this handler answers; each becomes a subscription.
    fn patterns(&self) -> Vec<&'static str>;

    /// Handle one command. An `Err` is sent back as the reply frame's `err`.
    async fn handle(&self, pattern: &str, data: Value) -> Result<Value>;

    fn name(&self) -> &'static str;
}

/// Subscribes a [`CommandHandler`] to its patterns and answers every request.
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let server = CommandServer::new(broker, handler).with_queue_group("analytic");
/// server.run(shutdown_rx).await?;
/// ```
pub struct CommandServer<B: MessageBroker, H: CommandHandler> {
    broker: Arc<B>,
    handler: Arc<H>,
    queue_group: String,
    max_concurrent: usize,
}

impl<B: MessageBroker, H: CommandHandler> CommandServer<B, H> {
    pub fn new(broker: Arc<B>, handler: Arc<H>) -> Self {
        Self {
            broker,
            handler,
            queue_group: "default".to_string(),
            max_concurrent: 64,
        }
    }

    pub fn with_queue_group(mut self, queue_group: impl Into<String>) -> Self {
        self.queue_group = queue_group.into();
        self
    }

    /// Upper bound on commands in flight; values below 1 are raised to 1.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Serve until `shutdown_rx` flips to `true` or every subscription closes.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let patterns = self.handler.patterns();
        let mut streams: Vec<Box<dyn MessageStream>> = Vec::with_capacity(patterns.len());
        for pattern in &patterns {
            streams.push(self.broker.queue_subscribe(pattern, &self.queue_group).await?);
        }

        info!(
            handler = self.handler.name(),
            patterns = ?patterns,
            queue_group = %self.queue_group,
            max_concurrent = self.max_concurrent,
            "Command server started"
        );

        let metrics = CommandMetrics::new(self.handler.name());
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut listeners = JoinSet::new();
        for mut stream in streams {
            let broker = Arc::clone(&self.broker);
            let handler = Arc::clone(&self.handler);
            let permits = Arc::clone(&permits);
            let metrics = metrics.clone();

            listeners.spawn(async move {
                while let Some(message) = stream.next().await {
                    let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                        break;
                    };
                    metrics.command_started();
                    let broker = Arc::clone(&broker);
                    let handler = Arc::clone(&handler);
                    let metrics = metrics.clone();
                    tokio::spawn(async move {
                        respond(broker.as_ref(), handler.as_ref(), &metrics, message).await;
                        metrics.command_finished();
                        drop(permit);
                    });
                }
            });
        }

        if *shutdown_rx.borrow() {
            listeners.abort_all();
            return Ok(());
        }

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping command server");
                        break;
                    }
                }
                joined = listeners.join_next() => {
                    if let Some(Err(e)) = joined {
                        error!(error = %e, "Subscription task failed");
                    }
                    if listeners.is_empty() {
                        warn!("All subscriptions closed, stopping command server");
                        break;
                    }
                }
            }
        }

        listeners.abort_all();
        // In-flight commands finish once every permit is returned.
        let _ = permits.acquire_many(self.max_concurrent as u32).await;
        info!("Command server stopped");
        Ok(())
    }
}

async fn respond<B: MessageBroker, H: CommandHandler>(
    broker: &B,
    handler: &H,
    metrics: &CommandMetrics,
    message: ReceivedMessage,
) {
    let Some(reply_to) = message.reply else {
        warn!(subject = %message.subject, "Command without reply subject, dropping");
        return;
    };

    let reply = match RequestFrame::decode(&message.payload) {
        Ok(request) => {
            let span = info_span!("command", pattern = %request.pattern, request_id = %request.id);
            async {
                metrics.command_received(&request.pattern);
                let started = Instant::now();
                match handler.handle(&request.pattern, request.data).await {
                    Ok(response) => {
                        debug!("Command handled");
                        metrics.command_handled(&request.pattern, started.elapsed());
                        ReplyFrame::response(request.id.clone(), response)
                    }
                    Err(e) => {
                        error!(error = %e, "Command failed");
                        metrics.command_failed(&request.pattern);
                        ReplyFrame::error(request.id.clone(), e.to_string())
                    }
                }
            }
            .instrument(span)
            .await
        }
        Err(e) => {
            warn!(subject = %message.subject, error = %e, "Undecodable request frame");
            ReplyFrame::error(String::new(), e.to_string())
        }
    };

    match reply.encode() {
        Ok(bytes) => {
            if let Err(e) = broker.publish(&reply_to, bytes).await {
                error!(error = %e, "Failed to publish reply");
            }
        }
        Err(e) => error!(error = %e, "Failed to encode reply"),
    }
}
