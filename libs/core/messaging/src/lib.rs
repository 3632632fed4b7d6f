//! Request/reply command bus between the gateway and backend services.
//!
//! A requester sends a [`RequestFrame`] carrying a command pattern and a JSON
//! payload; the responder subscribed to that pattern answers with a
//! [`ReplyFrame`] holding either a `response` or an `err`.
//!
//! ```text
//! ┌───────────────┐  RequestFrame   ┌──────────────┐  RequestFrame   ┌───────────────┐
//! │ CommandClient │────────────────▶│    broker    │────────────────▶│ CommandServer │
//! │   (gateway)   │◀────────────────│ NATS/memory  │◀────────────────│  (analytic)   │
//! └───────────────┘   ReplyFrame    └──────────────┘   ReplyFrame    └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use messaging::{CommandClient, CommandServer, InMemoryBroker};
//!
//! let broker = Arc::new(InMemoryBroker::new());
//! let server = CommandServer::new(broker.clone(), Arc::new(handler));
//! tokio::spawn(async move { server.run(shutdown_rx).await });
//!
//! let client = CommandClient::new(broker, Duration::from_secs(5));
//! let reply: Value = client.send("event_search_by_user_id", "u1").await?;
//! ```

mod broker;
mod client;
mod config;
mod error;
mod frame;
mod memory;
pub mod metrics;
mod server;

#[cfg(feature = "health")]
pub mod health;
#[cfg(feature = "nats")]
pub mod nats;

pub use broker::{MessageBroker, MessageStream, ReceivedMessage};
pub use client::CommandClient;
pub use config::NatsConfig;
pub use error::{MessagingError, Result};
pub use frame::{ReplyFrame, RequestFrame};
pub use memory::InMemoryBroker;
pub use metrics::CommandMetrics;
pub use server::{CommandHandler, CommandServer};

// Re-exported for implementors of the traits above.
pub use async_trait::async_trait;
