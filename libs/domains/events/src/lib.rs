//! Events Domain
//!
//! Event records owned by a user, stored in MongoDB and driven by four bus
//! commands. Every command is answered with an envelope
//! `{status, message, event|events, errors}`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Flow                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  bus ─► EventCommandHandler ─► EventService ─► schema       │
//! │                                      │                       │
//! │                                      ▼                       │
//! │                              EventRepository                 │
//! │                         (MongoDB | in-memory)                │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod envelope;
mod error;
mod handler;
mod memory;
mod models;
mod mongodb;
mod repository;
pub mod schema;
mod service;

pub use envelope::{
    DeleteEventRequest, DeleteEventResponse, EVENT_COMMANDS, EVENT_CREATE, EVENT_DELETE_BY_ID,
    EVENT_SEARCH_BY_USER_ID, EVENT_UPDATE_BY_ID, EventResponse, Outcome, SearchEventsResponse,
    UpdateEventRequest,
};
pub use error::{EventError, Result};
pub use handler::EventCommandHandler;
pub use memory::InMemoryEventRepository;
pub use models::{Event, FieldError, FieldErrorKind, FieldErrors, NewEvent};
pub use self::mongodb::{EVENTS_COLLECTION, MongoEventRepository};
pub use repository::EventRepository;
pub use service::EventService;
