//! Event repository trait

use crate::error::Result;
use crate::models::{Event, NewEvent};
use async_trait::async_trait;

/// Storage for event records.
///
/// Identifiers that are not valid for the store are lookup misses, never errors.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All events of an owner, in insertion order
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Event>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>>;

    /// Store a new event, assigning its id and timestamps
    async fn insert(&self, event: NewEvent) -> Result<Event>;

    /// Replace a stored event and bump `updated_at`.
    ///
    /// Fails with [`EventError::NotFound`](crate::EventError::NotFound) when
    /// the record is gone.
    async fn save(&self, event: Event) -> Result<Event>;

    /// Returns whether a record was removed
    async fn delete(&self, id: &str) -> Result<bool>;
}
