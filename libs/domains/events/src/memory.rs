//! In-process EventRepository for tests and local runs

use crate::error::{EventError, Result};
use crate::models::{Event, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps events in insertion order behind a lock. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: ObjectId::new().to_hex(),
            name: event.name,
            description: event.description,
            owner_id: event.owner_id,
            start_time: event.start_time,
            duration: event.duration,
            is_solved: event.is_solved,
            notification_id: event.notification_id,
            created_at: now,
            updated_at: now,
        };
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn save(&self, mut event: Event) -> Result<Event> {
        let mut events = self.events.write().await;
        let Some(slot) = events.iter_mut().find(|e| e.id == event.id) else {
            return Err(EventError::NotFound { id: event.id });
        };
        event.updated_at = Utc::now();
        *slot = event.clone();
        Ok(event)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }
}
