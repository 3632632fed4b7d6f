//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Event, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const EVENTS_COLLECTION: &str = "events";

/// Stored shape of an [`Event`]; `_id` never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    description: Option<String>,
    owner_id: String,
    start_time: i64,
    duration: i64,
    is_solved: bool,
    notification_id: Option<i64>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl EventDocument {
    fn from_event(event: &Event, id: ObjectId) -> Self {
        Self {
            id,
            name: event.name.clone(),
            description: event.description.clone(),
            owner_id: event.owner_id.clone(),
            start_time: event.start_time,
            duration: event.duration,
            is_solved: event.is_solved,
            notification_id: event.notification_id,
            created_at: to_bson_datetime(event.created_at),
            updated_at: to_bson_datetime(event.updated_at),
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            description: doc.description,
            owner_id: doc.owner_id,
            start_time: doc.start_time,
            duration: doc.duration,
            is_solved: doc.is_solved,
            notification_id: doc.notification_id,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(EVENTS_COLLECTION),
        }
    }

    /// Create the owner index used by search
    pub async fn create_indexes(&self) -> Result<()> {
        let index = IndexModel::builder().keys(doc! { "owner_id": 1 }).build();
        self.collection.create_index(index).await?;
        debug!(collection = EVENTS_COLLECTION, "Event indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        // ObjectIds grow with insertion time
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self
            .collection
            .find(doc! { "owner_id": owner_id })
            .with_options(options)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Event::from))
    }

    #[instrument(skip(self, event), fields(owner_id = %event.owner_id))]
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let now = Utc::now();
        let document = EventDocument {
            id: ObjectId::new(),
            name: event.name,
            description: event.description,
            owner_id: event.owner_id,
            start_time: event.start_time,
            duration: event.duration,
            is_solved: event.is_solved,
            notification_id: event.notification_id,
            created_at: to_bson_datetime(now),
            updated_at: to_bson_datetime(now),
        };

        self.collection.insert_one(&document).await?;
        debug!(event_id = %document.id, "Event inserted");
        Ok(document.into())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn save(&self, mut event: Event) -> Result<Event> {
        let oid = ObjectId::parse_str(&event.id).map_err(|_| EventError::NotFound {
            id: event.id.clone(),
        })?;
        event.updated_at = Utc::now();

        let document = EventDocument::from_event(&event, oid);
        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &document)
            .await?;
        if result.matched_count == 0 {
            return Err(EventError::NotFound { id: event.id });
        }

        // Round-trip through the stored precision (milliseconds)
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}
