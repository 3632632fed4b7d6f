//! Event command dispatcher
//!
//! Each operation maps one command onto at most two repository calls and a
//! fixed set of envelope outcomes. Failures are answered with an envelope, the
//! only exception being a storage failure during search.

use crate::envelope::{
    DeleteEventRequest, DeleteEventResponse, EVENT_CREATE, EVENT_UPDATE_BY_ID, EventResponse,
    Outcome, SearchEventsResponse, UpdateEventRequest,
};
use crate::error::{EventError, Result};
use crate::repository::EventRepository;
use crate::schema;
use http::StatusCode;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

pub struct EventService<R: EventRepository> {
    repository: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// All events of `owner_id`; an empty owner is a bad request.
    #[instrument(skip(self))]
    pub async fn search_by_owner(&self, owner_id: &str) -> Result<SearchEventsResponse> {
        if owner_id.is_empty() {
            return Ok(SearchEventsResponse::bad_request());
        }

        let events = self.repository.find_by_owner(owner_id).await?;
        Ok(SearchEventsResponse::found(events))
    }

    /// Validate and store a new event.
    ///
    /// `payload` must be a JSON object; `null` or any other value is a bad request.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: Value) -> EventResponse {
        let Value::Object(fields) = payload else {
            return EventResponse::failed(
                EVENT_CREATE,
                StatusCode::BAD_REQUEST,
                Outcome::BadRequest,
                None,
            );
        };

        let result = match schema::validate_new(&fields) {
            Ok(event) => self.repository.insert(event).await,
            Err(errors) => Err(EventError::Validation(errors)),
        };

        match result {
            Ok(event) => {
                info!(event_id = %event.id, owner_id = %event.owner_id, "Event created");
                EventResponse::ok(EVENT_CREATE, StatusCode::CREATED, event)
            }
            Err(e) => precondition_failed(EVENT_CREATE, e),
        }
    }

    /// Merge the partial event onto the stored one and save it.
    #[instrument(skip(self, request), fields(event_id = %request.id))]
    pub async fn update_by_id(&self, request: UpdateEventRequest) -> EventResponse {
        if request.id.is_empty() {
            return EventResponse::failed(
                EVENT_UPDATE_BY_ID,
                StatusCode::BAD_REQUEST,
                Outcome::BadRequest,
                None,
            );
        }

        let existing = match self.repository.find_by_id(&request.id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                return EventResponse::failed(
                    EVENT_UPDATE_BY_ID,
                    StatusCode::NOT_FOUND,
                    Outcome::NotFound,
                    None,
                );
            }
            Err(e) => return precondition_failed(EVENT_UPDATE_BY_ID, e),
        };

        // A partial that is not an object carries no fields
        let partial = match request.event {
            Some(Value::Object(fields)) => fields,
            _ => Map::new(),
        };

        let fields = match schema::validate_update(&existing, &partial) {
            Ok(fields) => fields,
            Err(errors) => {
                return precondition_failed(EVENT_UPDATE_BY_ID, EventError::Validation(errors));
            }
        };

        let mut event = existing;
        event.apply(fields);
        match self.repository.save(event).await {
            Ok(event) => {
                info!("Event updated");
                EventResponse::ok(EVENT_UPDATE_BY_ID, StatusCode::OK, event)
            }
            Err(e) => precondition_failed(EVENT_UPDATE_BY_ID, e),
        }
    }

    /// Remove an event. Any storage failure answers FORBIDDEN without detail.
    #[instrument(skip(self, request), fields(event_id = %request.id))]
    pub async fn delete_by_id(&self, request: DeleteEventRequest) -> DeleteEventResponse {
        if request.id.is_empty() || request.owner_id.is_empty() {
            return DeleteEventResponse::new(StatusCode::BAD_REQUEST, Outcome::BadRequest);
        }

        match self.repository.find_by_id(&request.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return DeleteEventResponse::new(StatusCode::NOT_FOUND, Outcome::NotFound),
            Err(e) => return forbidden(e),
        }

        match self.repository.delete(&request.id).await {
            Ok(_) => {
                info!(owner_id = %request.owner_id, "Event deleted");
                DeleteEventResponse::new(StatusCode::OK, Outcome::Success)
            }
            Err(e) => forbidden(e),
        }
    }
}

fn precondition_failed(pattern: &str, error: EventError) -> EventResponse {
    let errors = match error {
        EventError::Validation(errors) => Some(errors),
        other => {
            warn!(error = %other, pattern, "Event write failed");
            None
        }
    };
    EventResponse::failed(
        pattern,
        StatusCode::PRECONDITION_FAILED,
        Outcome::PreconditionFailed,
        errors,
    )
}

fn forbidden(error: EventError) -> DeleteEventResponse {
    warn!(error = %error, "Event delete failed");
    DeleteEventResponse::new(StatusCode::FORBIDDEN, Outcome::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEventRepository;
    use crate::models::{Event, FieldErrorKind};
    use crate::repository::mock::MockEventRepository;
    use chrono::Utc;
    use serde_json::json;

    fn service() -> EventService<InMemoryEventRepository> {
        EventService::new(InMemoryEventRepository::new())
    }

    fn standup() -> Value {
        json!({
            "name": "Standup",
            "owner_id": "u1",
            "start_time": 100,
            "duration": 15,
            "is_solved": false
        })
    }

    fn stored(id: &str) -> Event {
        let now = Utc::now();
        Event {
            id: id.to_string(),
            name: "Standup".to_string(),
            description: None,
            owner_id: "u1".to_string(),
            start_time: 100,
            duration: 15,
            is_solved: false,
            notification_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn update(id: &str, event: Value) -> UpdateEventRequest {
        UpdateEventRequest {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            event: Some(event),
        }
    }

    fn delete(id: &str, owner_id: &str) -> DeleteEventRequest {
        DeleteEventRequest {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_empty_owner_is_bad_request() {
        let response = service().search_by_owner("").await.unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "event_search_by_user_id_bad_request");
        assert!(response.events.is_none());
    }

    #[tokio::test]
    async fn test_search_unknown_owner_is_ok_and_empty() {
        let response = service().search_by_owner("nobody").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.events, Some(vec![]));
    }

    #[tokio::test]
    async fn test_search_storage_failure_is_an_error() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_owner()
            .returning(|_| Err(EventError::database("connection reset")));

        let result = EventService::new(repo).search_by_owner("u1").await;
        assert!(matches!(result, Err(EventError::Database { .. })));
    }

    #[tokio::test]
    async fn test_create_returns_input_fields() {
        let response = service().create(standup()).await;

        assert_eq!(response.status, 201);
        assert_eq!(response.message, "event_create_success");
        assert!(response.errors.is_none());
        let event = response.event.unwrap();
        assert_eq!(event.name, "Standup");
        assert_eq!(event.owner_id, "u1");
        assert_eq!(event.start_time, 100);
        assert_eq!(event.duration, 15);
        assert!(!event.is_solved);
        assert!(!event.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_payload_is_bad_request() {
        let service = service();
        for payload in [Value::Null, json!("Standup")] {
            let response = service.create(payload).await;
            assert_eq!(response.status, 400);
            assert_eq!(response.message, "event_create_bad_request");
        }
        assert!(service.repository().is_empty().await);
    }

    #[tokio::test]
    async fn test_create_missing_required_field_fails_precondition() {
        for field in ["name", "owner_id", "start_time", "duration", "is_solved"] {
            let mut payload = standup();
            payload.as_object_mut().unwrap().remove(field);

            let response = service().create(payload).await;
            assert_eq!(response.status, 412, "missing {field}");
            assert_eq!(response.message, "event_create_precondition_failed");
            let errors = response.errors.unwrap();
            assert_eq!(errors[field].kind, FieldErrorKind::Required);
        }
    }

    #[tokio::test]
    async fn test_create_storage_failure_fails_precondition_without_errors() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .returning(|_| Err(EventError::database("duplicate key")));

        let response = EventService::new(repo).create(standup()).await;
        assert_eq!(response.status, 412);
        assert!(response.errors.is_none());
        assert!(response.event.is_none());
    }

    #[tokio::test]
    async fn test_update_changes_only_merged_fields() {
        let service = service();
        let created = service.create(standup()).await.event.unwrap();

        let response = service
            .update_by_id(update(&created.id, json!({"is_solved": true, "description": "daily"})))
            .await;

        assert_eq!(response.status, 200);
        assert_eq!(response.message, "event_update_by_id_success");
        let updated = response.event.unwrap();
        assert!(updated.is_solved);
        assert_eq!(updated.description.as_deref(), Some("daily"));
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.owner_id, "u1");
        assert_eq!(updated.created_at, created.created_at);

        let stored = service.repository().find_by_id(&created.id).await.unwrap();
        assert_eq!(stored, Some(updated));
    }

    #[tokio::test]
    async fn test_update_owner_change_fails_precondition() {
        let service = service();
        let created = service.create(standup()).await.event.unwrap();

        let response = service
            .update_by_id(update(&created.id, json!({"owner_id": "u2"})))
            .await;

        assert_eq!(response.status, 412);
        assert_eq!(response.message, "event_update_by_id_precondition_failed");
        let errors = response.errors.unwrap();
        assert_eq!(errors["owner_id"].kind, FieldErrorKind::Immutable);

        let stored = service.repository().find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.owner_id, "u1");
    }

    #[tokio::test]
    async fn test_update_empty_id_is_bad_request() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id().never();

        let response = EventService::new(repo)
            .update_by_id(update("", json!({})))
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "event_update_by_id_bad_request");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = service();
        for id in ["665f1c2e9b1d4a3f8c0e1a2b", "not-an-object-id"] {
            let response = service.update_by_id(update(id, json!({"owner_id": "u2"}))).await;
            assert_eq!(response.status, 404);
            assert_eq!(response.message, "event_update_by_id_not_found");
        }
    }

    #[tokio::test]
    async fn test_update_save_failure_fails_precondition() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id))));
        repo.expect_save()
            .returning(|event| Err(EventError::NotFound { id: event.id }));

        let response = EventService::new(repo)
            .update_by_id(update("665f1c2e9b1d4a3f8c0e1a2b", json!({"duration": 20})))
            .await;
        assert_eq!(response.status, 412);
        assert!(response.errors.is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_id_and_owner_without_lookup() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id().never();
        repo.expect_delete().never();
        let service = EventService::new(repo);

        for request in [delete("", "u1"), delete("665f1c2e9b1d4a3f8c0e1a2b", ""), delete("", "")] {
            let response = service.delete_by_id(request).await;
            assert_eq!(response.status, 400);
            assert_eq!(response.message, "event_delete_by_id_bad_request");
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let response = service()
            .delete_by_id(delete("665f1c2e9b1d4a3f8c0e1a2b", "u1"))
            .await;
        assert_eq!(response.status, 404);
        assert_eq!(response.message, "event_delete_by_id_not_found");
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let service = service();
        let created = service.create(standup()).await.event.unwrap();

        let response = service.delete_by_id(delete(&created.id, "u1")).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.message, "event_delete_by_id_success");
        assert!(response.errors.is_none());
        assert!(service.repository().is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_failures_are_forbidden() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id))));
        repo.expect_delete()
            .returning(|_| Err(EventError::database("not primary")));

        let response = EventService::new(repo)
            .delete_by_id(delete("665f1c2e9b1d4a3f8c0e1a2b", "u1"))
            .await;
        assert_eq!(response.status, 403);
        assert_eq!(response.message, "event_delete_by_id_forbidden");
        assert!(response.errors.is_none());

        let mut repo = MockEventRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(EventError::database("socket closed")));
        repo.expect_delete().never();

        let response = EventService::new(repo)
            .delete_by_id(delete("665f1c2e9b1d4a3f8c0e1a2b", "u1"))
            .await;
        assert_eq!(response.status, 403);
    }
}
