//! Bus adapter for the event dispatcher

use crate::envelope::{
    EVENT_COMMANDS, EVENT_CREATE, EVENT_DELETE_BY_ID, EVENT_SEARCH_BY_USER_ID, EVENT_UPDATE_BY_ID,
};
use crate::repository::EventRepository;
use crate::service::EventService;
use messaging::{CommandHandler, MessagingError, async_trait};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Answers the four event commands with their envelopes.
pub struct EventCommandHandler<R: EventRepository> {
    service: EventService<R>,
}

impl<R: EventRepository> EventCommandHandler<R> {
    pub fn new(service: EventService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &EventService<R> {
        &self.service
    }
}

#[async_trait]
impl<R: EventRepository + 'static> CommandHandler for EventCommandHandler<R> {
    fn patterns(&self) -> Vec<&'static str> {
        EVENT_COMMANDS.to_vec()
    }

    async fn handle(&self, pattern: &str, data: Value) -> messaging::Result<Value> {
        debug!(pattern, "Dispatching event command");
        match pattern {
            EVENT_SEARCH_BY_USER_ID => {
                let response = self
                    .service
                    .search_by_owner(&owner_from(&data))
                    .await
                    .map_err(MessagingError::handler)?;
                to_reply(&response)
            }
            EVENT_CREATE => to_reply(&self.service.create(data).await),
            EVENT_UPDATE_BY_ID => to_reply(&self.service.update_by_id(payload(data)).await),
            EVENT_DELETE_BY_ID => to_reply(&self.service.delete_by_id(payload(data)).await),
            other => Err(MessagingError::UnknownPattern(other.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "events"
    }
}

/// Search takes the bare owner id; `null` and non-scalars count as empty.
fn owner_from(data: &Value) -> String {
    match data {
        Value::String(owner) => owner.clone(),
        Value::Number(owner) => owner.to_string(),
        _ => String::new(),
    }
}

/// Undecodable payloads fall back to the empty request, which is a bad request.
fn payload<T: DeserializeOwned + Default>(data: Value) -> T {
    serde_json::from_value(data).unwrap_or_default()
}

fn to_reply<T: Serialize>(response: &T) -> messaging::Result<Value> {
    Ok(serde_json::to_value(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;
    use crate::memory::InMemoryEventRepository;
    use crate::repository::mock::MockEventRepository;
    use serde_json::json;

    fn handler() -> EventCommandHandler<InMemoryEventRepository> {
        EventCommandHandler::new(EventService::new(InMemoryEventRepository::new()))
    }

    #[test]
    fn test_answers_all_event_commands() {
        assert_eq!(
            handler().patterns(),
            vec![
                "event_search_by_user_id",
                "event_create",
                "event_update_by_id",
                "event_delete_by_id"
            ]
        );
    }

    #[tokio::test]
    async fn test_search_with_null_owner_is_bad_request() {
        let reply = handler()
            .handle(EVENT_SEARCH_BY_USER_ID, Value::Null)
            .await
            .unwrap();
        assert_eq!(
            reply,
            json!({"status": 400, "message": "event_search_by_user_id_bad_request", "events": null})
        );
    }

    #[tokio::test]
    async fn test_malformed_update_payload_is_bad_request() {
        let reply = handler()
            .handle(EVENT_UPDATE_BY_ID, json!({"id": 42}))
            .await
            .unwrap();
        assert_eq!(reply["status"], 400);
        assert_eq!(reply["message"], "event_update_by_id_bad_request");
        assert_eq!(reply["event"], Value::Null);
        assert_eq!(reply["errors"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_accepts_user_id_alias() {
        let handler = handler();
        let created = handler
            .handle(
                EVENT_CREATE,
                json!({"name": "n", "user_id": "u1", "start_time": 1, "duration": 2, "is_solved": false}),
            )
            .await
            .unwrap();
        assert_eq!(created["event"]["owner_id"], "u1");

        let reply = handler
            .handle(
                EVENT_DELETE_BY_ID,
                json!({"id": created["event"]["id"], "userId": "u1"}),
            )
            .await
            .unwrap();
        assert_eq!(reply["status"], 200);
    }

    #[tokio::test]
    async fn test_search_storage_failure_becomes_handler_error() {
        let mut repo = MockEventRepository::new();
        repo.expect_find_by_owner()
            .returning(|_| Err(EventError::database("timed out")));
        let handler = EventCommandHandler::new(EventService::new(repo));

        let err = handler
            .handle(EVENT_SEARCH_BY_USER_ID, json!("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::Handler(_)));
    }

    #[tokio::test]
    async fn test_unknown_pattern() {
        let err = handler().handle("event_archive", Value::Null).await.unwrap_err();
        assert!(matches!(err, MessagingError::UnknownPattern(p) if p == "event_archive"));
    }
}
