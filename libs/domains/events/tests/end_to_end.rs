//! The event command lifecycle over the in-process bus
//!
//! Commands travel as request frames through `InMemoryBroker`, are answered by
//! `CommandServer` + `EventCommandHandler`, and come back as envelopes.

use domain_events::*;
use messaging::{CommandClient, CommandServer, InMemoryBroker};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use test_utils::assertions::{assert_outcome, assert_some};
use tokio::sync::watch;

struct Harness {
    client: CommandClient<InMemoryBroker>,
    shutdown: watch::Sender<bool>,
    server: tokio::task::JoinHandle<messaging::Result<()>>,
}

impl Harness {
    async fn start() -> Self {
        let broker = Arc::new(InMemoryBroker::new());
        let handler = EventCommandHandler::new(EventService::new(InMemoryEventRepository::new()));
        let server = CommandServer::new(Arc::clone(&broker), Arc::new(handler))
            .with_queue_group("analytic");
        let (shutdown, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(async move { server.run(shutdown_rx).await });

        let client = CommandClient::new(broker, Duration::from_secs(2));
        // Wait until the server has subscribed
        for _ in 0..100 {
            let probe: messaging::Result<SearchEventsResponse> =
                client.send(EVENT_SEARCH_BY_USER_ID, &json!("probe")).await;
            if probe.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            client,
            shutdown,
            server,
        }
    }

    async fn create(&self, event: Value) -> EventResponse {
        self.client.send(EVENT_CREATE, &event).await.unwrap()
    }

    async fn update(&self, id: &str, owner_id: &str, event: Value) -> EventResponse {
        let request = UpdateEventRequest {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            event: Some(event),
        };
        self.client.send(EVENT_UPDATE_BY_ID, &request).await.unwrap()
    }

    async fn delete(&self, id: &str, owner_id: &str) -> DeleteEventResponse {
        let request = DeleteEventRequest {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
        };
        self.client.send(EVENT_DELETE_BY_ID, &request).await.unwrap()
    }

    async fn search(&self, owner_id: &str) -> SearchEventsResponse {
        self.client
            .send(EVENT_SEARCH_BY_USER_ID, &owner_id)
            .await
            .unwrap()
    }

    async fn stop(self) {
        self.shutdown.send(true).unwrap();
        self.server.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_standup_lifecycle() {
    let bus = Harness::start().await;

    let created = bus
        .create(json!({
            "name": "Standup",
            "owner_id": "u1",
            "start_time": 100,
            "duration": 15,
            "is_solved": false
        }))
        .await;
    assert_outcome(created.status, &created.message, 201, "event_create_success");
    let event = assert_some(created.event, "created event");
    assert!(!event.id.is_empty());

    let moved = bus.update(&event.id, "u1", json!({"owner_id": "u2"})).await;
    assert_outcome(
        moved.status,
        &moved.message,
        412,
        "event_update_by_id_precondition_failed",
    );
    let errors = assert_some(moved.errors, "owner errors");
    assert_eq!(errors["owner_id"].kind, FieldErrorKind::Immutable);

    let solved = bus.update(&event.id, "u1", json!({"is_solved": true})).await;
    assert_outcome(solved.status, &solved.message, 200, "event_update_by_id_success");
    let solved = assert_some(solved.event, "updated event");
    assert!(solved.is_solved);
    assert_eq!(solved.owner_id, "u1");

    let deleted = bus.delete(&event.id, "u1").await;
    assert_outcome(deleted.status, &deleted.message, 200, "event_delete_by_id_success");

    let gone = bus.update(&event.id, "u1", json!({"is_solved": false})).await;
    assert_outcome(gone.status, &gone.message, 404, "event_update_by_id_not_found");

    bus.stop().await;
}

#[tokio::test]
async fn test_search_lists_only_owner_events() {
    let bus = Harness::start().await;

    for (name, owner) in [("a", "u1"), ("b", "u2"), ("c", "u1")] {
        let created = bus
            .create(json!({
                "name": name,
                "owner_id": owner,
                "start_time": 1,
                "duration": 1,
                "is_solved": false
            }))
            .await;
        assert_eq!(created.status, 201);
    }

    let found = bus.search("u1").await;
    assert_outcome(found.status, &found.message, 200, "event_search_by_user_id_success");
    let names: Vec<_> = assert_some(found.events, "events")
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["a", "c"]);

    let empty = bus.search("").await;
    assert_outcome(empty.status, &empty.message, 400, "event_search_by_user_id_bad_request");
    assert!(empty.events.is_none());

    bus.stop().await;
}

#[tokio::test]
async fn test_create_null_payload_is_bad_request() {
    let bus = Harness::start().await;

    let response = bus.create(Value::Null).await;
    assert_outcome(response.status, &response.message, 400, "event_create_bad_request");
    assert!(response.event.is_none());
    assert!(response.errors.is_none());

    bus.stop().await;
}

#[tokio::test]
async fn test_delete_with_unknown_or_malformed_id_is_not_found() {
    let bus = Harness::start().await;

    for id in ["665f1c2e9b1d4a3f8c0e1a2b", "definitely-not-an-id"] {
        let response = bus.delete(id, "u1").await;
        assert_outcome(response.status, &response.message, 404, "event_delete_by_id_not_found");
    }

    let response = bus.delete("665f1c2e9b1d4a3f8c0e1a2b", "").await;
    assert_outcome(response.status, &response.message, 400, "event_delete_by_id_bad_request");

    bus.stop().await;
}
