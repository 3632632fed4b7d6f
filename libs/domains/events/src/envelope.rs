//! Command names, payloads and the response envelopes exchanged over the bus.

use crate::models::{Event, FieldError, FieldErrors};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

pub const EVENT_SEARCH_BY_USER_ID: &str = "event_search_by_user_id";
pub const EVENT_CREATE: &str = "event_create";
pub const EVENT_UPDATE_BY_ID: &str = "event_update_by_id";
pub const EVENT_DELETE_BY_ID: &str = "event_delete_by_id";

/// Every command the dispatcher answers
pub const EVENT_COMMANDS: [&str; 4] = [
    EVENT_SEARCH_BY_USER_ID,
    EVENT_CREATE,
    EVENT_UPDATE_BY_ID,
    EVENT_DELETE_BY_ID,
];

/// Outcome suffix appended to the command name in `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Success,
    BadRequest,
    NotFound,
    PreconditionFailed,
    Forbidden,
}

impl Outcome {
    /// `event_create` + `PreconditionFailed` -> `event_create_precondition_failed`
    pub fn message(self, pattern: &str) -> String {
        format!("{pattern}_{self}")
    }
}

/// Reply to `event_search_by_user_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchEventsResponse {
    pub status: u16,
    pub message: String,
    pub events: Option<Vec<Event>>,
}

impl SearchEventsResponse {
    pub fn found(events: Vec<Event>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: Outcome::Success.message(EVENT_SEARCH_BY_USER_ID),
            events: Some(events),
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            message: Outcome::BadRequest.message(EVENT_SEARCH_BY_USER_ID),
            events: None,
        }
    }
}

/// Reply to `event_create` and `event_update_by_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub status: u16,
    pub message: String,
    pub event: Option<Event>,
    #[schema(value_type = Option<std::collections::BTreeMap<String, FieldError>>)]
    pub errors: Option<FieldErrors>,
}

impl EventResponse {
    pub fn ok(pattern: &str, status: StatusCode, event: Event) -> Self {
        Self {
            status: status.as_u16(),
            message: Outcome::Success.message(pattern),
            event: Some(event),
            errors: None,
        }
    }

    pub fn failed(
        pattern: &str,
        status: StatusCode,
        outcome: Outcome,
        errors: Option<FieldErrors>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            message: outcome.message(pattern),
            event: None,
            errors,
        }
    }
}

/// Reply to `event_delete_by_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteEventResponse {
    pub status: u16,
    pub message: String,
    #[schema(value_type = Option<std::collections::BTreeMap<String, FieldError>>)]
    pub errors: Option<FieldErrors>,
}

impl DeleteEventResponse {
    pub fn new(status: StatusCode, outcome: Outcome) -> Self {
        Self {
            status: status.as_u16(),
            message: outcome.message(EVENT_DELETE_BY_ID),
            errors: None,
        }
    }
}

/// Payload of `event_update_by_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "ownerId", alias = "userId")]
    pub owner_id: String,
    /// Partial event; unknown keys are ignored by the merge
    #[serde(default)]
    pub event: Option<serde_json::Value>,
}

/// Payload of `event_delete_by_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteEventRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "ownerId", alias = "userId")]
    pub owner_id: String,
}
