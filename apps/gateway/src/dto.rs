//! HTTP bodies of the `/events2` routes.

use domain_events::{Event, FieldError, FieldErrors};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every `/events2` response, success or failure, uses this shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = "event_create_success")]
    pub message: String,
    pub data: Option<T>,
    #[schema(value_type = Option<std::collections::BTreeMap<String, FieldError>>)]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: String, data: Option<T>) -> Self {
        Self {
            message,
            data,
            errors: None,
        }
    }

    pub fn rejected(message: String, errors: Option<FieldErrors>) -> Self {
        Self {
            message,
            data: None,
            errors,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsData {
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventData {
    pub event: Event,
}

/// Placeholder for responses whose `data` is always `null`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoData {}

/// Documents the body of `POST /events2`; the owner comes from the token.
///
/// The gateway forwards the raw JSON object so casting stays with the dispatcher.
#[derive(ToSchema)]
pub struct CreateEventBody {
    #[schema(example = "Standup")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 100)]
    pub start_time: i64,
    #[schema(example = 15)]
    pub duration: i64,
    pub is_solved: bool,
    pub notification_id: Option<i64>,
}

/// Documents the body of `PUT /events2/{id}`; absent fields keep their value.
#[derive(ToSchema)]
pub struct UpdateEventBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<i64>,
    pub duration: Option<i64>,
    pub is_solved: Option<bool>,
    pub notification_id: Option<i64>,
}
