//! Event domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// A scheduled reminder or task owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Storage identifier (24 hex characters)
    #[schema(example = "665f1c2e9b1d4a3f8c0e1a2b")]
    pub id: String,

    #[schema(example = "Standup")]
    pub name: String,

    pub description: Option<String>,

    /// Owner of the event; fixed at creation
    #[schema(example = "u1")]
    pub owner_id: String,

    /// Start time as a unix timestamp
    #[schema(example = 100)]
    pub start_time: i64,

    #[schema(example = 15)]
    pub duration: i64,

    pub is_solved: bool,

    pub notification_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Overwrite every user-managed field with `fields`.
    ///
    /// Identity and `created_at` are untouched; the repository bumps
    /// `updated_at` when saving.
    pub fn apply(&mut self, fields: NewEvent) {
        self.name = fields.name;
        self.description = fields.description;
        self.owner_id = fields.owner_id;
        self.start_time = fields.start_time;
        self.duration = fields.duration;
        self.is_solved = fields.is_solved;
        self.notification_id = fields.notification_id;
    }
}

/// A validated event that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub start_time: i64,
    pub duration: i64,
    pub is_solved: bool,
    pub notification_id: Option<i64>,
}

/// Why a field was rejected
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldErrorKind {
    /// Missing, null or empty
    Required,
    /// Wrong JSON type for the field
    Cast,
    /// Attempt to change a field that is fixed after creation
    Immutable,
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub message: String,
    pub kind: FieldErrorKind,
    pub path: String,
    /// The offending input value
    #[schema(value_type = Object)]
    pub value: Value,
}

impl FieldError {
    pub fn new(path: &str, kind: FieldErrorKind, message: impl Into<String>, value: Value) -> Self {
        Self {
            message: message.into(),
            kind,
            path: path.to_string(),
            value,
        }
    }
}

/// Field-level errors keyed by field name
pub type FieldErrors = BTreeMap<String, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn standup() -> Event {
        let now = Utc::now();
        Event {
            id: "665f1c2e9b1d4a3f8c0e1a2b".to_string(),
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

    #[test]
    fn test_event_serializes_absent_values_as_null() {
        let value = serde_json::to_value(standup()).unwrap();
        assert_eq!(value["description"], Value::Null);
        assert_eq!(value["notification_id"], Value::Null);
        assert_eq!(value["owner_id"], "u1");
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut event = standup();
        let created_at = event.created_at;
        event.apply(NewEvent {
            name: "Retro".to_string(),
            description: Some("weekly".to_string()),
            owner_id: "u1".to_string(),
            start_time: 200,
            duration: 30,
            is_solved: true,
            notification_id: Some(7),
        });

        assert_eq!(event.id, "665f1c2e9b1d4a3f8c0e1a2b");
        assert_eq!(event.created_at, created_at);
        assert_eq!(event.name, "Retro");
        assert_eq!(event.notification_id, Some(7));
    }

    #[test]
    fn test_field_error_shape() {
        let error = FieldError::new(
            "start_time",
            FieldErrorKind::Cast,
            "Cast to Number failed",
            json!("soon"),
        );
        assert_eq!(
            serde_json::to_value(error).unwrap(),
            json!({
                "message": "Cast to Number failed",
                "kind": "cast",
                "path": "start_time",
                "value": "soon"
            })
        );
    }
}
