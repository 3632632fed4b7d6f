//! Schema rules for event records: type casting, required fields, the
//! allow-listed update merge and owner immutability.

use crate::models::{Event, FieldError, FieldErrorKind, FieldErrors, NewEvent};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

/// Fields a caller may set. Everything else in a payload is ignored.
pub const EVENT_FIELDS: [&str; 7] = [
    "name",
    "description",
    "owner_id",
    "start_time",
    "duration",
    "is_solved",
    "notification_id",
];

/// Legacy name of `owner_id`, still accepted on input.
pub const OWNER_ALIAS: &str = "user_id";

pub const IMMUTABLE_MESSAGE: &str = "The field value can not be updated";

/// Event fields before required-field validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct EventDraft {
    #[validate(
        required(message = "Name can not be empty"),
        length(min = 1, message = "Name can not be empty")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(
        required(message = "User can not be empty"),
        length(min = 1, message = "User can not be empty")
    )]
    pub owner_id: Option<String>,

    #[validate(required(message = "Start time can not be empty"))]
    pub start_time: Option<i64>,

    #[validate(required(message = "Duration can not be empty"))]
    pub duration: Option<i64>,

    #[validate(required(message = "Solved flag can not be empty"))]
    pub is_solved: Option<bool>,

    pub notification_id: Option<i64>,
}

impl EventDraft {
    /// Apply a patch; explicit nulls clear the field.
    pub fn merged(mut self, patch: EventPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(is_solved) = patch.is_solved {
            self.is_solved = is_solved;
        }
        if let Some(notification_id) = patch.notification_id {
            self.notification_id = notification_id;
        }
        self
    }

    /// Required-field violations, one per field.
    pub fn validation_errors(&self) -> FieldErrors {
        let Err(errors) = self.validate() else {
            return FieldErrors::new();
        };

        let values = serde_json::to_value(self).unwrap_or_default();
        errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, field_errors)| {
                let first = field_errors.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                let path: &str = &field;
                let value = values.get(path).cloned().unwrap_or(Value::Null);
                Some((
                    path.to_string(),
                    FieldError::new(path, FieldErrorKind::Required, message, value),
                ))
            })
            .collect()
    }

    fn build(self) -> Option<NewEvent> {
        Some(NewEvent {
            name: self.name?,
            description: self.description,
            owner_id: self.owner_id?,
            start_time: self.start_time?,
            duration: self.duration?,
            is_solved: self.is_solved?,
            notification_id: self.notification_id,
        })
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            name: Some(event.name.clone()),
            description: event.description.clone(),
            owner_id: Some(event.owner_id.clone()),
            start_time: Some(event.start_time),
            duration: Some(event.duration),
            is_solved: Some(event.is_solved),
            notification_id: event.notification_id,
        }
    }
}

/// Fields present in an input payload.
///
/// The outer `Option` is presence, the inner one distinguishes an explicit
/// `null` from a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub owner_id: Option<Option<String>>,
    pub start_time: Option<Option<i64>>,
    pub duration: Option<Option<i64>>,
    pub is_solved: Option<Option<bool>>,
    pub notification_id: Option<Option<i64>>,
}

impl EventPatch {
    /// Pick the known fields out of `payload`, casting each to its type.
    ///
    /// Fields that fail to cast are left out of the patch and reported.
    pub fn from_json(payload: &Map<String, Value>) -> (Self, FieldErrors) {
        let mut errors = FieldErrors::new();
        let owner = payload
            .get("owner_id")
            .or_else(|| payload.get(OWNER_ALIAS));

        let patch = Self {
            name: cast_field(payload.get("name"), "name", &mut errors, "String", cast_string),
            description: cast_field(
                payload.get("description"),
                "description",
                &mut errors,
                "String",
                cast_string,
            ),
            owner_id: cast_field(owner, "owner_id", &mut errors, "String", cast_string),
            start_time: cast_field(
                payload.get("start_time"),
                "start_time",
                &mut errors,
                "Number",
                cast_integer,
            ),
            duration: cast_field(
                payload.get("duration"),
                "duration",
                &mut errors,
                "Number",
                cast_integer,
            ),
            is_solved: cast_field(
                payload.get("is_solved"),
                "is_solved",
                &mut errors,
                "Boolean",
                cast_boolean,
            ),
            notification_id: cast_field(
                payload.get("notification_id"),
                "notification_id",
                &mut errors,
                "Number",
                cast_integer,
            ),
        };

        (patch, errors)
    }
}

/// Validate a create payload.
pub fn validate_new(payload: &Map<String, Value>) -> Result<NewEvent, FieldErrors> {
    let (patch, errors) = EventPatch::from_json(payload);
    finish(EventDraft::default().merged(patch), errors)
}

/// Merge `partial` onto a stored event and validate the result.
///
/// Stored events always carry `created_at`, so the owner stays fixed.
pub fn validate_update(
    existing: &Event,
    partial: &Map<String, Value>,
) -> Result<NewEvent, FieldErrors> {
    let (patch, mut errors) = EventPatch::from_json(partial);
    let draft = EventDraft::from(existing).merged(patch);

    if draft.owner_id.as_deref() != Some(existing.owner_id.as_str()) {
        let value = draft.owner_id.clone().map(Value::String).unwrap_or(Value::Null);
        errors.entry("owner_id".to_string()).or_insert_with(|| {
            FieldError::new(
                "owner_id",
                FieldErrorKind::Immutable,
                IMMUTABLE_MESSAGE,
                value,
            )
        });
    }

    finish(draft, errors)
}

fn finish(draft: EventDraft, mut errors: FieldErrors) -> Result<NewEvent, FieldErrors> {
    for (field, error) in draft.validation_errors() {
        errors.entry(field).or_insert(error);
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    draft.build().ok_or(errors)
}

fn cast_field<T>(
    value: Option<&Value>,
    path: &str,
    errors: &mut FieldErrors,
    type_name: &str,
    cast: fn(&Value) -> Option<T>,
) -> Option<Option<T>> {
    let value = value?;
    if value.is_null() {
        return Some(None);
    }
    match cast(value) {
        Some(cast_value) => Some(Some(cast_value)),
        None => {
            errors.insert(
                path.to_string(),
                FieldError::new(
                    path,
                    FieldErrorKind::Cast,
                    format!(
                        "Cast to {type_name} failed for value {value} (type {}) at path \"{path}\"",
                        json_type(value)
                    ),
                    value.clone(),
                ),
            );
            None
        }
    }
}

fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cast_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cast_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
