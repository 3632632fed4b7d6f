//! Errors surfaced by the `/events2` handlers.

use crate::dto::{ApiResponse, NoData};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{ErrorCode, error_response};
use domain_events::FieldErrors;
use messaging::MessagingError;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The dispatcher answered with a non-success envelope
    #[error("{status}: {message}")]
    Rejected {
        status: StatusCode,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// The command never produced an envelope
    #[error(transparent)]
    Bus(#[from] MessagingError),
}

impl GatewayError {
    /// Keep the envelope's status; an unusable one becomes 502.
    pub fn rejected(status: u16, message: String, errors: Option<FieldErrors>) -> Self {
        Self::Rejected {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
            errors,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::Rejected {
                status,
                message,
                errors,
            } => {
                info!(status = status.as_u16(), %message, "Command rejected");
                (status, Json(ApiResponse::<NoData>::rejected(message, errors))).into_response()
            }
            Self::Bus(err) => {
                let code = if err.is_unavailable() {
                    ErrorCode::BusUnavailable
                } else {
                    ErrorCode::BusRemote
                };
                warn!(error = %err, error_code = code.code(), "Command bus failure");
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    code.default_message().to_string(),
                    code,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_events::{FieldError, FieldErrorKind};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: GatewayError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_rejection_keeps_status_and_errors() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "name".to_string(),
            FieldError::new("name", FieldErrorKind::Required, "Name can not be empty", Value::Null),
        );

        let (status, body) = render(GatewayError::rejected(
            412,
            "event_create_precondition_failed".to_string(),
            Some(errors),
        ))
        .await;

        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(body["message"], "event_create_precondition_failed");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["errors"]["name"]["kind"], "required");
    }

    #[tokio::test]
    async fn test_invalid_status_becomes_bad_gateway() {
        let (status, _) = render(GatewayError::rejected(42, "odd".to_string(), None)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_bus_failures_are_unavailable() {
        let (status, body) = render(GatewayError::Bus(MessagingError::NoResponders {
            subject: "event_create".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "BUS_UNAVAILABLE");

        let (status, body) = render(GatewayError::Bus(MessagingError::Remote {
            pattern: "event_search_by_user_id".to_string(),
            message: "handler error: timed out".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({
            "code": 2002,
            "error": "BUS_REMOTE",
            "message": "Backend service failed to handle the request"
        }));
    }
}
