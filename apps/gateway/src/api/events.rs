//! `/events2` routes.
//!
//! Each route needs a bearer token and the permission named after the
//! command it forwards. The caller's id always replaces any owner sent by
//! the client.

use crate::caller::Caller;
use crate::dto::{ApiResponse, CreateEventBody, EventData, EventsData, NoData, UpdateEventBody};
use crate::error::GatewayError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use axum_helpers::errors::responses::{
    ForbiddenResponse, ServiceUnavailableResponse, UnauthorizedResponse,
};
use axum_helpers::{ErrorResponse, JsonBody, jwt_auth_middleware, require_permission};
use domain_events::schema::OWNER_ALIAS;
use domain_events::{
    DeleteEventRequest, DeleteEventResponse, EVENT_CREATE, EVENT_DELETE_BY_ID,
    EVENT_SEARCH_BY_USER_ID, EVENT_UPDATE_BY_ID, EventResponse, SearchEventsResponse,
    UpdateEventRequest,
};
use messaging::MessageBroker;
use serde_json::{Map, Value};
use tracing::instrument;

type JsonObject = Map<String, Value>;

pub fn router<B: MessageBroker>(state: AppState<B>) -> Router {
    Router::new()
        .route(
            "/events2",
            get(list_events::<B>)
                .route_layer(from_fn_with_state(EVENT_SEARCH_BY_USER_ID, require_permission))
                .merge(
                    post(create_event::<B>)
                        .route_layer(from_fn_with_state(EVENT_CREATE, require_permission)),
                ),
        )
        .route(
            "/events2/{id}",
            put(update_event::<B>)
                .route_layer(from_fn_with_state(EVENT_UPDATE_BY_ID, require_permission))
                .merge(
                    delete(delete_event::<B>)
                        .route_layer(from_fn_with_state(EVENT_DELETE_BY_ID, require_permission)),
                ),
        )
        .layer(from_fn_with_state(state.auth.clone(), jwt_auth_middleware))
        .with_state(state)
}

/// List the caller's events
#[utoipa::path(
    get,
    path = "/events2",
    responses(
        (status = 200, description = "Events owned by the caller", body = ApiResponse<EventsData>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state), fields(caller = %caller.id))]
pub async fn list_events<B: MessageBroker>(
    State(state): State<AppState<B>>,
    caller: Caller,
) -> Result<Json<ApiResponse<EventsData>>, GatewayError> {
    let reply: SearchEventsResponse = state
        .client
        .send(EVENT_SEARCH_BY_USER_ID, &caller.id)
        .await?;

    Ok(Json(ApiResponse::success(
        reply.message,
        Some(EventsData {
            events: reply.events,
        }),
    )))
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/events2",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventData>),
        (status = 400, description = "Missing event", body = ApiResponse<NoData>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 412, description = "Field validation failed", body = ApiResponse<NoData>),
        (status = 422, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, body), fields(caller = %caller.id))]
pub async fn create_event<B: MessageBroker>(
    State(state): State<AppState<B>>,
    caller: Caller,
    JsonBody(mut body): JsonBody<JsonObject>,
) -> Result<(StatusCode, Json<ApiResponse<EventData>>), GatewayError> {
    body.remove(OWNER_ALIAS);
    body.insert("owner_id".to_string(), Value::String(caller.id));

    let reply: EventResponse = state.client.send(EVENT_CREATE, &body).await?;
    let response = expect_event(reply, StatusCode::CREATED)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update fields of an event
#[utoipa::path(
    put,
    path = "/events2/{id}",
    params(
        ("id" = String, Path, description = "Event id (24 hex characters)")
    ),
    request_body = UpdateEventBody,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventData>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, description = "Event not found", body = ApiResponse<NoData>),
        (status = 412, description = "Field validation failed or owner changed", body = ApiResponse<NoData>),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, body), fields(caller = %caller.id))]
pub async fn update_event<B: MessageBroker>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<JsonObject>,
) -> Result<Json<ApiResponse<EventData>>, GatewayError> {
    let request = UpdateEventRequest {
        id,
        owner_id: caller.id,
        event: Some(Value::Object(body)),
    };

    let reply: EventResponse = state.client.send(EVENT_UPDATE_BY_ID, &request).await?;
    Ok(Json(expect_event(reply, StatusCode::OK)?))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events2/{id}",
    params(
        ("id" = String, Path, description = "Event id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event deleted", body = ApiResponse<NoData>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, description = "Missing permission or delete refused", body = ApiResponse<NoData>),
        (status = 404, description = "Event not found", body = ApiResponse<NoData>),
        (status = 503, response = ServiceUnavailableResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state), fields(caller = %caller.id))]
pub async fn delete_event<B: MessageBroker>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NoData>>, GatewayError> {
    let request = DeleteEventRequest {
        id,
        owner_id: caller.id,
    };

    let reply: DeleteEventResponse = state.client.send(EVENT_DELETE_BY_ID, &request).await?;
    if reply.status != StatusCode::OK.as_u16() {
        return Err(GatewayError::rejected(reply.status, reply.message, reply.errors));
    }
    Ok(Json(ApiResponse::success(reply.message, None)))
}

fn expect_event(
    reply: EventResponse,
    expected: StatusCode,
) -> Result<ApiResponse<EventData>, GatewayError> {
    if reply.status != expected.as_u16() {
        return Err(GatewayError::rejected(reply.status, reply.message, reply.errors));
    }
    Ok(ApiResponse::success(
        reply.message,
        reply.event.map(|event| EventData { event }),
    ))
}
