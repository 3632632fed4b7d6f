//! OpenAPI documentation configuration

use crate::api::events;
use crate::dto::{CreateEventBody, UpdateEventBody};
use axum_helpers::ErrorResponse;
use axum_helpers::errors::responses::{
    ForbiddenResponse, ServiceUnavailableResponse, UnauthorizedResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events Gateway",
        version = "0.1.0",
        description = "Events owned by the authenticated caller. Send `Authorization: Bearer <jwt>`; each route needs the permission named after its command.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        events::list_events,
        events::create_event,
        events::update_event,
        events::delete_event,
    ),
    components(
        schemas(CreateEventBody, UpdateEventBody, ErrorResponse),
        responses(UnauthorizedResponse, ForbiddenResponse, ServiceUnavailableResponse)
    ),
    tags(
        (name = "events", description = "Scheduled reminders and tasks owned by a user")
    )
)]
pub struct ApiDoc;
