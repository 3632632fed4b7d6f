//! OpenAPI response types shared by route annotations.
//!
//! ```ignore
//! #[utoipa::path(get, path = "/events2", responses(
//!     (status = 401, response = UnauthorizedResponse),
//!     (status = 403, response = ForbiddenResponse),
//! ))]
//! ```

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Missing or invalid bearer token",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAUTHORIZED",
        "message": "Invalid token"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "The token lacks the route's permission",
    content_type = "application/json",
    example = json!({
        "code": 1007,
        "error": "FORBIDDEN",
        "message": "Missing permission 'event_create'"
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "No backend answered on the command bus",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "BUS_UNAVAILABLE",
        "message": "Backend service did not respond"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
