//! OpenAPI description of the HTTP interface, served as JSON.

use crate::domain::{RegistrationRequest, RegistrationResponse};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event registration API",
        description = "Registers attendees for the event and confirms by email."
    ),
    paths(
        crate::routes::register::register,
        crate::routes::health_check::health_check,
    ),
    components(schemas(RegistrationRequest, RegistrationResponse)),
    tags(
        (name = "registration", description = "Attendee registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
