use crate::domain::{RegistrationRequest, RegistrationResponse};
use crate::registration::RegistrationError;
use crate::routes::constants::ERROR_INVALID_METHOD;
use crate::startup::AppState;
use anyhow::Context;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;

impl IntoResponse for RegistrationError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            RegistrationError::UnexpectedError(_) => {
                tracing::error!(error.cause_chain = ?self, "Failed to register an attendee");
            }
            _ => {
                tracing::info!(error = %self, "Registration rejected");
            }
        }
        // Every failure shares one status code, the body tells them apart.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RegistrationResponse::failure(self.client_message())),
        )
            .into_response()
    }
}

/// Register for the event
///
/// Validates the attendee, rejects duplicates, verifies the postal address if
/// one was given, stores the attendee and sends a confirmation email.
#[utoipa::path(
    post,
    path = "/register",
    tag = "registration",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Attendee registered", body = RegistrationResponse),
        (status = 500, description = "Invalid input, already registered or processing failure", body = RegistrationResponse),
    )
)]
#[tracing::instrument(name = "Handling a registration request", skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegistrationResponse>, RegistrationError> {
    // Parsed by hand so that a malformed body gets the same JSON error shape
    // as every other failure.
    let request: RegistrationRequest =
        serde_json::from_slice(&body).context("Failed to parse the registration request body")?;
    let outcome = state.registrar.register(request).await?;
    Ok(Json(outcome.into()))
}

/// Answer for any method other than POST. Deliberately not an error status.
pub async fn invalid_method() -> Json<RegistrationResponse> {
    Json(RegistrationResponse::failure(ERROR_INVALID_METHOD))
}
