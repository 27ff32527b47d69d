//! Client side of the registration form.
//!
//! Mirrors what the browser form does: validate locally, post once, and keep
//! track of whether a submission is running, succeeded or failed.

use crate::domain::{InvalidRegistration, RegistrationRequest, RegistrationResponse};
use crate::telemetry::error_chain_fmt;
use reqwest::Client;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const ERROR_REQUIRED_FIELDS: &str = "You must fill in all required fields - at minimum your first name, last name and email address.";

pub const ERROR_SUBMISSION_FAILED: &str =
    "There was an error registering. If this problem persists please email us.";

/// What the attendee typed. Empty strings mean "not filled in".
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub country: String,
    pub newsletter: bool,
}

impl RegistrationForm {
    /// Checks the form and builds the request body.
    ///
    /// The address fields are only sent when both are filled in.
    pub fn payload(&self) -> Result<RegistrationRequest, String> {
        if self.first_name.is_empty() || self.last_name.is_empty() || self.email.is_empty() {
            return Err(ERROR_REQUIRED_FIELDS.to_string());
        }
        let partial_address = !self.address.is_empty() || !self.country.is_empty();
        let full_address = !self.address.is_empty() && !self.country.is_empty();
        if partial_address && !full_address {
            return Err(InvalidRegistration::PartialAddress.to_string());
        }
        let (address, country) = if full_address {
            (Some(self.address.clone()), Some(self.country.clone()))
        } else {
            (None, None)
        };
        Ok(RegistrationRequest {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            address,
            country,
            newsletter: self.newsletter,
        })
    }
}

/// What the form currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// A submission is running or has succeeded.
    pub submitted: bool,
    pub success: bool,
    pub error: Option<String>,
    pub response: Option<RegistrationResponse>,
}

#[derive(thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(String),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error("{0}")]
    Rejected(String),
    #[error("{}", ERROR_SUBMISSION_FAILED)]
    Transport(#[source] reqwest::Error),
}

impl std::fmt::Debug for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub struct RegistrationFormClient {
    http_client: Client,
    endpoint: String,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

// Clears the in-flight flag however the submission ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RegistrationFormClient {
    pub fn new(endpoint: String, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
            state: Mutex::new(FormState::default()),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn state(&self) -> FormState {
        self.lock_state().clone()
    }

    /// Validates and posts the form. Only one submission runs at a time; a
    /// second call while one is pending returns `AlreadySubmitting` without
    /// touching the network or the form state.
    #[tracing::instrument(name = "Submitting the registration form", skip(self, form))]
    pub async fn submit(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationResponse, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::AlreadySubmitting);
        }
        let _in_flight = InFlight(&self.in_flight);

        self.update_state(|state| {
            state.error = None;
            state.submitted = true;
        });

        let outcome = match form.payload() {
            Ok(payload) => self.post(&payload).await,
            Err(message) => Err(SubmitError::Invalid(message)),
        };

        match &outcome {
            Ok(response) => self.update_state(|state| {
                state.success = true;
                state.response = Some(response.clone());
            }),
            Err(error) => {
                if let SubmitError::Transport(e) = error {
                    tracing::error!("Failed to submit the registration form: {:?}", e);
                }
                let message = error.to_string();
                self.update_state(|state| {
                    state.submitted = false;
                    state.error = Some(message);
                });
            }
        }
        outcome
    }

    async fn post(&self, payload: &RegistrationRequest) -> Result<RegistrationResponse, SubmitError> {
        // Failures come back with an error status and a JSON body, so the
        // body is read whatever the status.
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(SubmitError::Transport)?
            .json::<RegistrationResponse>()
            .await
            .map_err(SubmitError::Transport)?;
        match response {
            RegistrationResponse::Failure { error } => Err(SubmitError::Rejected(error)),
            registered => Ok(registered),
        }
    }

    fn update_state(&self, update: impl FnOnce(&mut FormState)) {
        let mut state = self.lock_state();
        update(&mut state);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FormState> {
        // The state is plain data, so a poisoned lock still holds a usable value.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
