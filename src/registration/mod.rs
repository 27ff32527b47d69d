//! The registration workflow.
//!
//! Steps run strictly in order and each one must succeed before the next
//! starts: validation, duplicate check, address verification (only when an
//! address was given), persistence, confirmation email. The newsletter
//! subscription comes last and never fails a registration.
//!
//! Nothing is rolled back. If the confirmation email cannot be sent the
//! attendee record stays in the store, and a retry from the form will be
//! answered with "already registered".

mod confirmation_email;

pub use confirmation_email::ConfirmationEmail;

use crate::address_verifier::AddressVerifier;
use crate::attendee_store::AttendeeStore;
use crate::configuration::EventSettings;
use crate::domain::{
    AddressVerification, AttendeeEmail, AttendeeRecord, InvalidRegistration, NewRegistration,
    PostalAddress, RegistrationRequest, RegistrationResponse,
};
use crate::email_client::{EmailData, EmailSender};
use crate::newsletter_client::NewsletterSubscriber;
use crate::telemetry::error_chain_fmt;
use anyhow::Context;
use std::sync::Arc;

/// Message shown for any failure that is not the registrant's fault.
pub const ERROR_TROUBLE_REGISTERING: &str =
    "We had trouble registering you. If this error persists please email us.";

#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidRegistration),
    #[error("You have already registered.")]
    AlreadyRegistered,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl RegistrationError {
    /// What the registrant gets to see. Collaborator failures are opaque.
    pub fn client_message(&self) -> String {
        match self {
            RegistrationError::UnexpectedError(_) => ERROR_TROUBLE_REGISTERING.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    /// Present iff the attendee gave an address.
    pub address: Option<AddressVerification>,
}

impl From<RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        RegistrationResponse::Registered {
            address: outcome.address.is_some(),
            verified: outcome.address.map(|a| a.address_verified),
        }
    }
}

/// Runs registrations against the collaborators built at startup.
#[derive(Clone)]
pub struct Registrar {
    attendee_store: Arc<dyn AttendeeStore>,
    address_verifier: Arc<dyn AddressVerifier>,
    email_sender: Arc<dyn EmailSender>,
    newsletter: Arc<dyn NewsletterSubscriber>,
    newsletter_tag: String,
    event: EventSettings,
}

impl Registrar {
    pub fn new(
        attendee_store: Arc<dyn AttendeeStore>,
        address_verifier: Arc<dyn AddressVerifier>,
        email_sender: Arc<dyn EmailSender>,
        newsletter: Arc<dyn NewsletterSubscriber>,
        newsletter_tag: String,
        event: EventSettings,
    ) -> Self {
        Self {
            attendee_store,
            address_verifier,
            email_sender,
            newsletter,
            newsletter_tag,
            event,
        }
    }

    #[tracing::instrument(
        name = "Registering a new attendee",
        skip(self, request),
        fields(attendee_email = tracing::field::Empty)
    )]
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let registration = NewRegistration::try_from(request)?;
        tracing::Span::current().record(
            "attendee_email",
            tracing::field::display(&registration.email),
        );

        if self.attendee_store.email_exists(&registration.email).await? {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let verification = match &registration.address {
            Some(address) => Some(self.verify_address(address).await?),
            None => None,
        };

        let record = AttendeeRecord::new(&registration, verification.as_ref());
        self.attendee_store.create(&record).await?;

        let email = ConfirmationEmail::compose(&self.event, verification.as_ref());
        self.email_sender
            .send_email(EmailData {
                recipient: &registration.email,
                subject: &email.subject,
                html_content: &email.html_content,
            })
            .await?;

        if registration.newsletter {
            self.subscribe_to_newsletter(&registration.email).await;
        }

        Ok(RegistrationOutcome {
            address: verification,
        })
    }

    #[tracing::instrument(name = "Verifying the attendee's address", skip(self))]
    async fn verify_address(
        &self,
        address: &PostalAddress,
    ) -> Result<AddressVerification, anyhow::Error> {
        let candidate = self
            .address_verifier
            .verify(address)
            .await?
            .context("The address verifier returned no candidates")?;
        let verification = AddressVerification::from_candidate(address, &candidate);
        tracing::info!(
            address_verified = verification.address_verified,
            "Address verification finished"
        );
        Ok(verification)
    }

    async fn subscribe_to_newsletter(&self, email: &AttendeeEmail) {
        if let Err(error) = self.newsletter.subscribe(email, &self.newsletter_tag).await {
            tracing::warn!(
                error.cause_chain = ?error,
                "Skipping the newsletter subscription. \
                The registration itself succeeded"
            );
        }
    }
}
