pub mod address_verifier;
pub mod api_doc;
pub mod attendee_store;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod form_client;
pub mod newsletter_client;
pub mod registration;
pub mod routes;
pub mod startup;
pub mod telemetry;
