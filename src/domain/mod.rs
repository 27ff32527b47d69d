mod address_verification;
mod attendee_email;
mod attendee_name;
mod attendee_record;
mod new_registration;
mod postal_address;
mod registration_response;
mod sender_identity;

pub use address_verification::{
    AddressPrecision, AddressVerification, VerificationCandidate, VerificationStatus,
};
pub use attendee_email::AttendeeEmail;
pub use attendee_name::AttendeeName;
pub use attendee_record::AttendeeRecord;
pub use new_registration::{InvalidRegistration, NewRegistration, RegistrationRequest};
pub use postal_address::PostalAddress;
pub use registration_response::RegistrationResponse;
pub use sender_identity::SenderIdentity;
