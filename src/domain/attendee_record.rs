use crate::domain::{AddressVerification, NewRegistration};

/// What gets persisted for each registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendeeRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub address_verified: Option<bool>,
}

impl AttendeeRecord {
    pub fn new(registration: &NewRegistration, verification: Option<&AddressVerification>) -> Self {
        Self {
            first_name: registration.first_name.as_ref().to_owned(),
            last_name: registration.last_name.as_ref().to_owned(),
            email: registration.email.as_ref().to_owned(),
            address: verification.map(|v| v.address.clone()),
            address_verified: verification.map(|v| v.address_verified),
        }
    }
}
