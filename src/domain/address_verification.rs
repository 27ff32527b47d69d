use crate::domain::PostalAddress;

/// How far the verification provider got in matching an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum VerificationStatus {
    Verified,
    Partial,
    Ambiguous,
    None,
    #[serde(other)]
    Unknown,
}

/// The finest level of detail the provider could match an address to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum AddressPrecision {
    None,
    AdministrativeArea,
    Locality,
    Thoroughfare,
    Premise,
    DeliveryPoint,
    #[serde(other)]
    Unknown,
}

/// The provider's best match for a freeform address.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationCandidate {
    pub status: VerificationStatus,
    pub precision: AddressPrecision,
    /// Structured address lines, in order. Blank lines are allowed and skipped.
    pub address_lines: Vec<String>,
}

impl VerificationCandidate {
    /// Precise enough that stickers can be posted without asking the attendee.
    pub fn is_deliverable(&self) -> bool {
        self.status == VerificationStatus::Verified
            && matches!(
                self.precision,
                AddressPrecision::Premise | AddressPrecision::DeliveryPoint
            )
    }

    fn canonical_address(&self) -> String {
        self.address_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The address that ends up on the attendee record.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressVerification {
    pub address: String,
    pub address_verified: bool,
}

impl AddressVerification {
    /// Uses the provider's canonical lines when the candidate is deliverable,
    /// otherwise keeps what the attendee typed.
    pub fn from_candidate(submitted: &PostalAddress, candidate: &VerificationCandidate) -> Self {
        if candidate.is_deliverable() {
            Self {
                address: candidate.canonical_address(),
                address_verified: true,
            }
        } else {
            Self::unverified(submitted)
        }
    }

    pub fn unverified(submitted: &PostalAddress) -> Self {
        Self {
            address: submitted.to_string(),
            address_verified: false,
        }
    }
}
