/// The email an attendee registered with.
///
/// Only emptiness is checked: the address is the deduplication key and is
/// kept exactly as submitted so that lookups match what was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendeeEmail(String);

impl AttendeeEmail {
    pub fn parse(s: String) -> Result<AttendeeEmail, String> {
        if s.trim().is_empty() {
            Err(format!("{:?} is not a valid attendee email.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for AttendeeEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttendeeEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
