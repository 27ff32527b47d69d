#[derive(Debug, Clone, PartialEq)]
pub struct AttendeeName(String);

impl AttendeeName {
    /// Returns an instance of `AttendeeName` if the input is not empty
    /// once surrounding whitespace is ignored.
    pub fn parse(s: String) -> Result<AttendeeName, String> {
        if s.trim().is_empty() {
            Err(format!("{:?} is not a valid attendee name.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for AttendeeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttendeeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
