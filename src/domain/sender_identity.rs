use validator::ValidateEmail;

/// The name and address confirmation emails are sent from.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderIdentity {
    name: String,
    email: String,
}

impl SenderIdentity {
    pub fn parse(name: String, email: String) -> Result<SenderIdentity, String> {
        if !email.validate_email() {
            return Err(format!("{} is not a valid sender email.", email));
        }
        if name.trim().is_empty() {
            return Err("The sender name must not be empty.".into());
        }
        Ok(Self { name, email })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// `Name <address>`, as used in a `From` header.
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}
