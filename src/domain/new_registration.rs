use crate::domain::{AttendeeEmail, AttendeeName, PostalAddress};
use serde::{Deserialize, Deserializer};

/// The JSON payload posted by the registration form.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Freeform postal address, only meaningful together with `country`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Any truthy JSON value opts in, `null` and falsy values do not.
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub newsletter: bool,
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub first_name: AttendeeName,
    pub last_name: AttendeeName,
    pub email: AttendeeEmail,
    pub address: Option<PostalAddress>,
    pub newsletter: bool,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidRegistration {
    #[error("You must provide your first name, last name and email.")]
    MissingFields,
    #[error("If you want to receive stickers, you must fill in both address fields.")]
    PartialAddress,
}

impl TryFrom<RegistrationRequest> for NewRegistration {
    type Error = InvalidRegistration;

    fn try_from(value: RegistrationRequest) -> Result<Self, Self::Error> {
        let required = |field: Option<String>| field.unwrap_or_default();
        let first_name = AttendeeName::parse(required(value.first_name));
        let last_name = AttendeeName::parse(required(value.last_name));
        let email = AttendeeEmail::parse(required(value.email));
        let (Ok(first_name), Ok(last_name), Ok(email)) = (first_name, last_name, email) else {
            return Err(InvalidRegistration::MissingFields);
        };
        let address = PostalAddress::parse(value.address, value.country)
            .map_err(|_| InvalidRegistration::PartialAddress)?;
        Ok(Self {
            first_name,
            last_name,
            email,
            address,
            newsletter: value.newsletter,
        })
    }
}
