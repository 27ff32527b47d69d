/// Body returned by `POST /register`: either an error or the address outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum RegistrationResponse {
    Failure {
        error: String,
    },
    Registered {
        address: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verified: Option<bool>,
    },
}

impl RegistrationResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }
}
