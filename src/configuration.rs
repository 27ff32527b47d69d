use crate::address_verifier::AddressVerifierClient;
use crate::domain::SenderIdentity;
use crate::email_client::EmailClient;
use crate::newsletter_client::NewsletterClient;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub address_verifier: AddressVerifierSettings,
    pub newsletter: NewsletterSettings,
    pub event: EventSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    // Determine if we demand the connection to be encrypted or not
    pub require_ssl: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub acquire_timeout_milliseconds: u64,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            // Try an encrypted connection, fallback to unencrypted if it fails
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
            .log_statements(tracing_log::log::LevelFilter::Trace)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<SenderIdentity, String> {
        SenderIdentity::parse(self.sender_name.clone(), self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<EmailClient, anyhow::Error> {
        let sender = self.sender().map_err(anyhow::Error::msg)?;
        let client = EmailClient::new(
            self.base_url.clone(),
            sender,
            self.authorization_token.clone(),
            self.timeout(),
        )?;
        Ok(client)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct AddressVerifierSettings {
    pub base_url: String,
    pub auth_id: String,
    pub auth_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl AddressVerifierSettings {
    pub fn client(&self) -> Result<AddressVerifierClient, anyhow::Error> {
        let client = AddressVerifierClient::new(
            self.base_url.clone(),
            self.auth_id.clone(),
            self.auth_token.clone(),
            Duration::from_millis(self.timeout_milliseconds),
        )?;
        Ok(client)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct NewsletterSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    /// Tag attached to every subscriber created by this service.
    pub tag: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl NewsletterSettings {
    pub fn client(&self) -> Result<NewsletterClient, anyhow::Error> {
        let client = NewsletterClient::new(
            self.base_url.clone(),
            self.api_key.clone(),
            Duration::from_millis(self.timeout_milliseconds),
        )?;
        Ok(client)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct EventSettings {
    /// Shown in the confirmation email subject and greeting.
    pub name: String,
    /// Signature at the bottom of the confirmation email.
    pub team_name: String,
    /// Where attendees can follow the event for regular updates.
    #[serde(default)]
    pub follow_url: Option<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001 would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for our application.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}
