use crate::domain::AttendeeEmail;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

#[async_trait]
pub trait NewsletterSubscriber: Send + Sync {
    async fn subscribe(&self, email: &AttendeeEmail, tag: &str) -> Result<(), anyhow::Error>;
}

#[derive(Clone, Debug)]
pub struct NewsletterClient {
    base_url: String,
    http_client: Client,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
    tags: [&'a str; 1],
}

impl NewsletterClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
            api_key,
        })
    }
}

#[async_trait]
impl NewsletterSubscriber for NewsletterClient {
    #[tracing::instrument(name = "Subscribing to the newsletter", skip(self))]
    async fn subscribe(&self, email: &AttendeeEmail, tag: &str) -> Result<(), anyhow::Error> {
        let url = format!("{}/v1/subscribers", self.base_url);
        let request_body = SubscribeRequest {
            email: email.as_ref(),
            tags: [tag],
        };
        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Token {}", self.api_key.expose_secret()),
            )
            .json(&request_body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to subscribe {} to the newsletter", email))?;
        Ok(())
    }
}
