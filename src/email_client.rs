use crate::domain::{AttendeeEmail, SenderIdentity};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Delivers one transactional email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email<'a>(&self, data: EmailData<'a>) -> Result<(), anyhow::Error>;
}

#[derive(Clone, Debug)]
pub struct EmailClient {
    base_url: String,
    http_client: Client,
    sender: SenderIdentity,
    authorization_token: Secret<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

#[derive(Debug)]
pub struct EmailData<'a> {
    pub recipient: &'a AttendeeEmail,
    pub subject: &'a str,
    pub html_content: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SenderIdentity,
        authorization_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        })
    }

    pub fn sender(&self) -> &SenderIdentity {
        &self.sender
    }

    #[tracing::instrument(name = "Sending email", skip(self, data), fields(recipient = %data.recipient))]
    pub async fn post_email<'a>(&self, data: EmailData<'a>) -> Result<(), reqwest::Error> {
        let url = format!("{}/email", self.base_url);
        let from = self.sender.mailbox();
        let request_body = SendEmailRequest {
            from: &from,
            to: data.recipient.as_ref(),
            subject: data.subject,
            html_body: data.html_content,
        };
        self.http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                tracing::error!("Failed to send email: {:?}", e);
                e
            })?;
        Ok(())
    }
}

#[async_trait]
impl EmailSender for EmailClient {
    async fn send_email<'a>(&self, data: EmailData<'a>) -> Result<(), anyhow::Error> {
        let recipient = data.recipient.clone();
        self.post_email(data)
            .await
            .with_context(|| format!("Failed to send an email to {}", recipient))
    }
}
