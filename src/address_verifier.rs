use crate::domain::{AddressPrecision, PostalAddress, VerificationCandidate, VerificationStatus};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::collections::BTreeMap;

/// Number of structured address lines the provider may return.
const ADDRESS_LINE_COUNT: usize = 12;

/// Looks up a freeform address and returns the provider's best match, if any.
#[async_trait]
pub trait AddressVerifier: Send + Sync {
    async fn verify(
        &self,
        address: &PostalAddress,
    ) -> Result<Option<VerificationCandidate>, anyhow::Error>;
}

/// Client for an international street verification API.
#[derive(Clone, Debug)]
pub struct AddressVerifierClient {
    base_url: String,
    http_client: Client,
    auth_id: String,
    auth_token: Secret<String>,
}

#[derive(serde::Deserialize)]
struct Analysis {
    verification_status: VerificationStatus,
    address_precision: AddressPrecision,
}

#[derive(serde::Deserialize)]
struct Candidate {
    analysis: Analysis,
    // `address1` ... `address12`, alongside components and metadata we ignore
    #[serde(flatten)]
    fields: BTreeMap<String, serde_json::Value>,
}

impl From<Candidate> for VerificationCandidate {
    fn from(candidate: Candidate) -> Self {
        let address_lines = (1..=ADDRESS_LINE_COUNT)
            .filter_map(|i| {
                candidate
                    .fields
                    .get(&format!("address{}", i))
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .collect();
        Self {
            status: candidate.analysis.verification_status,
            precision: candidate.analysis.address_precision,
            address_lines,
        }
    }
}

impl AddressVerifierClient {
    pub fn new(
        base_url: String,
        auth_id: String,
        auth_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
            auth_id,
            auth_token,
        })
    }

    #[tracing::instrument(name = "Looking up address candidates", skip(self))]
    async fn lookup(&self, address: &PostalAddress) -> Result<Vec<Candidate>, reqwest::Error> {
        let url = format!("{}/verify", self.base_url);
        self.http_client
            .get(&url)
            .query(&[
                ("auth-id", self.auth_id.as_str()),
                ("auth-token", self.auth_token.expose_secret().as_str()),
                ("country", address.country()),
                ("freeform", address.freeform()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Candidate>>()
            .await
    }
}

#[async_trait]
impl AddressVerifier for AddressVerifierClient {
    async fn verify(
        &self,
        address: &PostalAddress,
    ) -> Result<Option<VerificationCandidate>, anyhow::Error> {
        let candidates = self
            .lookup(address)
            .await
            .context("Failed to verify the postal address")?;
        Ok(candidates.into_iter().next().map(Into::into))
    }
}
