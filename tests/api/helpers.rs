use async_trait::async_trait;
use event_registration::attendee_store::AttendeeStore;
use event_registration::configuration::get_configuration;
use event_registration::domain::{AttendeeEmail, AttendeeRecord};
use event_registration::startup::Application;
use event_registration::telemetry::{get_subscriber, init_subscriber};
use std::sync::{Arc, LazyLock, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the subscriber's type, hence the two branches.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    }
});

/// Stands in for Postgres behind the same trait the application uses.
#[derive(Default)]
pub struct InMemoryAttendeeStore {
    records: Mutex<Vec<AttendeeRecord>>,
}

impl InMemoryAttendeeStore {
    pub fn records(&self) -> Vec<AttendeeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttendeeStore for InMemoryAttendeeStore {
    async fn email_exists(&self, email: &AttendeeEmail) -> Result<bool, anyhow::Error> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().any(|r| r.email == email.as_ref()))
    }

    async fn create(&self, record: &AttendeeRecord) -> Result<(), anyhow::Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub attendee_store: Arc<InMemoryAttendeeStore>,
    pub email_server: MockServer,
    pub address_verifier_server: MockServer,
    pub newsletter_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_register<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}/register", &self.address))
            .header("Origin", "https://example.com")
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_register_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/register", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Mounts a 200 on the email API that must be hit `times` times.
    pub async fn expect_emails(&self, times: u64) {
        Mock::given(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(times)
            .mount(&self.email_server)
            .await;
    }

    pub async fn expect_newsletter_subscriptions(&self, times: u64) {
        Mock::given(path("/v1/subscribers"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(times)
            .mount(&self.newsletter_server)
            .await;
    }

    pub async fn expect_address_lookups(&self, times: u64, body: serde_json::Value) {
        Mock::given(path("/verify"))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.address_verifier_server)
            .await;
    }

    /// HTML body of the n-th email sent to the email API.
    pub async fn sent_email_html(&self, n: usize) -> String {
        let requests = self.email_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[n].body).unwrap();
        body["HtmlBody"].as_str().unwrap().to_owned()
    }
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    // Launch mock servers to stand in for the third-party APIs
    let email_server = MockServer::start().await;
    let address_verifier_server = MockServer::start().await;
    let newsletter_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        c.email_client.base_url = email_server.uri();
        c.address_verifier.base_url = address_verifier_server.uri();
        c.newsletter.base_url = newsletter_server.uri();
        c
    };

    let attendee_store = Arc::new(InMemoryAttendeeStore::default());
    let application = Application::build_with_store(configuration, attendee_store.clone())
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());

    #[allow(clippy::let_underscore_future)]
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        attendee_store,
        email_server,
        address_verifier_server,
        newsletter_server,
        api_client: reqwest::Client::new(),
    }
}
