use crate::helpers::spawn_app;
use event_registration::domain::AttendeeRecord;
use serde_json::json;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const TROUBLE_REGISTERING: &str =
    "We had trouble registering you. If this error persists please email us.";

fn ada() -> serde_json::Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "newsletter": true
    })
}

fn ada_with_address() -> serde_json::Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "address": "1 Main St",
        "country": "United Kingdom",
        "newsletter": false
    })
}

fn verified_premise() -> serde_json::Value {
    json!([{
        "address1": "1 Main St",
        "address2": "London",
        "address3": "UK",
        "analysis": {
            "verification_status": "Verified",
            "address_precision": "Premise"
        }
    }])
}

#[tokio::test]
async fn register_without_address_stores_notifies_and_subscribes() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    test_app.expect_newsletter_subscriptions(1).await;
    test_app.expect_address_lookups(0, json!([])).await;

    // Act
    let response = test_app.post_register(&ada()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    assert_eq!(header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(
        header("access-control-allow-headers").as_deref(),
        Some("Content-Type")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"address": false}));
    assert_eq!(
        test_app.attendee_store.records(),
        vec![AttendeeRecord {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            address: None,
            address_verified: None,
        }]
    );
    let html = test_app.sent_email_html(0).await;
    assert!(!html.contains("stickers"));
}

#[tokio::test]
async fn register_with_a_verified_address_stores_the_canonical_address() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    test_app.expect_newsletter_subscriptions(0).await;
    Mock::given(path("/verify"))
        .and(method("GET"))
        .and(query_param("freeform", "1 Main St"))
        .and(query_param("country", "United Kingdom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(verified_premise()))
        .expect(1)
        .mount(&test_app.address_verifier_server)
        .await;

    // Act
    let response = test_app.post_register(&ada_with_address()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"address": true, "verified": true}));
    let records = test_app.attendee_store.records();
    assert_eq!(records[0].address.as_deref(), Some("1 Main St, London, UK"));
    assert_eq!(records[0].address_verified, Some(true));
    let html = test_app.sent_email_html(0).await;
    assert!(html.contains("We successfully verified your address"));
}

#[tokio::test]
async fn register_with_an_unverified_address_keeps_the_typed_address() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    let unverified = json!([{
        "address1": "1 Main St",
        "analysis": {
            "verification_status": "None",
            "address_precision": "None"
        }
    }]);
    test_app.expect_address_lookups(1, unverified).await;

    // Act
    let response = test_app.post_register(&ada_with_address()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"address": true, "verified": false}));
    let records = test_app.attendee_store.records();
    assert_eq!(
        records[0].address.as_deref(),
        Some("1 Main St, United Kingdom")
    );
    assert_eq!(records[0].address_verified, Some(false));
    let html = test_app.sent_email_html(0).await;
    assert!(html.contains("If 1 Main St, United Kingdom is correct"));
}

#[tokio::test]
async fn register_returns_a_500_when_data_is_missing() {
    // Arrange
    let test_app = spawn_app().await;
    for server in [
        &test_app.email_server,
        &test_app.address_verifier_server,
        &test_app.newsletter_server,
    ] {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }
    let test_cases = vec![
        (
            json!({"last_name": "Lovelace", "email": "ada@example.com"}),
            "missing the first name",
        ),
        (
            json!({"first_name": "Ada", "last_name": "", "email": "ada@example.com"}),
            "empty last name",
        ),
        (
            json!({"first_name": "Ada", "last_name": "Lovelace"}),
            "missing the email",
        ),
        (json!({}), "missing everything"),
    ];
    for (invalid_body, description) in test_cases {
        // Act
        let response = test_app.post_register(&invalid_body).await;

        // Assert
        assert_eq!(
            500,
            response.status().as_u16(),
            "The API did not fail with 500 when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"error": "You must provide your first name, last name and email."})
        );
    }
    assert!(test_app.attendee_store.records().is_empty());
}

#[tokio::test]
async fn register_rejects_a_partial_address() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_address_lookups(0, json!([])).await;
    test_app.expect_emails(0).await;
    let mut body = ada();
    body["country"] = json!("United Kingdom");

    // Act
    let response = test_app.post_register(&body).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "If you want to receive stickers, you must fill in both address fields."})
    );
    assert!(test_app.attendee_store.records().is_empty());
}

#[tokio::test]
async fn registering_twice_is_rejected_the_second_time() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    test_app.expect_newsletter_subscriptions(1).await;

    // Act
    let first = test_app.post_register(&ada()).await;
    let second = test_app.post_register(&ada()).await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    assert_eq!(500, second.status().as_u16());
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body, json!({"error": "You have already registered."}));
    assert_eq!(test_app.attendee_store.records().len(), 1);
}

#[tokio::test]
async fn a_failing_address_verifier_stops_the_registration() {
    // Arrange
    let test_app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.address_verifier_server)
        .await;
    test_app.expect_emails(0).await;

    // Act
    let response = test_app.post_register(&ada_with_address()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": TROUBLE_REGISTERING}));
    assert!(test_app.attendee_store.records().is_empty());
}

#[tokio::test]
async fn an_address_without_candidates_stops_the_registration() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_address_lookups(1, json!([])).await;
    test_app.expect_emails(0).await;
    test_app.expect_newsletter_subscriptions(0).await;

    // Act
    let response = test_app.post_register(&ada_with_address()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": TROUBLE_REGISTERING}));
    assert!(test_app.attendee_store.records().is_empty());
}

#[tokio::test]
async fn a_failing_email_provider_fails_the_request_but_keeps_the_attendee() {
    // Arrange
    let test_app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    test_app.expect_newsletter_subscriptions(0).await;

    // Act
    let response = test_app.post_register(&ada()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": TROUBLE_REGISTERING}));
    assert_eq!(test_app.attendee_store.records().len(), 1);
}

#[tokio::test]
async fn a_failing_newsletter_provider_does_not_fail_the_registration() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&test_app.newsletter_server)
        .await;

    // Act
    let response = test_app.post_register(&ada()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"address": false}));
}

#[tokio::test]
async fn a_truthy_newsletter_value_subscribes_the_attendee() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(1).await;
    test_app.expect_newsletter_subscriptions(1).await;
    let mut body = ada();
    body["newsletter"] = json!("yes");

    // Act
    let response = test_app.post_register(&body).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"address": false}));
}

#[tokio::test]
async fn a_malformed_body_gets_the_generic_error() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.expect_emails(0).await;

    // Act
    let response = test_app.post_register_raw("{not json").await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-headers")
            .and_then(|v| v.to_str().ok()),
        Some("Content-Type")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": TROUBLE_REGISTERING}));
}

#[tokio::test]
async fn other_methods_get_a_benign_invalid_method_response() {
    // Arrange
    let test_app = spawn_app().await;

    for request in [
        test_app
            .api_client
            .get(format!("{}/register", test_app.address)),
        test_app
            .api_client
            .put(format!("{}/register", test_app.address)),
    ] {
        // Act
        let response = request.send().await.expect("Failed to execute request.");

        // Assert
        assert_eq!(200, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid method"}));
    }
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    // Arrange
    let test_app = spawn_app().await;

    // Act
    let response = test_app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/register", test_app.address),
        )
        .header("Origin", "https://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert!(response.status().is_success());
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_lowercase)
    };
    assert_eq!(header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(
        header("access-control-allow-headers").as_deref(),
        Some("content-type")
    );
}
