//! End-to-end tests for Deputy operations against a mock Stamps service.
//!
//! Deputy is the one kind whose wire attribute keys are underscore-form
//! (`user_email`); these tests pin that part of the contract.

use serde_json::{json, Value};
use stamps_client::{StampsClient, StampsConfig};
use stamps_model::{AttrMap, Deputy, ResourceKind, MEDIA_TYPE};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestFixture {
    server: MockServer,
    client: StampsClient,
}

impl TestFixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let client = StampsClient::new(StampsConfig {
            base_url: server.uri(),
            timeout_secs: 10,
        });
        Self { server, client }
    }
}

fn attrs(value: Value) -> AttrMap {
    value.as_object().unwrap().clone()
}

fn deputy_data(id: &str, user_email: &str, deputy: &str) -> Value {
    json!({
        "id": id,
        "type": "deputies",
        "attributes": { "user_email": user_email, "deputy": deputy }
    })
}

#[tokio::test]
async fn test_create_deputy() {
    let fixture = TestFixture::new().await;
    let id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/deputies"))
        .and(header("Accept", MEDIA_TYPE))
        .and(header("Content-Type", MEDIA_TYPE))
        .and(body_json(json!({
            "data": { "type": "deputies", "attributes": { "deputy": "deputy1" } }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": deputy_data(&id, "guest@test.com", "deputy1") })),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let deputy: Deputy = fixture
        .client
        .create(attrs(json!({ "deputy": "deputy1" })))
        .await
        .expect("Should create deputy");

    assert_eq!(deputy.id(), Some(id.as_str()));
    assert_eq!(deputy.user_email(), Some("guest@test.com"));
    assert_eq!(deputy.deputy(), Some("deputy1"));
}

#[tokio::test]
async fn test_find_deputy() {
    let fixture = TestFixture::new().await;
    let id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path(format!("/deputies/{}", id)))
        .and(header("Accept", MEDIA_TYPE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": deputy_data(&id, "guest@test.com", "deputy1") })),
        )
        .mount(&fixture.server)
        .await;

    let deputies = fixture
        .client
        .find::<Deputy>(&id)
        .await
        .expect("Should find deputy");

    assert_eq!(deputies.len(), 1);
    assert_eq!(deputies[0].id(), Some(id.as_str()));
    assert_eq!(deputies[0].user_email(), Some("guest@test.com"));
    assert_eq!(deputies[0].deputy(), Some("deputy1"));
}

#[tokio::test]
async fn test_all_deputies() {
    let fixture = TestFixture::new().await;
    let data = vec![
        deputy_data(&Uuid::new_v4().to_string(), "jeff@test.com", "deputy1"),
        deputy_data(&Uuid::new_v4().to_string(), "bob@test.com", "deputy2"),
    ];

    Mock::given(method("GET"))
        .and(path("/deputies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data.clone() })))
        .mount(&fixture.server)
        .await;

    let deputies = fixture
        .client
        .all::<Deputy>()
        .await
        .expect("Should list deputies");

    assert_eq!(deputies.len(), data.len());
    for (expected, deputy) in data.iter().zip(&deputies) {
        assert_eq!(deputy.id(), expected["id"].as_str());
        assert_eq!(deputy.user_email(), expected["attributes"]["user_email"].as_str());
        assert_eq!(deputy.deputy(), expected["attributes"]["deputy"].as_str());
    }
}
