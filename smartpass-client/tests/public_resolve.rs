// smartpass-client/tests/public_resolve.rs
// Public badge lookup against a mocked API

use serde_json::json;
use shared::models::EmployeeStatus;
use smartpass_client::{ClientConfig, ClientError, Resolution, SmartPassClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SmartPassClient {
    ClientConfig::new(server.uri())
        .with_token("secret-token")
        .build_client()
        .unwrap()
}

#[tokio::test]
async fn test_resolve_found_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP000123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fullName": "Ana Silva",
            "jobTitle": "Engineer",
            "company": "Rikauto Angola",
            "department": "IT",
            "isActive": true,
            "profilePic": "https://cdn.example/ana.jpg",
            "idCardExpiration": "2026-12-31"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = client(&server).resolve("SP000123").await.unwrap();
    let profile = resolution.profile().unwrap();
    assert_eq!(profile.name, "Ana Silva");
    assert_eq!(profile.title.as_deref(), Some("Engineer"));
    assert_eq!(profile.status, EmployeeStatus::Active);
    assert!(profile.card_expiration.is_some());

    // The public endpoint never sees the admin token
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_resolve_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/does-not-exist"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Employee not found" })),
        )
        .mount(&server)
        .await;

    let resolution = client(&server).resolve("does-not-exist").await.unwrap();
    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn test_numeric_columns_still_resolve() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP000123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fullName": "Rui Costa",
            "phone": 923456789,
            "employeeId": 1001,
            "isActive": "false"
        })))
        .mount(&server)
        .await;

    let resolution = client(&server).resolve("SP000123").await.unwrap();
    let profile = resolution.profile().unwrap();
    assert_eq!(profile.name, "Rui Costa");
    assert_eq!(profile.status, EmployeeStatus::Inactive);
}

#[tokio::test]
async fn test_incomplete_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "company": "X" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(!client.resolve("SP1").await.unwrap().is_found());
    assert!(!client.resolve("SP2").await.unwrap().is_found());
}

#[tokio::test]
async fn test_wrapped_record_is_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/64f0c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "employee": { "name": "Rui Costa", "cargo": "Driver", "status": "Inactive" }
        })))
        .mount(&server)
        .await;

    let resolution = client(&server).resolve("64f0c2").await.unwrap();
    let profile = resolution.profile().unwrap();
    assert_eq!(profile.name, "Rui Costa");
    assert_eq!(profile.title.as_deref(), Some("Driver"));
    assert_eq!(profile.status, EmployeeStatus::Inactive);
}

#[tokio::test]
async fn test_identifier_is_escaped_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP%20123%2FX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fullName": "Eva" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).resolve("SP 123/X").await.unwrap().is_found());
}

#[tokio::test]
async fn test_unusable_identifier_sends_nothing() {
    let server = MockServer::start().await;
    let client = client(&server);

    assert_eq!(client.resolve("").await.unwrap(), Resolution::NotFound);
    assert_eq!(client.resolve("..").await.unwrap(), Resolution::NotFound);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/public/SP1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let err = client(&server).resolve("SP1").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Server { status: 500, ref message } if message == "database offline"
    ));
    assert!(err.is_retryable());
}
