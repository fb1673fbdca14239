/// Integration tests with a mocked Audience API
/// Tests the complete upload workflow without hitting the real Graph API
use meta_audience_connector::config::Config;
use meta_audience_connector::destination::Destination;
use meta_audience_connector::models::UserRow;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALICE_DIGEST: &str = "ff8d9819fc0e12bf0d24892e45987e249a28dce836a85cad60e28eaaa8c6d976";
const BOB_DIGEST: &str = "5ff860bf1190596c7188ab851db691f0f3169c453936e9e1eba2f9a47f7a0018";

/// Helper function to create a test config pointing at the mock server
fn create_test_config(graph_base_url: String) -> Config {
    Config {
        access_token: Some("test_token".to_string()),
        app_secret: Some("test_secret".to_string()),
        app_id: Some("test_app".to_string()),
        audience_id: Some("AUD123".to_string()),
        graph_base_url: Some(graph_base_url),
    }
}

#[tokio::test]
async fn test_live_upload_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AUD123/users"))
        .and(query_param("access_token", "test_token"))
        .and(body_partial_json(serde_json::json!({
            "schema": "email-hash",
            "data": [ALICE_DIGEST, BOB_DIGEST],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"num_received": 2})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let rows = vec![
        UserRow::with_email("Alice@Example.com"),
        UserRow::with_email("bob@example.com"),
    ];
    let result = destination.send_data(&rows, false).await;

    assert!(!result.dry_run);
    assert_eq!(result.successful_hits, 2);
    assert_eq!(result.failed_hits, 0);
    assert!(result.error_messages.is_empty());
}

#[tokio::test]
async fn test_live_upload_reports_partial_receipt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AUD123/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"num_received": 1})),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let rows = vec![
        UserRow::with_email("alice@example.com"),
        UserRow::with_email("bob@example.com"),
    ];
    let result = destination.send_data(&rows, false).await;

    // successful_hits comes from the service, not the local hash count
    assert_eq!(result.successful_hits, 1);
    assert_eq!(result.failed_hits, 0);
}

#[tokio::test]
async fn test_api_error_marks_whole_batch_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/AUD123/users"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"error": {"message": "Invalid OAuth access token"}}"#),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let rows = vec![
        UserRow::with_email("alice@example.com"),
        UserRow::with_email("bob@example.com"),
        UserRow::default(), // no email
    ];
    let result = destination.send_data(&rows, false).await;

    assert_eq!(result.successful_hits, 0);
    assert_eq!(result.failed_hits, 3);
    assert_eq!(result.error_messages.len(), 2);
    assert!(result.error_messages[0].contains("Email is required"));
    assert!(result.error_messages[1].contains("Failed to add users to audience"));
    assert!(result.error_messages[1].contains("400"));
}

#[tokio::test]
async fn test_malformed_api_response_is_a_submission_failure() {
    let mock_server = MockServer::start().await;

    // 200 but without the expected num_received body
    Mock::given(method("POST"))
        .and(path("/AUD123/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let rows = vec![UserRow::with_email("alice@example.com")];
    let result = destination.send_data(&rows, false).await;

    assert_eq!(result.successful_hits, 0);
    assert_eq!(result.failed_hits, 1);
    assert!(result.error_messages[0].contains("Failed to add users to audience"));
}

#[tokio::test]
async fn test_empty_input_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"num_received": 0})),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let result = destination.send_data(&[], false).await;

    assert_eq!(result.successful_hits, 0);
    assert_eq!(result.failed_hits, 0);
}

#[tokio::test]
async fn test_dry_run_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"num_received": 0})),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(mock_server.uri());
    let destination = Destination::new(config).unwrap();

    let rows = vec![
        UserRow::with_email("alice@example.com"),
        UserRow::default(),
    ];
    let result = destination.send_data(&rows, true).await;

    assert!(result.dry_run);
    assert_eq!(result.successful_hits, 1);
    assert_eq!(result.failed_hits, 1);
}
