/// Integration tests for the Ollama oracle adapter
///
/// Test coverage:
/// - Generate call shape and response extraction
/// - Retry on transient status codes, no retry on client errors
/// - Malformed response bodies
/// - Health check against `/api/tags`
use mockito::{Matcher, Server};
use serde_json::json;

use themis::adapters::oracle::OllamaOracle;
use themis::domain::models::OracleConfig;
use themis::{OracleError, OracleRequest, OracleTask, ReasoningOracle};

fn oracle_for(server: &Server, max_retries: u32) -> OllamaOracle {
    OllamaOracle::new(OracleConfig {
        base_url: server.url(),
        model: "mistral:7b".to_string(),
        temperature: 0.6,
        classification_temperature: 0.0,
        timeout_secs: 5,
        requests_per_second: 50,
        max_retries,
    })
    .expect("Failed to create oracle")
}

#[tokio::test]
async fn test_generate_success_with_mock() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "mistral:7b",
            "stream": false,
            "options": { "temperature": 0.0 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "model": "mistral:7b", "response": "YES", "done": true }).to_string())
        .create_async()
        .await;

    let oracle = oracle_for(&server, 0);
    let reply = oracle
        .complete(OracleRequest::new(OracleTask::Relevance, "Chunk: Section 5"))
        .await
        .expect("generate failed");

    assert_eq!(reply, "YES");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generation_uses_generation_temperature() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({ "options": { "temperature": 0.6 } })))
        .with_status(200)
        .with_body(json!({ "response": "1. Both parties consent." }).to_string())
        .create_async()
        .await;

    let oracle = oracle_for(&server, 0);
    let reply = oracle
        .complete(OracleRequest::new(OracleTask::Answer, "Legal Context:\nSection 5"))
        .await
        .expect("generate failed");

    assert_eq!(reply, "1. Both parties consent.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transient_status_is_retried_then_surfaced() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_body("model loading")
        .expect(2)
        .create_async()
        .await;

    let oracle = oracle_for(&server, 1);
    let result = oracle
        .complete(OracleRequest::new(OracleTask::Decision, "decide"))
        .await;

    match result {
        Err(OracleError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "model loading");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(400)
        .with_body("model not found")
        .expect(1)
        .create_async()
        .await;

    let oracle = oracle_for(&server, 3);
    let result = oracle
        .complete(OracleRequest::new(OracleTask::Answer, "answer"))
        .await;

    assert!(matches!(result, Err(OracleError::Status { status: 400, .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let oracle = oracle_for(&server, 0);
    let result = oracle
        .complete(OracleRequest::new(OracleTask::Judge, "judge"))
        .await;

    assert!(matches!(result, Err(OracleError::Malformed(_))));
}

#[tokio::test]
async fn test_health_check_reads_tags_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(json!({ "models": [] }).to_string())
        .create_async()
        .await;

    let oracle = oracle_for(&server, 0);

    assert!(oracle.is_available().await.expect("health check failed"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_reported() {
    let oracle = OllamaOracle::new(OracleConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
        max_retries: 0,
        ..Default::default()
    })
    .expect("Failed to create oracle");

    let result = oracle
        .complete(OracleRequest::new(OracleTask::Decision, "decide"))
        .await;

    assert!(matches!(result, Err(OracleError::Unreachable(_))));
}
