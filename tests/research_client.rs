//! Contract tests for ResearchClient against a mock research backend.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/v1/langchain/states/` | `states_*` |
//! | GET    | `/api/v1/langchain/status/` | `status_*` |
//! | POST   | `/api/v1/langchain/chat/` | `chat_*` |

use salestax::research::{ResearchClient, ResearchConfig, ResearchError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> ResearchClient {
    let config = ResearchConfig::new(&format!("{}/api/v1", mock_server.uri()), 5).unwrap();
    ResearchClient::new(config).unwrap()
}

// ── GET /langchain/states/ ───────────────────────────────────────────

#[tokio::test]
async fn states_decodes_researched_and_pending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/langchain/states/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_documents": 42,
            "states_researched": 2,
            "states": [
                {"code": "AL", "name": "Alabama", "document_count": 12, "has_sales_tax": true},
                {"code": "NY", "name": "New York", "document_count": 30, "has_sales_tax": true}
            ],
            "states_not_researched": [{"code": "OR", "name": "Oregon"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let states = client.researched_states().await.unwrap();
    assert_eq!(states.total_documents, 42);
    assert_eq!(states.states.len(), 2);
    assert_eq!(states.states[1].code, "NY");
    assert_eq!(states.states_not_researched[0].name, "Oregon");
    assert_eq!(salestax::research::default_state(&states), Some("NY"));
}

#[tokio::test]
async fn states_maps_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/langchain/states/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.researched_states().await {
        Err(ResearchError::Api { status, endpoint, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "GET /langchain/states/");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn states_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/langchain/states/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.researched_states().await;
    assert!(matches!(result, Err(ResearchError::Deserialization { .. })));
}

#[tokio::test]
async fn states_reports_unreachable_backend() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);
    drop(mock_server);

    let result = client.researched_states().await;
    assert!(matches!(result, Err(ResearchError::Http { .. })));
}

// ── POST /langchain/chat/ ────────────────────────────────────────────

#[tokio::test]
async fn chat_sends_query_and_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/langchain/chat/"))
        .and(body_json(json!({
            "query": "What is the clothing exemption threshold in NY?",
            "state_code": "NY"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "What is the clothing exemption threshold in NY?",
            "state_code": "NY",
            "response": "Clothing and footwear under $110 per item is exempt from the state tax.",
            "status": {
                "llm_provider": "openai",
                "vector_store_type": "chroma",
                "conversation_length": 2
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .chat("What is the clothing exemption threshold in NY?", Some("NY"))
        .await
        .unwrap();
    assert!(response.response.contains("$110"));
    assert_eq!(response.state_code.as_deref(), Some("NY"));
    assert_eq!(response.status.unwrap().conversation_length, 2);
}

#[tokio::test]
async fn chat_without_state_sends_empty_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/langchain/chat/"))
        .and(body_json(json!({"query": "Which states have no sales tax?", "state_code": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "Which states have no sales tax?",
            "response": "Alaska, Delaware, Montana, New Hampshire and Oregon."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client.chat("Which states have no sales tax?", None).await.unwrap();
    assert!(response.state_code.is_none());
    assert!(response.status.is_none());
}

#[tokio::test]
async fn chat_maps_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/langchain/chat/"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.chat("?", Some("NY")).await.unwrap_err();
    assert!(matches!(err, ResearchError::Api { status: 422, .. }));
}

// ── GET /langchain/status/ ───────────────────────────────────────────

#[tokio::test]
async fn status_decodes_agent_info() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/langchain/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "vector_store": {"type": "chroma", "document_count": 128},
            "agent": {
                "llm_provider": "anthropic",
                "vector_store_type": "chroma",
                "available_providers": ["anthropic", "openai"]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let status = client.status().await.unwrap();
    assert_eq!(status.vector_store.kind, "chroma");
    assert_eq!(status.vector_store.document_count, 128);
    assert_eq!(status.agent.available_providers.len(), 2);
    assert_eq!(status.agent.conversation_length, 0);
}
