//! Integration tests for the OpenAI assistants backend against a mock server.
//!
//! Each test mounts the provider endpoints it expects on a wiremock server
//! and checks request shape (path, headers, body) and response mapping.

use paperdesk_core::{
    AssistantBackend, AssistantConfig, BatchStatus, ContentBlock, ConversationSession, Error,
    RunStatus, ToolKind,
};
use paperdesk_inference::openai::{OpenAIBackend, OpenAIConfig, ASSISTANTS_BETA};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> OpenAIBackend {
    let config = OpenAIConfig {
        base_url: server.uri(),
        timeout_seconds: 10,
        ..OpenAIConfig::with_api_key("test-key")
    };
    OpenAIBackend::new(config).expect("Failed to create backend")
}

#[tokio::test]
async fn test_create_index_sends_auth_and_beta_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vector_stores"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("OpenAI-Beta", ASSISTANTS_BETA))
        .and(body_json(json!({"name": "Paper"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "vs_abc", "object": "vector_store", "name": "Paper"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let index_id = backend.create_index("Paper").await.unwrap();
    assert_eq!(index_id, "vs_abc");
}

#[tokio::test]
async fn test_organization_header_sent_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vector_stores/vs_abc"))
        .and(header("OpenAI-Organization", "org-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "vs_abc", "status": "completed"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = OpenAIConfig {
        base_url: mock_server.uri(),
        organization: Some("org-test".to_string()),
        ..OpenAIConfig::with_api_key("test-key")
    };
    let backend = OpenAIBackend::new(config).unwrap();
    assert_eq!(backend.retrieve_index("vs_abc").await.unwrap(), "vs_abc");
}

#[tokio::test]
async fn test_upload_file_is_multipart_with_purpose() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_string_contains("name=\"purpose\""))
        .and(body_string_contains("assistants"))
        .and(body_string_contains("filename=\"paper.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-xyz",
            "object": "file",
            "filename": "paper.pdf",
            "purpose": "assistants"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let file_id = backend
        .upload_file("paper.pdf", b"%PDF-1.4 test".to_vec(), "assistants")
        .await
        .unwrap();
    assert_eq!(file_id, "file-xyz");
}

#[tokio::test]
async fn test_file_batch_create_and_retrieve() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vector_stores/vs_abc/file_batches"))
        .and(body_json(json!({"file_ids": ["file-xyz"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vsfb_1",
            "status": "in_progress",
            "file_counts": {"in_progress": 1, "completed": 0, "failed": 0, "cancelled": 0, "total": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vector_stores/vs_abc/file_batches/vsfb_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vsfb_1",
            "status": "completed",
            "file_counts": {"in_progress": 0, "completed": 1, "failed": 0, "cancelled": 0, "total": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let batch = backend
        .create_file_batch("vs_abc", &["file-xyz".to_string()])
        .await
        .unwrap();
    assert_eq!(batch.status, BatchStatus::InProgress);

    let batch = backend
        .retrieve_file_batch("vs_abc", &batch.id)
        .await
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(batch.file_counts.completed, 1);
}

#[tokio::test]
async fn test_update_assistant_binds_vector_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistants/asst_1"))
        .and(body_json(json!({
            "tool_resources": {"file_search": {"vector_store_ids": ["vs_abc"]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    backend.update_assistant("asst_1", "vs_abc").await.unwrap();
}

#[tokio::test]
async fn test_create_assistant_with_file_search_tool() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistants"))
        .and(body_json(json!({
            "model": "gpt-4o",
            "name": "Paper Assistant",
            "instructions": "Answer from the paper.",
            "tools": [{"type": "file_search"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let config = AssistantConfig {
        name: "Paper Assistant".to_string(),
        instructions: "Answer from the paper.".to_string(),
        model: "gpt-4o".to_string(),
        tools: vec![ToolKind::FileSearch],
        index_id: None,
    };
    assert_eq!(backend.create_assistant(&config).await.unwrap(), "asst_1");
}

#[tokio::test]
async fn test_create_session_attaches_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads"))
        .and(body_json(json!({
            "messages": [{
                "role": "user",
                "content": "What is the main result?",
                "attachments": [{"file_id": "file-xyz", "tools": [{"type": "file_search"}]}]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let session = ConversationSession::for_question("What is the main result?", "file-xyz");
    assert_eq!(backend.create_session(&session).await.unwrap(), "thread_1");
}

#[tokio::test]
async fn test_run_lifecycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_1/runs"))
        .and(body_json(json!({
            "assistant_id": "asst_1",
            "instructions": "Please address the user as reader."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1", "thread_id": "thread_1", "status": "queued"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "expired",
            "last_error": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let run = backend
        .create_run("thread_1", "asst_1", "Please address the user as reader.")
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Queued);
    assert_eq!(run.session_id, "thread_1");

    let run = backend.retrieve_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Expired);
}

#[tokio::test]
async fn test_list_messages_maps_content_blocks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {
                    "id": "msg_2",
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": {"value": "The paper proves X.", "annotations": []}},
                        {"type": "image_file", "image_file": {"file_id": "file-img"}}
                    ]
                },
                {
                    "id": "msg_1",
                    "role": "user",
                    "content": [{"type": "text", "text": {"value": "What does it prove?", "annotations": []}}]
                }
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let list = backend.list_messages("thread_1").await.unwrap();

    assert_eq!(list.messages.len(), 2);
    assert_eq!(list.messages[0].role, "assistant");
    assert_eq!(
        list.messages[0].content[0],
        ContentBlock::text("The paper proves X.")
    );
    assert!(list.messages[0].content[1].as_text().is_none());
    let values: Vec<&str> = list.text_values().collect();
    assert_eq!(values, vec!["The paper proves X.", "What does it prove?"]);
}

#[tokio::test]
async fn test_unauthorized_maps_to_config_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vector_stores"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let err = backend.create_index("Paper").await.unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    assert!(err.to_string().contains("Incorrect API key"));
}

#[tokio::test]
async fn test_missing_index_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vector_stores/vs_gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No vector store found with id 'vs_gone'.", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let err = backend.retrieve_index("vs_gone").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let err = backend.list_messages("thread_1").await.unwrap_err();
    assert!(matches!(err, Error::Remote(_)), "got {:?}", err);
    assert!(err.to_string().contains("Server error"));
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(backend.health_check().await.unwrap());
}

#[tokio::test]
async fn test_health_check_unhealthy_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    assert!(!backend.health_check().await.unwrap());
}
