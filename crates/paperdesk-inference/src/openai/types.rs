//! OpenAI Assistants v2 request and response types.

use serde::{Deserialize, Serialize};

use paperdesk_core::{
    BatchStatus, ContentBlock, FileCounts, Message, MessageList, RunResult, RunStatus,
    SessionMessage, ToolKind, UploadBatchResult,
};

// =============================================================================
// VECTOR STORE TYPES
// =============================================================================

/// Request body for creating a vector store.
#[derive(Debug, Serialize)]
pub struct CreateVectorStoreRequest {
    pub name: String,
}

/// Vector store object.
#[derive(Debug, Deserialize)]
pub struct VectorStoreObject {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for creating a file batch.
#[derive(Debug, Serialize)]
pub struct CreateFileBatchRequest {
    pub file_ids: Vec<String>,
}

/// File batch object.
#[derive(Debug, Deserialize)]
pub struct FileBatchObject {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub file_counts: FileCounts,
}

impl From<FileBatchObject> for UploadBatchResult {
    fn from(batch: FileBatchObject) -> Self {
        Self {
            id: batch.id,
            status: batch.status,
            file_counts: batch.file_counts,
        }
    }
}

// =============================================================================
// FILE TYPES
// =============================================================================

/// Uploaded file object.
#[derive(Debug, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

// =============================================================================
// ASSISTANT TYPES
// =============================================================================

/// `tool_resources` block binding file search to vector stores.
#[derive(Debug, Serialize)]
pub struct ToolResources {
    pub file_search: FileSearchResources,
}

/// Vector stores searched by the file-search tool.
#[derive(Debug, Serialize)]
pub struct FileSearchResources {
    pub vector_store_ids: Vec<String>,
}

impl ToolResources {
    pub fn for_index(index_id: &str) -> Self {
        Self {
            file_search: FileSearchResources {
                vector_store_ids: vec![index_id.to_string()],
            },
        }
    }
}

/// Request body for creating an assistant.
#[derive(Debug, Serialize)]
pub struct CreateAssistantRequest {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

/// Request body for modifying an assistant.
#[derive(Debug, Serialize)]
pub struct UpdateAssistantRequest {
    pub tool_resources: ToolResources,
}

/// Assistant object.
#[derive(Debug, Deserialize)]
pub struct AssistantObject {
    pub id: String,
}

// =============================================================================
// THREAD & RUN TYPES
// =============================================================================

/// Request body for creating a thread.
#[derive(Debug, Serialize)]
pub struct CreateThreadRequest {
    pub messages: Vec<SessionMessage>,
}

/// Thread object.
#[derive(Debug, Deserialize)]
pub struct ThreadObject {
    pub id: String,
}

/// Request body for creating a run.
#[derive(Debug, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Error details attached to a failed run.
#[derive(Debug, Deserialize)]
pub struct RunLastError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Run object.
#[derive(Debug, Deserialize)]
pub struct RunObject {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

impl From<RunObject> for RunResult {
    fn from(run: RunObject) -> Self {
        Self {
            id: run.id,
            session_id: run.thread_id,
            status: run.status,
        }
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// Response from the list-messages endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    pub data: Vec<MessageObject>,
    #[serde(default)]
    pub has_more: bool,
}

/// Message object.
#[derive(Debug, Deserialize)]
pub struct MessageObject {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContentPart>,
}

/// One content part of a message. Only `text` parts carry a value.
#[derive(Debug, Deserialize)]
pub struct MessageContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(default)]
    pub text: Option<TextContent>,
}

/// Text payload of a `text` content part.
#[derive(Debug, Deserialize)]
pub struct TextContent {
    pub value: String,
}

impl From<MessageContentPart> for ContentBlock {
    fn from(part: MessageContentPart) -> Self {
        match (part.part_type.as_str(), part.text) {
            ("text", Some(text)) => ContentBlock::Text { value: text.value },
            _ => ContentBlock::Other {
                kind: part.part_type,
            },
        }
    }
}

impl From<MessageListResponse> for MessageList {
    fn from(response: MessageListResponse) -> Self {
        MessageList::new(
            response
                .data
                .into_iter()
                .map(|m| Message {
                    id: m.id,
                    role: m.role,
                    content: m.content.into_iter().map(ContentBlock::from).collect(),
                })
                .collect(),
        )
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error response from OpenAI API.
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub code: Option<String>,
}
