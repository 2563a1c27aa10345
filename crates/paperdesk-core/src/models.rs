//! Domain models shared across paperdesk crates.
//!
//! These types describe the remote resources (index, uploaded file,
//! assistant, session, run) in provider-neutral terms. Wire formats for a
//! specific provider live in that provider's backend module.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// CACHED RECORDS
// =============================================================================

/// Handle of the remote knowledge index (vector store).
///
/// Persisted as `{"vector_store_id": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "vector_store_id")]
    pub index_id: String,
}

/// Handle of the uploaded document used as a per-question attachment.
///
/// Persisted as `{"file_id": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: String,
}

// =============================================================================
// UPLOAD BATCH
// =============================================================================

/// Status of a file batch being indexed into a vector store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchStatus {
    InProgress,
    Completed,
    Failed,
    Cancelled,
    /// Any status string the provider adds later.
    Other(String),
}

impl BatchStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Whether the batch has stopped changing.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl From<&str> for BatchStatus {
    fn from(s: &str) -> Self {
        match s {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BatchStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<BatchStatus> for String {
    fn from(status: BatchStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-outcome file counts reported for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    #[serde(default)]
    pub in_progress: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub cancelled: u32,
    #[serde(default)]
    pub total: u32,
}

impl fmt::Display for FileCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "completed={} failed={} cancelled={} in_progress={} total={}",
            self.completed, self.failed, self.cancelled, self.in_progress, self.total
        )
    }
}

/// Result of uploading files into the index. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadBatchResult {
    pub id: String,
    pub status: BatchStatus,
    pub file_counts: FileCounts,
}

// =============================================================================
// ASSISTANT & SESSION
// =============================================================================

/// Tool enabled on an assistant or on a message attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolKind {
    FileSearch,
}

/// Assistant definition, rebuilt on every question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<ToolKind>,
    /// Knowledge index bound through `tool_resources.file_search`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_id: Option<String>,
}

/// File reference carried by a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<ToolKind>,
}

/// Message used to open a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Conversation opened for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub initial_message: SessionMessage,
}

impl ConversationSession {
    /// Session whose only message is `question`, with `file_id` attached
    /// and searchable.
    pub fn for_question(question: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            initial_message: SessionMessage {
                role: "user".to_string(),
                content: question.into(),
                attachments: vec![Attachment {
                    file_id: file_id.into(),
                    tools: vec![ToolKind::FileSearch],
                }],
            },
        }
    }
}

/// Identifiers of the remote objects backing one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    pub session_id: String,
    pub assistant_id: String,
}

// =============================================================================
// RUN
// =============================================================================

/// Status of an inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    Cancelling,
    Completed,
    Failed,
    Expired,
    Cancelled,
    RequiresAction,
    Incomplete,
    /// Any status string the provider adds later.
    Other(String),
}

impl RunStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Cancelling => "cancelling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
            Self::RequiresAction => "requires_action",
            Self::Incomplete => "incomplete",
            Self::Other(s) => s,
        }
    }

    /// Whether polling should stop.
    ///
    /// `requires_action` and unrecognized statuses count as terminal: nothing
    /// in this system submits tool outputs, so waiting on them never ends.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "cancelling" => Self::Cancelling,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "expired" => Self::Expired,
            "cancelled" => Self::Cancelled,
            "requires_action" => Self::RequiresAction,
            "incomplete" => Self::Incomplete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polled state of an inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub id: String,
    pub session_id: String,
    pub status: RunStatus,
}

// =============================================================================
// MESSAGES
// =============================================================================

/// One content block of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { value: String },
    /// Non-text block; `kind` keeps the provider's type tag.
    Other { kind: String },
}

impl ContentBlock {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::Other { .. } => None,
        }
    }
}

/// A message in a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// Messages of a session, in the order the provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

impl MessageList {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Text values of every text block, message order then block order.
    pub fn text_values(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .flat_map(|m| m.content.iter())
            .filter_map(ContentBlock::as_text)
    }
}

// =============================================================================
// PROVISIONING
// =============================================================================

/// Remote resources available to the question-answering workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedResources {
    pub index_id: String,
    /// Absent when the source document was never uploaded.
    pub file_id: Option<String>,
}

impl ProvisionedResources {
    /// Whether questions can be asked against these resources.
    pub fn can_answer(&self) -> bool {
        self.file_id.is_some()
    }
}
