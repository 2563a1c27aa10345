//! Core traits for paperdesk abstractions.
//!
//! The assistant provider is reached only through [`AssistantBackend`], so
//! workflows can run against the HTTP backend or an in-memory mock.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

/// Purpose tag attached to uploaded files.
pub const FILE_PURPOSE_ASSISTANTS: &str = "assistants";

/// Remote operations offered by a hosted assistant provider.
///
/// Every method is a single request; long-running jobs (file batches and
/// runs) are started by one call and observed by polling another.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Create a knowledge index with a human-readable name. Returns its id.
    async fn create_index(&self, name: &str) -> Result<String>;

    /// Fetch an existing index. Returns its id.
    async fn retrieve_index(&self, index_id: &str) -> Result<String>;

    /// Upload a file with the given purpose. Returns the file id.
    async fn upload_file(&self, filename: &str, bytes: Vec<u8>, purpose: &str) -> Result<String>;

    /// Start indexing already-uploaded files into an index.
    async fn create_file_batch(
        &self,
        index_id: &str,
        file_ids: &[String],
    ) -> Result<UploadBatchResult>;

    /// Poll a file batch.
    async fn retrieve_file_batch(&self, index_id: &str, batch_id: &str)
        -> Result<UploadBatchResult>;

    /// Create an assistant. Returns its id.
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<String>;

    /// Bind the file-search tool of an assistant to an index.
    async fn update_assistant(&self, assistant_id: &str, index_id: &str) -> Result<()>;

    /// Open a conversation session. Returns its id.
    async fn create_session(&self, session: &ConversationSession) -> Result<String>;

    /// Start an inference run on a session.
    async fn create_run(
        &self,
        session_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<RunResult>;

    /// Poll an inference run.
    async fn retrieve_run(&self, session_id: &str, run_id: &str) -> Result<RunResult>;

    /// List the messages of a session.
    async fn list_messages(&self, session_id: &str) -> Result<MessageList>;

    /// Check whether the provider is reachable with the configured credential.
    async fn health_check(&self) -> Result<bool>;
}
