//! Mock assistant backend for deterministic testing.
//!
//! Keeps every remote object in memory, logs each call, and replays
//! configured status sequences for file batches and runs.
//!
//! ## Usage
//!
//! ```rust
//! use paperdesk_core::{AssistantBackend, RunStatus};
//! use paperdesk_inference::mock::MockAssistantBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockAssistantBackend::new()
//!         .with_run_statuses(vec![RunStatus::InProgress, RunStatus::Completed])
//!         .with_text_answer("42");
//!
//!     let index_id = backend.create_index("Paper").await.unwrap();
//!     assert_eq!(backend.call_count("create_index"), 1);
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use paperdesk_core::{
    AssistantBackend, AssistantConfig, BatchStatus, ContentBlock, ConversationSession, Error,
    FileCounts, Message, MessageList, Result, RunResult, RunStatus, UploadBatchResult,
};

/// Mock assistant backend for testing.
#[derive(Clone)]
pub struct MockAssistantBackend {
    config: Arc<MockConfig>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    batch_statuses: Vec<BatchStatus>,
    run_statuses: Vec<RunStatus>,
    messages: MessageList,
    failures: HashMap<String, String>,
    healthy: bool,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<MockCall>,
    next_id: u64,
    batch_polls: HashMap<String, usize>,
    run_polls: HashMap<String, usize>,
    uploads: Vec<MockUpload>,
    assistants: Vec<AssistantConfig>,
    bindings: HashMap<String, String>,
    sessions: Vec<ConversationSession>,
    run_instructions: Vec<String>,
}

/// One logged backend call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockUpload {
    pub file_id: String,
    pub filename: String,
    pub purpose: String,
    pub size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            batch_statuses: vec![BatchStatus::Completed],
            run_statuses: vec![RunStatus::Completed],
            messages: MessageList::default(),
            failures: HashMap::new(),
            healthy: true,
        }
    }
}

impl MockAssistantBackend {
    /// Create a new mock backend: batches and runs complete immediately,
    /// sessions have no messages.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Statuses returned for a file batch: creation returns the first, each
    /// poll advances one step, the last repeats.
    pub fn with_batch_statuses(mut self, statuses: Vec<BatchStatus>) -> Self {
        if !statuses.is_empty() {
            Arc::make_mut(&mut self.config).batch_statuses = statuses;
        }
        self
    }

    /// Statuses returned for a run, with the same stepping as batches.
    pub fn with_run_statuses(mut self, statuses: Vec<RunStatus>) -> Self {
        if !statuses.is_empty() {
            Arc::make_mut(&mut self.config).run_statuses = statuses;
        }
        self
    }

    /// Messages returned by `list_messages` for every session.
    pub fn with_messages(mut self, messages: MessageList) -> Self {
        Arc::make_mut(&mut self.config).messages = messages;
        self
    }

    /// Shorthand for a single assistant message with one text block.
    pub fn with_text_answer(self, answer: impl Into<String>) -> Self {
        self.with_messages(MessageList::new(vec![Message {
            id: "msg_mock_answer".to_string(),
            role: "assistant".to_string(),
            content: vec![ContentBlock::text(answer)],
        }]))
    }

    /// Make `operation` fail with a remote error carrying `message`.
    pub fn with_failure(mut self, operation: &str, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .failures
            .insert(operation.to_string(), message.into());
        self
    }

    /// Set the result of `health_check`.
    pub fn with_health(mut self, healthy: bool) -> Self {
        Arc::make_mut(&mut self.config).healthy = healthy;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Operation names in call order.
    pub fn operations(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .map(|c| c.operation.clone())
            .collect()
    }

    /// Number of calls made to `operation`.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.state().calls.clear()
    }

    /// Files uploaded so far.
    pub fn uploads(&self) -> Vec<MockUpload> {
        self.state().uploads.clone()
    }

    /// Assistants created so far.
    pub fn assistants(&self) -> Vec<AssistantConfig> {
        self.state().assistants.clone()
    }

    /// Index bound to an assistant through `update_assistant`.
    pub fn bound_index(&self, assistant_id: &str) -> Option<String> {
        self.state().bindings.get(assistant_id).cloned()
    }

    /// Sessions opened so far.
    pub fn sessions(&self) -> Vec<ConversationSession> {
        self.state().sessions.clone()
    }

    /// Run-level instructions passed to `create_run`, in order.
    pub fn run_instructions(&self) -> Vec<String> {
        self.state().run_instructions.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_call(&self, operation: &str, input: &str) -> Result<()> {
        self.state().calls.push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
        match self.config.failures.get(operation) {
            Some(message) => Err(Error::Remote(message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state();
        state.next_id += 1;
        format!("{}_mock_{}", prefix, state.next_id)
    }

    fn batch_result(&self, batch_id: &str, step: usize) -> UploadBatchResult {
        let statuses = &self.config.batch_statuses;
        let status = statuses[step.min(statuses.len() - 1)].clone();
        let file_counts = match status {
            BatchStatus::Completed => FileCounts {
                completed: 1,
                total: 1,
                ..Default::default()
            },
            BatchStatus::Failed => FileCounts {
                failed: 1,
                total: 1,
                ..Default::default()
            },
            BatchStatus::Cancelled => FileCounts {
                cancelled: 1,
                total: 1,
                ..Default::default()
            },
            _ => FileCounts {
                in_progress: 1,
                total: 1,
                ..Default::default()
            },
        };
        UploadBatchResult {
            id: batch_id.to_string(),
            status,
            file_counts,
        }
    }

    fn run_result(&self, session_id: &str, run_id: &str, step: usize) -> RunResult {
        let statuses = &self.config.run_statuses;
        RunResult {
            id: run_id.to_string(),
            session_id: session_id.to_string(),
            status: statuses[step.min(statuses.len() - 1)].clone(),
        }
    }
}

impl Default for MockAssistantBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantBackend for MockAssistantBackend {
    async fn create_index(&self, name: &str) -> Result<String> {
        self.log_call("create_index", name)?;
        Ok(self.next_id("vs"))
    }

    async fn retrieve_index(&self, index_id: &str) -> Result<String> {
        self.log_call("retrieve_index", index_id)?;
        Ok(index_id.to_string())
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>, purpose: &str) -> Result<String> {
        self.log_call("upload_file", &format!("{}:{}", filename, purpose))?;
        let file_id = self.next_id("file");
        self.state().uploads.push(MockUpload {
            file_id: file_id.clone(),
            filename: filename.to_string(),
            purpose: purpose.to_string(),
            size: bytes.len(),
        });
        Ok(file_id)
    }

    async fn create_file_batch(
        &self,
        index_id: &str,
        file_ids: &[String],
    ) -> Result<UploadBatchResult> {
        self.log_call(
            "create_file_batch",
            &format!("{}:{}", index_id, file_ids.join(",")),
        )?;
        let batch_id = self.next_id("vsfb");
        self.state().batch_polls.insert(batch_id.clone(), 0);
        Ok(self.batch_result(&batch_id, 0))
    }

    async fn retrieve_file_batch(
        &self,
        index_id: &str,
        batch_id: &str,
    ) -> Result<UploadBatchResult> {
        self.log_call("retrieve_file_batch", &format!("{}:{}", index_id, batch_id))?;
        let step = {
            let mut state = self.state();
            let polls = state
                .batch_polls
                .get_mut(batch_id)
                .ok_or_else(|| Error::NotFound(format!("batch {}", batch_id)))?;
            *polls += 1;
            *polls
        };
        Ok(self.batch_result(batch_id, step))
    }

    async fn create_assistant(&self, config: &AssistantConfig) -> Result<String> {
        self.log_call("create_assistant", &config.name)?;
        let assistant_id = self.next_id("asst");
        self.state().assistants.push(config.clone());
        Ok(assistant_id)
    }

    async fn update_assistant(&self, assistant_id: &str, index_id: &str) -> Result<()> {
        self.log_call(
            "update_assistant",
            &format!("{}:{}", assistant_id, index_id),
        )?;
        self.state()
            .bindings
            .insert(assistant_id.to_string(), index_id.to_string());
        Ok(())
    }

    async fn create_session(&self, session: &ConversationSession) -> Result<String> {
        self.log_call("create_session", &session.initial_message.content)?;
        let session_id = self.next_id("thread");
        self.state().sessions.push(session.clone());
        Ok(session_id)
    }

    async fn create_run(
        &self,
        session_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<RunResult> {
        self.log_call("create_run", &format!("{}:{}", session_id, assistant_id))?;
        let run_id = self.next_id("run");
        {
            let mut state = self.state();
            state.run_polls.insert(run_id.clone(), 0);
            state.run_instructions.push(instructions.to_string());
        }
        Ok(self.run_result(session_id, &run_id, 0))
    }

    async fn retrieve_run(&self, session_id: &str, run_id: &str) -> Result<RunResult> {
        self.log_call("retrieve_run", &format!("{}:{}", session_id, run_id))?;
        let step = {
            let mut state = self.state();
            let polls = state
                .run_polls
                .get_mut(run_id)
                .ok_or_else(|| Error::NotFound(format!("run {}", run_id)))?;
            *polls += 1;
            *polls
        };
        Ok(self.run_result(session_id, run_id, step))
    }

    async fn list_messages(&self, session_id: &str) -> Result<MessageList> {
        self.log_call("list_messages", session_id)?;
        Ok(self.config.messages.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        self.log_call("health_check", "")?;
        Ok(self.config.healthy)
    }
}
