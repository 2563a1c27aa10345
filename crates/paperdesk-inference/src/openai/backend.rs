//! OpenAI Assistants v2 backend implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use paperdesk_core::defaults::{OPENAI_URL, REQUEST_TIMEOUT_SECS};
use paperdesk_core::{
    AssistantBackend, AssistantConfig, ConversationSession, Error, MessageList, Result, RunResult,
    UploadBatchResult,
};

use super::error::{to_paperdesk_error, OpenAIErrorCode};
use super::types::*;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = OPENAI_URL;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = REQUEST_TIMEOUT_SECS;

/// Beta header value required by the Assistants API.
pub const ASSISTANTS_BETA: &str = "assistants=v2";

/// Configuration for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Optional `OpenAI-Organization` header.
    pub organization: Option<String>,
}

impl OpenAIConfig {
    /// Config with default endpoint and timeout.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: api_key.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            organization: None,
        }
    }

    /// Read configuration from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `OPENAI_API_KEY` | (required) | Secret credential; `GPT_KEY` is accepted as a fallback |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` | API endpoint |
    /// | `OPENAI_TIMEOUT` | `300` | Request timeout (seconds) |
    /// | `OPENAI_ORGANIZATION` | (none) | Organization header |
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .or_else(|_| std::env::var("GPT_KEY"))
            .map_err(|_| {
                Error::Config("OPENAI_API_KEY (or GPT_KEY) must be set".to_string())
            })?;

        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key,
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            organization: std::env::var("OPENAI_ORGANIZATION").ok(),
        })
    }
}

/// Assistant backend talking to the OpenAI Assistants v2 API.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("OpenAI API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing OpenAI assistants backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication and the assistants beta header.
    fn build_request(&self, method: Method, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self
            .client
            .request(method, &url)
            .bearer_auth(&self.config.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA);

        if let Some(ref org) = self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        req
    }

    /// Send a request and decode a JSON body, mapping provider errors.
    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder, op: &str) -> Result<T> {
        debug!(subsystem = "inference", component = "openai", op, "Sending request");

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("{} timed out: {}", op, e))
            } else {
                Error::Request(format!("{} failed: {}", op, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: OpenAIErrorResponse =
                response.json().await.unwrap_or(OpenAIErrorResponse {
                    error: OpenAIError {
                        message: "Unknown error".to_string(),
                        error_type: "unknown".to_string(),
                        code: None,
                    },
                });
            let kind = body
                .error
                .code
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(&body.error.error_type);
            let code = OpenAIErrorCode::from_response(status.as_u16(), kind);
            warn!(
                subsystem = "inference",
                component = "openai",
                op,
                status = status.as_u16(),
                retryable = code.is_retryable(),
                error = %body.error.message,
                "OpenAI request failed"
            );
            return Err(to_paperdesk_error(
                code,
                &format!("{} returned {}: {}", op, status, body.error.message),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse {} response: {}", op, e)))
    }
}

/// MIME type sent with an upload, from the file extension.
fn guess_mime_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl AssistantBackend for OpenAIBackend {
    async fn create_index(&self, name: &str) -> Result<String> {
        let request = CreateVectorStoreRequest {
            name: name.to_string(),
        };
        let store: VectorStoreObject = self
            .send(
                self.build_request(Method::POST, "/vector_stores").json(&request),
                "create_index",
            )
            .await?;

        info!(
            subsystem = "inference",
            component = "openai",
            op = "create_index",
            index_id = %store.id,
            "Created vector store"
        );
        Ok(store.id)
    }

    async fn retrieve_index(&self, index_id: &str) -> Result<String> {
        let store: VectorStoreObject = self
            .send(
                self.build_request(Method::GET, &format!("/vector_stores/{}", index_id)),
                "retrieve_index",
            )
            .await?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "retrieve_index",
            index_id = %store.id,
            status = store.status.as_deref().unwrap_or("unknown"),
            "Retrieved vector store"
        );
        Ok(store.id)
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>, purpose: &str) -> Result<String> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(guess_mime_type(filename))?;
        let form = Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let file: FileObject = self
            .send(
                self.build_request(Method::POST, "/files").multipart(form),
                "upload_file",
            )
            .await?;

        info!(
            subsystem = "inference",
            component = "openai",
            op = "upload_file",
            file_id = %file.id,
            filename,
            purpose,
            size_bytes = size,
            "Uploaded file"
        );
        Ok(file.id)
    }

    async fn create_file_batch(
        &self,
        index_id: &str,
        file_ids: &[String],
    ) -> Result<UploadBatchResult> {
        let request = CreateFileBatchRequest {
            file_ids: file_ids.to_vec(),
        };
        let batch: FileBatchObject = self
            .send(
                self.build_request(
                    Method::POST,
                    &format!("/vector_stores/{}/file_batches", index_id),
                )
                .json(&request),
                "create_file_batch",
            )
            .await?;
        Ok(batch.into())
    }

    async fn retrieve_file_batch(
        &self,
        index_id: &str,
        batch_id: &str,
    ) -> Result<UploadBatchResult> {
        let batch: FileBatchObject = self
            .send(
                self.build_request(
                    Method::GET,
                    &format!("/vector_stores/{}/file_batches/{}", index_id, batch_id),
                ),
                "retrieve_file_batch",
            )
            .await?;
        Ok(batch.into())
    }

    async fn create_assistant(&self, config: &AssistantConfig) -> Result<String> {
        let request = CreateAssistantRequest {
            model: config.model.clone(),
            name: config.name.clone(),
            instructions: config.instructions.clone(),
            tools: config.tools.clone(),
            tool_resources: config.index_id.as_deref().map(ToolResources::for_index),
        };
        let assistant: AssistantObject = self
            .send(
                self.build_request(Method::POST, "/assistants").json(&request),
                "create_assistant",
            )
            .await?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "create_assistant",
            assistant_id = %assistant.id,
            model = %config.model,
            "Created assistant"
        );
        Ok(assistant.id)
    }

    async fn update_assistant(&self, assistant_id: &str, index_id: &str) -> Result<()> {
        let request = UpdateAssistantRequest {
            tool_resources: ToolResources::for_index(index_id),
        };
        let _: AssistantObject = self
            .send(
                self.build_request(Method::POST, &format!("/assistants/{}", assistant_id))
                    .json(&request),
                "update_assistant",
            )
            .await?;
        Ok(())
    }

    async fn create_session(&self, session: &ConversationSession) -> Result<String> {
        let request = CreateThreadRequest {
            messages: vec![session.initial_message.clone()],
        };
        let thread: ThreadObject = self
            .send(
                self.build_request(Method::POST, "/threads").json(&request),
                "create_session",
            )
            .await?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "create_session",
            session_id = %thread.id,
            "Created thread"
        );
        Ok(thread.id)
    }

    async fn create_run(
        &self,
        session_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<RunResult> {
        let request = CreateRunRequest {
            assistant_id: assistant_id.to_string(),
            instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
        };
        let run: RunObject = self
            .send(
                self.build_request(Method::POST, &format!("/threads/{}/runs", session_id))
                    .json(&request),
                "create_run",
            )
            .await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, session_id: &str, run_id: &str) -> Result<RunResult> {
        let run: RunObject = self
            .send(
                self.build_request(
                    Method::GET,
                    &format!("/threads/{}/runs/{}", session_id, run_id),
                ),
                "retrieve_run",
            )
            .await?;

        if let Some(ref err) = run.last_error {
            warn!(
                subsystem = "inference",
                component = "openai",
                op = "retrieve_run",
                run_id = %run.id,
                code = err.code.as_deref().unwrap_or(""),
                error = err.message.as_deref().unwrap_or(""),
                "Run reported an error"
            );
        }
        Ok(run.into())
    }

    async fn list_messages(&self, session_id: &str) -> Result<MessageList> {
        let response: MessageListResponse = self
            .send(
                self.build_request(Method::GET, &format!("/threads/{}/messages", session_id)),
                "list_messages",
            )
            .await?;

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "list_messages",
            session_id,
            message_count = response.data.len(),
            has_more = response.has_more,
            "Listed messages"
        );
        Ok(response.into())
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .build_request(Method::GET, "/models")
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("OpenAI health check passed");
                    Ok(true)
                } else {
                    warn!("OpenAI health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("OpenAI health check error: {}", e);
                Ok(false)
            }
        }
    }
}
