//! OpenAI Assistants v2 backend.
//!
//! Maps the [`AssistantBackend`](paperdesk_core::AssistantBackend)
//! operations onto the provider's REST endpoints:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `create_index` / `retrieve_index` | `POST /vector_stores`, `GET /vector_stores/{id}` |
//! | `upload_file` | `POST /files` (multipart) |
//! | `create_file_batch` / `retrieve_file_batch` | `/vector_stores/{id}/file_batches[/{batch}]` |
//! | `create_assistant` / `update_assistant` | `POST /assistants[/{id}]` |
//! | `create_session` | `POST /threads` |
//! | `create_run` / `retrieve_run` | `/threads/{id}/runs[/{run}]` |
//! | `list_messages` | `GET /threads/{id}/messages` |
//!
//! # Example
//!
//! ```rust,no_run
//! use paperdesk_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use paperdesk_core::AssistantBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = OpenAIBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:8080/v1".to_string(),
//!         ..OpenAIConfig::with_api_key("sk-...")
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let index_id = backend.create_index("Paper").await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, ASSISTANTS_BETA, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_paperdesk_error, OpenAIErrorCode};
pub use types::*;
