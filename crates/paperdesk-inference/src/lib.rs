//! # paperdesk-inference
//!
//! Hosted assistant backends for paperdesk.
//!
//! This crate provides:
//! - OpenAI Assistants v2 implementation of
//!   [`AssistantBackend`](paperdesk_core::AssistantBackend)
//! - Provider error classification
//! - In-memory mock backend (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockAssistantBackend`] for downstream tests
//!
//! # Example
//!
//! ```rust,no_run
//! use paperdesk_inference::OpenAIBackend;
//! use paperdesk_core::AssistantBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let healthy = backend.health_check().await.unwrap();
//! }
//! ```

pub mod openai;

// Mock assistant backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use paperdesk_core::*;

pub use openai::{OpenAIBackend, OpenAIConfig};
