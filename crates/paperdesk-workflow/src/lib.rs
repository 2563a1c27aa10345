//! # paperdesk-workflow
//!
//! The two workflows of paperdesk:
//!
//! - [`provision::ensure_resources`]: create (once) and reuse the remote
//!   knowledge index and uploaded document
//! - [`session::answer_question`]: run one question through a fresh
//!   assistant and extract the answer
//!
//! Both take a [`WorkflowContext`] holding the backend, the id cache, and
//! the [`WorkflowConfig`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paperdesk_inference::OpenAIBackend;
//! use paperdesk_workflow::{answer_question, ensure_resources, WorkflowConfig, WorkflowContext};
//!
//! # async fn demo() -> paperdesk_core::Result<()> {
//! let config = WorkflowConfig::from_env();
//! let ctx = WorkflowContext::with_data_dir_store(Arc::new(OpenAIBackend::from_env()?), config);
//!
//! let provisioning = ensure_resources(&ctx, &ctx.config.source_path()).await?;
//! let outcome = answer_question(&ctx, &provisioning.resources, "Why is this paper important?").await?;
//! println!("{}", outcome.answer().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod extract;
pub mod poll;
pub mod provision;
pub mod session;

pub use config::{OutputMode, PollConfig, WorkflowConfig};
pub use context::WorkflowContext;
pub use extract::{extract_answer, extract_answer_stream};
pub use poll::poll_until;
pub use provision::{ensure_resources, EventLevel, ProvisionEvent, Provisioning};
pub use session::{answer_question, ask, AnswerOutcome};
