//! Centralized default constants for paperdesk.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers. Environment variables override most of them at startup.

// =============================================================================
// LOCAL FILES
// =============================================================================

/// Source document uploaded on first run.
pub const SOURCE_FILE: &str = "paper.pdf";

/// Cache file holding the knowledge index id.
pub const INDEX_RECORD_FILE: &str = "vector_store_id.json";

/// Cache file holding the uploaded file id.
pub const FILE_RECORD_FILE: &str = "file_id.json";

// =============================================================================
// ASSISTANT
// =============================================================================

/// Name given to the remote knowledge index.
pub const INDEX_NAME: &str = "Paper";

/// Name given to the assistant created for each question.
pub const ASSISTANT_NAME: &str = "Paper Assistant";

/// Model answering questions.
pub const ASSISTANT_MODEL: &str = "gpt-4o";

/// System prompt of the assistant.
pub const ASSISTANT_INSTRUCTIONS: &str = "You are an author of a research paper. \
Use your knowledge base to answer questions about the research described in the \
uploaded paper. Answer only from the paper's content; if the paper does not cover \
the question, say so. Reply in plain prose without markdown headings and keep \
answers under 300 words.";

/// Run-level instruction overriding how the user is addressed.
pub const ADDRESSING_PERSONA: &str = "Please address the user as reader.";

// =============================================================================
// REMOTE API
// =============================================================================

/// Default OpenAI API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// HTTP timeout for a single provider request in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// POLLING
// =============================================================================

/// Interval between polls of a file batch or run, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Smallest poll interval accepted from configuration, in milliseconds.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Maximum time to wait for a remote job, in seconds.
pub const POLL_MAX_WAIT_SECS: u64 = 600;

/// Delay after each streamed answer chunk, in milliseconds.
pub const STREAM_CHUNK_DELAY_MS: u64 = 50;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default SSE keep-alive interval in seconds.
pub const SSE_KEEPALIVE_SECS: u64 = 15;

/// Maximum accepted question length in characters.
pub const MAX_QUESTION_CHARS: usize = 4000;
