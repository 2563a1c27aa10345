//! Structured logging schema and field name constants for paperdesk.
//!
//! Every crate logs through `tracing` with the field names listed here, so
//! log queries work the same across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Provisioning or answering failed, user sees an error banner |
//! | WARN  | Recoverable issue: cache miss on malformed file, non-completed run |
//! | INFO  | Lifecycle events: startup, resource created or reused, run finished |
//! | DEBUG | Individual provider requests, poll ticks |
//! | TRACE | Streamed chunks |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID of the HTTP request (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "store", "inference", "workflow"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "id_store", "openai", "provision", "session", "poll"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create_index", "upload_file", "create_run", "list_messages"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Remote knowledge index id.
pub const INDEX_ID: &str = "index_id";

/// Remote uploaded file id.
pub const FILE_ID: &str = "file_id";

/// Remote conversation session id.
pub const SESSION_ID: &str = "session_id";

/// Remote inference run id.
pub const RUN_ID: &str = "run_id";

/// Status string reported by the provider.
pub const STATUS: &str = "status";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of polls performed before a terminal state.
pub const POLL_COUNT: &str = "poll_count";

/// Byte length of an answer.
pub const RESPONSE_LEN: &str = "response_len";

/// All field names, for schema checks.
pub const ALL_FIELDS: &[&str] = &[
    REQUEST_ID,
    SUBSYSTEM,
    COMPONENT,
    OPERATION,
    INDEX_ID,
    FILE_ID,
    SESSION_ID,
    RUN_ID,
    STATUS,
    DURATION_MS,
    POLL_COUNT,
    RESPONSE_LEN,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_unique() {
        let unique: HashSet<&str> = ALL_FIELDS.iter().copied().collect();
        assert_eq!(unique.len(), ALL_FIELDS.len());
    }

    #[test]
    fn test_field_names_snake_case() {
        for field in ALL_FIELDS {
            assert!(
                field.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{} is not snake_case",
                field
            );
        }
    }
}
