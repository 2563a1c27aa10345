//! Workflow configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use paperdesk_core::defaults::{
    ADDRESSING_PERSONA, ASSISTANT_INSTRUCTIONS, ASSISTANT_MODEL, ASSISTANT_NAME, INDEX_NAME,
    MIN_POLL_INTERVAL_MS, POLL_INTERVAL_MS, POLL_MAX_WAIT_SECS, SOURCE_FILE,
    STREAM_CHUNK_DELAY_MS,
};
use paperdesk_core::{AssistantConfig, Error, ToolKind};

/// How answers are delivered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Whole answer at once.
    #[default]
    Batch,
    /// Text blocks one chunk at a time.
    Stream,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Stream => "stream",
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "stream" | "streaming" => Ok(Self::Stream),
            other => Err(Error::Config(format!("Unknown output mode: {}", other))),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval and deadline for waiting on a remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_wait: Duration::from_secs(POLL_MAX_WAIT_SECS),
        }
    }
}

impl PollConfig {
    /// Interval from configured milliseconds, raised to `MIN_POLL_INTERVAL_MS`.
    pub fn interval_from_millis(ms: u64) -> Duration {
        Duration::from_millis(ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Parameters shared by provisioning and question answering.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Name of the remote knowledge index.
    pub index_name: String,
    /// Name of the assistant created per question.
    pub assistant_name: String,
    /// Model answering questions.
    pub model: String,
    /// Assistant system prompt.
    pub instructions: String,
    /// Run-level instructions (how the user is addressed).
    pub persona: String,
    pub output_mode: OutputMode,
    /// Directory holding the source document and the id cache.
    pub data_dir: PathBuf,
    /// Source document, relative to `data_dir` unless absolute.
    pub source: PathBuf,
    /// Retrieve a cached index before reusing it.
    pub verify_cached_index: bool,
    pub poll: PollConfig,
    /// Pause after each streamed chunk.
    pub stream_delay: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            index_name: INDEX_NAME.to_string(),
            assistant_name: ASSISTANT_NAME.to_string(),
            model: ASSISTANT_MODEL.to_string(),
            instructions: ASSISTANT_INSTRUCTIONS.to_string(),
            persona: ADDRESSING_PERSONA.to_string(),
            output_mode: OutputMode::Batch,
            data_dir: PathBuf::from("."),
            source: PathBuf::from(SOURCE_FILE),
            verify_cached_index: true,
            poll: PollConfig::default(),
            stream_delay: Duration::from_millis(STREAM_CHUNK_DELAY_MS),
        }
    }
}

impl WorkflowConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `PAPERDESK_MODEL` | `gpt-4o` | Assistant model |
    /// | `PAPERDESK_INSTRUCTIONS` | research-paper author prompt | Assistant system prompt |
    /// | `PAPERDESK_PERSONA` | `Please address the user as reader.` | Run-level instructions |
    /// | `PAPERDESK_ASSISTANT_NAME` | `Paper Assistant` | Assistant name |
    /// | `PAPERDESK_INDEX_NAME` | `Paper` | Vector store name |
    /// | `PAPERDESK_OUTPUT_MODE` | `batch` | `batch` or `stream` |
    /// | `PAPERDESK_DATA_DIR` | `.` | Source document and id cache directory |
    /// | `PAPERDESK_SOURCE` | `paper.pdf` | Source document |
    /// | `PAPERDESK_VERIFY_INDEX` | `true` | Retrieve cached index before reuse |
    /// | `PAPERDESK_POLL_INTERVAL_MS` | `1000` | Poll interval (at least 100) |
    /// | `PAPERDESK_MAX_WAIT_SECS` | `600` | Poll deadline |
    /// | `PAPERDESK_STREAM_DELAY_MS` | `50` | Pause after each streamed chunk |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let text = |key: &str, default: String| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };
        let number = |key: &str, default: u64| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };

        let output_mode = match std::env::var("PAPERDESK_OUTPUT_MODE") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    subsystem = "workflow",
                    component = "config",
                    error = %e,
                    "Falling back to batch output"
                );
                OutputMode::Batch
            }),
            Err(_) => defaults.output_mode,
        };

        let verify_cached_index = std::env::var("PAPERDESK_VERIFY_INDEX")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.verify_cached_index);

        Self {
            index_name: text("PAPERDESK_INDEX_NAME", defaults.index_name),
            assistant_name: text("PAPERDESK_ASSISTANT_NAME", defaults.assistant_name),
            model: text("PAPERDESK_MODEL", defaults.model),
            instructions: text("PAPERDESK_INSTRUCTIONS", defaults.instructions),
            persona: std::env::var("PAPERDESK_PERSONA").unwrap_or(defaults.persona),
            output_mode,
            data_dir: std::env::var("PAPERDESK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            source: std::env::var("PAPERDESK_SOURCE")
                .map(PathBuf::from)
                .unwrap_or(defaults.source),
            verify_cached_index,
            poll: PollConfig {
                interval: PollConfig::interval_from_millis(number(
                    "PAPERDESK_POLL_INTERVAL_MS",
                    POLL_INTERVAL_MS,
                )),
                max_wait: Duration::from_secs(number("PAPERDESK_MAX_WAIT_SECS", POLL_MAX_WAIT_SECS)),
            },
            stream_delay: Duration::from_millis(number(
                "PAPERDESK_STREAM_DELAY_MS",
                STREAM_CHUNK_DELAY_MS,
            )),
        }
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_verify_cached_index(mut self, verify: bool) -> Self {
        self.verify_cached_index = verify;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_stream_delay(mut self, delay: Duration) -> Self {
        self.stream_delay = delay;
        self
    }

    /// Resolved path of the source document.
    pub fn source_path(&self) -> PathBuf {
        if self.source.is_absolute() {
            self.source.clone()
        } else {
            self.data_dir.join(&self.source)
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Assistant definition built for each question.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            name: self.assistant_name.clone(),
            instructions: self.instructions.clone(),
            model: self.model.clone(),
            tools: vec![ToolKind::FileSearch],
            index_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!("batch".parse::<OutputMode>().unwrap(), OutputMode::Batch);
        assert_eq!("Stream".parse::<OutputMode>().unwrap(), OutputMode::Stream);
        assert!("chunky".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_poll_config_defaults() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, Duration::from_millis(1000));
        assert_eq!(poll.max_wait, Duration::from_secs(600));
    }

    #[test]
    fn test_configured_poll_interval_has_floor() {
        assert_eq!(PollConfig::interval_from_millis(0), Duration::from_millis(100));
        assert_eq!(PollConfig::interval_from_millis(40), Duration::from_millis(100));
        assert_eq!(PollConfig::interval_from_millis(2500), Duration::from_millis(2500));
    }

    #[test]
    fn test_default_config() {
        let config = WorkflowConfig::default();
        assert_eq!(config.index_name, "Paper");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.persona, "Please address the user as reader.");
        assert_eq!(config.output_mode, OutputMode::Batch);
        assert!(config.verify_cached_index);
    }

    #[test]
    fn test_source_path_relative_to_data_dir() {
        let config = WorkflowConfig::default().with_data_dir("/srv/paper");
        assert_eq!(config.source_path(), PathBuf::from("/srv/paper/paper.pdf"));

        let config = config.with_source("/tmp/other.pdf");
        assert_eq!(config.source_path(), PathBuf::from("/tmp/other.pdf"));
    }

    #[test]
    fn test_assistant_config_uses_file_search() {
        let assistant = WorkflowConfig::default().assistant_config();
        assert_eq!(assistant.name, "Paper Assistant");
        assert_eq!(assistant.tools, vec![ToolKind::FileSearch]);
        assert!(assistant.index_id.is_none());
    }
}
