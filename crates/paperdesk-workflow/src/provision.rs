//! Idempotent provisioning of the knowledge index and the uploaded document.
//!
//! Each resource is created at most once: its id is cached through
//! [`IdStore`](paperdesk_store::IdStore) and reused on every later run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use paperdesk_core::defaults::SOURCE_FILE;
use paperdesk_core::{
    BatchStatus, Error, FileCounts, ProvisionedResources, Result, FILE_PURPOSE_ASSISTANTS,
};
use paperdesk_store::RecordKind;

use crate::context::WorkflowContext;
use crate::poll::poll_until;

/// Severity of a provisioning event as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Something that happened while provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionEvent {
    IndexCreated {
        index_id: String,
    },
    IndexReused {
        index_id: String,
        /// Whether the index was retrieved from the provider first.
        verified: bool,
    },
    BatchFinished {
        status: BatchStatus,
        file_counts: FileCounts,
    },
    FileUploaded {
        file_id: String,
    },
    FileReused {
        file_id: String,
    },
    SourceMissing {
        path: PathBuf,
    },
}

impl ProvisionEvent {
    /// Progress text for the user.
    pub fn message(&self) -> String {
        match self {
            Self::IndexCreated { index_id } => format!("Created knowledge index {}", index_id),
            Self::IndexReused { index_id, .. } => {
                format!("Using previously created knowledge index {}", index_id)
            }
            Self::BatchFinished {
                status,
                file_counts,
            } => format!("File batch {}: {}", status, file_counts),
            Self::FileUploaded { file_id } => format!("Uploaded and indexed file {}", file_id),
            Self::FileReused { file_id } => format!("Using previously uploaded file {}", file_id),
            Self::SourceMissing { path } => format!(
                "{} not found; questions are disabled until it is uploaded",
                path.display()
            ),
        }
    }

    pub fn level(&self) -> EventLevel {
        match self {
            Self::IndexCreated { .. } | Self::FileUploaded { .. } => EventLevel::Success,
            Self::IndexReused { .. } | Self::FileReused { .. } => EventLevel::Info,
            Self::BatchFinished { status, .. } => {
                if *status == BatchStatus::Completed {
                    EventLevel::Success
                } else {
                    EventLevel::Error
                }
            }
            Self::SourceMissing { .. } => EventLevel::Warning,
        }
    }
}

/// Outcome of a provisioning run.
#[derive(Debug, Clone)]
pub struct Provisioning {
    pub resources: ProvisionedResources,
    pub events: Vec<ProvisionEvent>,
}

/// Make sure the knowledge index and the uploaded document exist.
///
/// Cached ids are reused. Otherwise the index is created, the document at
/// `source_path` is uploaded and indexed, and the new ids are cached. A
/// missing source document is not an error: `file_id` stays `None`.
pub async fn ensure_resources(ctx: &WorkflowContext, source_path: &Path) -> Result<Provisioning> {
    let mut events = Vec::new();

    let index_id = ensure_index(ctx, &mut events).await?;

    let file_id = match ctx.store.load(RecordKind::File).await {
        Some(file_id) => {
            info!(
                subsystem = "workflow",
                component = "provision",
                file_id = %file_id,
                "Reusing uploaded file"
            );
            events.push(ProvisionEvent::FileReused {
                file_id: file_id.clone(),
            });
            Some(file_id)
        }
        None => upload_source(ctx, &index_id, source_path, &mut events).await?,
    };

    Ok(Provisioning {
        resources: ProvisionedResources { index_id, file_id },
        events,
    })
}

async fn ensure_index(ctx: &WorkflowContext, events: &mut Vec<ProvisionEvent>) -> Result<String> {
    if let Some(index_id) = ctx.store.load(RecordKind::Index).await {
        let verified = ctx.config.verify_cached_index;
        if verified {
            ctx.backend
                .retrieve_index(&index_id)
                .await
                .map_err(|e| match e {
                    Error::NotFound(msg) => Error::NotFound(format!(
                        "cached knowledge index {} no longer exists ({}); reset the cache to recreate it",
                        index_id, msg
                    )),
                    other => other,
                })?;
        }
        info!(
            subsystem = "workflow",
            component = "provision",
            index_id = %index_id,
            verified,
            "Reusing knowledge index"
        );
        events.push(ProvisionEvent::IndexReused {
            index_id: index_id.clone(),
            verified,
        });
        return Ok(index_id);
    }

    let index_id = ctx.backend.create_index(&ctx.config.index_name).await?;
    ctx.store.save(RecordKind::Index, &index_id).await?;
    info!(
        subsystem = "workflow",
        component = "provision",
        index_id = %index_id,
        name = %ctx.config.index_name,
        "Created knowledge index"
    );
    events.push(ProvisionEvent::IndexCreated {
        index_id: index_id.clone(),
    });
    Ok(index_id)
}

async fn upload_source(
    ctx: &WorkflowContext,
    index_id: &str,
    source_path: &Path,
    events: &mut Vec<ProvisionEvent>,
) -> Result<Option<String>> {
    if !tokio::fs::try_exists(source_path).await.unwrap_or(false) {
        warn!(
            subsystem = "workflow",
            component = "provision",
            path = %source_path.display(),
            "Source document not found"
        );
        events.push(ProvisionEvent::SourceMissing {
            path: source_path.to_path_buf(),
        });
        return Ok(None);
    }

    let filename = source_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(SOURCE_FILE)
        .to_string();
    let backend = ctx.backend.as_ref();
    let indexed_file = backend
        .upload_file(&filename, read_source(source_path).await?, FILE_PURPOSE_ASSISTANTS)
        .await?;
    let batch = backend
        .create_file_batch(index_id, &[indexed_file])
        .await?;

    let batch = if batch.status.is_terminal() {
        batch
    } else {
        let batch_id = batch.id.as_str();
        poll_until(
            &ctx.config.poll,
            move || backend.retrieve_file_batch(index_id, batch_id),
            |b| b.status.is_terminal(),
        )
        .await?
    };

    info!(
        subsystem = "workflow",
        component = "provision",
        index_id,
        status = %batch.status,
        completed = batch.file_counts.completed,
        failed = batch.file_counts.failed,
        "File batch finished"
    );
    events.push(ProvisionEvent::BatchFinished {
        status: batch.status.clone(),
        file_counts: batch.file_counts.clone(),
    });

    if batch.status != BatchStatus::Completed {
        return Err(Error::Remote(format!(
            "file batch {} finished with status {} ({})",
            batch.id, batch.status, batch.file_counts
        )));
    }

    // Attachment copy: the indexed file stays owned by the vector store.
    // Read again so only one copy of the document is held at a time.
    let file_id = backend
        .upload_file(&filename, read_source(source_path).await?, FILE_PURPOSE_ASSISTANTS)
        .await?;
    ctx.store.save(RecordKind::File, &file_id).await?;
    info!(
        subsystem = "workflow",
        component = "provision",
        file_id = %file_id,
        "Uploaded attachment file"
    );
    events.push(ProvisionEvent::FileUploaded {
        file_id: file_id.clone(),
    });

    Ok(Some(file_id))
}

async fn read_source(path: &Path) -> Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_event_level_follows_status() {
        let ok = ProvisionEvent::BatchFinished {
            status: BatchStatus::Completed,
            file_counts: FileCounts::default(),
        };
        let failed = ProvisionEvent::BatchFinished {
            status: BatchStatus::Failed,
            file_counts: FileCounts::default(),
        };
        assert_eq!(ok.level(), EventLevel::Success);
        assert_eq!(failed.level(), EventLevel::Error);
    }

    #[test]
    fn test_source_missing_message() {
        let event = ProvisionEvent::SourceMissing {
            path: PathBuf::from("data/paper.pdf"),
        };
        assert_eq!(event.level(), EventLevel::Warning);
        assert!(event.message().starts_with("data/paper.pdf not found"));
    }

    #[test]
    fn test_reuse_messages() {
        let event = ProvisionEvent::FileReused {
            file_id: "file-1".to_string(),
        };
        assert_eq!(event.message(), "Using previously uploaded file file-1");
        assert_eq!(event.level(), EventLevel::Info);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&EventLevel::Warning).unwrap();
        assert_eq!(json, r#""warning""#);
        assert_eq!(EventLevel::Success.to_string(), "success");
    }
}
