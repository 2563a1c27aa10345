//! JSON-file cache of remote resource identifiers.
//!
//! Each record lives in its own flat JSON object under the store's base
//! directory:
//!
//! | Kind | File | Body |
//! |------|------|------|
//! | [`RecordKind::Index`] | `vector_store_id.json` | `{"vector_store_id": "<id>"}` |
//! | [`RecordKind::File`] | `file_id.json` | `{"file_id": "<id>"}` |
//!
//! Writes replace the whole file through a temp file and rename. There is
//! no locking: two processes provisioning against an empty cache both
//! create resources and the last writer wins.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use paperdesk_core::defaults::{FILE_RECORD_FILE, INDEX_RECORD_FILE};
use paperdesk_core::{Error, FileRecord, IndexRecord, Result};

/// Which identifier a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Index,
    File,
}

impl RecordKind {
    /// File name of the record relative to the store directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Index => INDEX_RECORD_FILE,
            Self::File => FILE_RECORD_FILE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("index"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Identifier cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct IdStore {
    base_dir: PathBuf,
}

impl IdStore {
    /// Create a store rooted at `base_dir`. The directory is created on the
    /// first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store rooted at the current working directory.
    pub fn in_current_dir() -> Self {
        Self::new(".")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of a record.
    pub fn path(&self, kind: RecordKind) -> PathBuf {
        self.base_dir.join(kind.file_name())
    }

    /// Read a cached identifier.
    ///
    /// Returns `None` when the file is absent, unreadable, malformed, or
    /// holds an empty id. A malformed file is a cache miss, not an error.
    pub async fn load(&self, kind: RecordKind) -> Option<String> {
        let id = match kind {
            RecordKind::Index => self
                .read_record::<IndexRecord>(kind)
                .await
                .map(|r| r.index_id),
            RecordKind::File => self
                .read_record::<FileRecord>(kind)
                .await
                .map(|r| r.file_id),
        }?;

        if id.trim().is_empty() {
            warn!(
                subsystem = "store",
                component = "id_store",
                op = "load",
                record = %kind,
                "Cached record has an empty id, ignoring"
            );
            return None;
        }
        Some(id)
    }

    /// Overwrite the cached identifier for `kind`.
    pub async fn save(&self, kind: RecordKind, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "refusing to cache an empty {} id",
                kind
            )));
        }
        match kind {
            RecordKind::Index => {
                self.write_record(
                    kind,
                    &IndexRecord {
                        index_id: value.to_string(),
                    },
                )
                .await
            }
            RecordKind::File => {
                self.write_record(
                    kind,
                    &FileRecord {
                        file_id: value.to_string(),
                    },
                )
                .await
            }
        }
    }

    /// Remove a cached identifier. A missing file is not an error.
    pub async fn clear(&self, kind: RecordKind) -> Result<()> {
        let path = self.path(kind);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(
                    subsystem = "store",
                    component = "id_store",
                    op = "clear",
                    path = %path.display(),
                    "Cleared cached record"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn read_record<T: DeserializeOwned>(&self, kind: RecordKind) -> Option<T> {
        let path = self.path(kind);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    subsystem = "store",
                    component = "id_store",
                    op = "load",
                    path = %path.display(),
                    "No cached record"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    subsystem = "store",
                    component = "id_store",
                    op = "load",
                    path = %path.display(),
                    error = %e,
                    "Cached record unreadable, treating as absent"
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    subsystem = "store",
                    component = "id_store",
                    op = "load",
                    path = %path.display(),
                    error = %e,
                    "Cached record malformed, treating as absent"
                );
                None
            }
        }
    }

    async fn write_record<T: Serialize>(&self, kind: RecordKind, record: &T) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;

        let path = self.path(kind);
        let tmp_path = path.with_extension("json.tmp");
        let body = serde_json::to_string(record)?;

        fs::write(&tmp_path, body.as_bytes()).await?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(Error::Io(e));
        }

        debug!(
            subsystem = "store",
            component = "id_store",
            op = "save",
            path = %path.display(),
            "Cached record written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_file_names() {
        assert_eq!(RecordKind::Index.file_name(), "vector_store_id.json");
        assert_eq!(RecordKind::File.file_name(), "file_id.json");
    }

    #[test]
    fn test_path_joins_base_dir() {
        let store = IdStore::new("/tmp/paperdesk");
        assert_eq!(
            store.path(RecordKind::File),
            PathBuf::from("/tmp/paperdesk/file_id.json")
        );
    }

    #[tokio::test]
    async fn test_round_trip_index_record() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());

        store.save(RecordKind::Index, "vs_abc123").await.unwrap();
        assert_eq!(
            store.load(RecordKind::Index).await,
            Some("vs_abc123".to_string())
        );
    }

    #[tokio::test]
    async fn test_round_trip_file_record() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());

        store.save(RecordKind::File, "file-xyz").await.unwrap();
        assert_eq!(
            store.load(RecordKind::File).await,
            Some("file-xyz".to_string())
        );
    }

    #[tokio::test]
    async fn test_saved_file_layout() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        store.save(RecordKind::Index, "vs_1").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("vector_store_id.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"vector_store_id": "vs_1"}));
        assert!(!dir.path().join("vector_store_id.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_value() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());

        store.save(RecordKind::File, "file-old").await.unwrap();
        store.save(RecordKind::File, "file-new").await.unwrap();
        assert_eq!(
            store.load(RecordKind::File).await,
            Some("file-new".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        assert_eq!(store.load(RecordKind::Index).await, None);
        assert_eq!(store.load(RecordKind::File).await, None);
    }

    #[tokio::test]
    async fn test_load_malformed_is_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("file_id.json"), "{not json").unwrap();
        let store = IdStore::new(dir.path());
        assert_eq!(store.load(RecordKind::File).await, None);
    }

    #[tokio::test]
    async fn test_load_wrong_key_is_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("vector_store_id.json"),
            r#"{"file_id": "file-1"}"#,
        )
        .unwrap();
        let store = IdStore::new(dir.path());
        assert_eq!(store.load(RecordKind::Index).await, None);
    }

    #[tokio::test]
    async fn test_load_empty_id_is_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("file_id.json"), r#"{"file_id": "  "}"#).unwrap();
        let store = IdStore::new(dir.path());
        assert_eq!(store.load(RecordKind::File).await, None);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_id() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        let result = store.save(RecordKind::Index, "").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(!store.path(RecordKind::Index).exists());
    }

    #[tokio::test]
    async fn test_save_creates_base_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("cache").join("ids");
        let store = IdStore::new(&nested);
        store.save(RecordKind::Index, "vs_nested").await.unwrap();
        assert!(nested.join("vector_store_id.json").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        store.save(RecordKind::File, "file-1").await.unwrap();

        store.clear(RecordKind::File).await.unwrap();
        assert_eq!(store.load(RecordKind::File).await, None);
    }

    #[tokio::test]
    async fn test_clear_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        assert!(store.clear(RecordKind::Index).await.is_ok());
    }

    #[tokio::test]
    async fn test_records_are_independent() {
        let dir = TempDir::new().unwrap();
        let store = IdStore::new(dir.path());
        store.save(RecordKind::Index, "vs_1").await.unwrap();

        assert_eq!(store.load(RecordKind::File).await, None);
        store.clear(RecordKind::File).await.unwrap();
        assert_eq!(store.load(RecordKind::Index).await, Some("vs_1".to_string()));
    }
}
