//! # paperdesk-store
//!
//! Local persistence for paperdesk: the identifiers of remote resources
//! that must survive process restarts so they are created only once.
//!
//! ## Example
//!
//! ```rust,no_run
//! use paperdesk_store::{IdStore, RecordKind};
//!
//! # async fn demo() -> paperdesk_core::Result<()> {
//! let store = IdStore::in_current_dir();
//! if store.load(RecordKind::Index).await.is_none() {
//!     store.save(RecordKind::Index, "vs_abc123").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod id_store;

pub use id_store::{IdStore, RecordKind};
