//! Explicit dependencies of every workflow call.

use std::sync::Arc;

use paperdesk_core::AssistantBackend;
use paperdesk_store::IdStore;

use crate::config::WorkflowConfig;

/// Backend, id cache, and configuration passed to workflow functions.
#[derive(Clone)]
pub struct WorkflowContext {
    pub backend: Arc<dyn AssistantBackend>,
    pub store: IdStore,
    pub config: WorkflowConfig,
}

impl WorkflowContext {
    pub fn new(backend: Arc<dyn AssistantBackend>, store: IdStore, config: WorkflowConfig) -> Self {
        Self {
            backend,
            store,
            config,
        }
    }

    /// Context whose id cache lives in `config.data_dir`.
    pub fn with_data_dir_store(backend: Arc<dyn AssistantBackend>, config: WorkflowConfig) -> Self {
        let store = IdStore::new(config.data_dir.clone());
        Self::new(backend, store, config)
    }
}
