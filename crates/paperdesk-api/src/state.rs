//! Shared server state: provisioned resources and provisioning banners.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use paperdesk_core::{Error, ProvisionedResources, Result};
use paperdesk_store::RecordKind;
use paperdesk_workflow::{ensure_resources, EventLevel, WorkflowContext};

/// One status line shown above the question box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: EventLevel,
    pub message: String,
}

impl Banner {
    pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct ProvisioningState {
    resources: Option<ProvisionedResources>,
    banners: Vec<Banner>,
    last_run: Option<DateTime<Utc>>,
}

/// Snapshot of the provisioning state for status responses.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub ready: bool,
    pub index_id: Option<String>,
    pub file_id: Option<String>,
    pub output_mode: String,
    pub banners: Vec<Banner>,
    pub last_provisioned_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<WorkflowContext>,
    provisioning: Arc<RwLock<ProvisioningState>>,
    /// Serializes provisioning runs within this process.
    provision_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(ctx: WorkflowContext) -> Self {
        Self {
            ctx: Arc::new(ctx),
            provisioning: Arc::new(RwLock::new(ProvisioningState::default())),
            provision_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run provisioning and record its banners.
    ///
    /// On failure the previous resources are kept and a single error banner
    /// replaces the old ones, so the operator can retry.
    pub async fn provision(&self) -> Result<ProvisionedResources> {
        let _guard = self.provision_lock.lock().await;
        let source = self.ctx.config.source_path();

        match ensure_resources(&self.ctx, &source).await {
            Ok(provisioning) => {
                let banners = provisioning
                    .events
                    .iter()
                    .map(|e| Banner::new(e.level(), e.message()))
                    .collect();
                let mut state = self.provisioning.write().await;
                state.resources = Some(provisioning.resources.clone());
                state.banners = banners;
                state.last_run = Some(Utc::now());
                info!(
                    subsystem = "api",
                    component = "provision",
                    index_id = %provisioning.resources.index_id,
                    ready = provisioning.resources.can_answer(),
                    "Provisioning finished"
                );
                Ok(provisioning.resources)
            }
            Err(e) => {
                error!(
                    subsystem = "api",
                    component = "provision",
                    error = %e,
                    "Provisioning failed"
                );
                let mut state = self.provisioning.write().await;
                state.banners = vec![Banner::new(
                    EventLevel::Error,
                    format!("Provisioning failed: {}", e),
                )];
                state.last_run = Some(Utc::now());
                Err(e)
            }
        }
    }

    /// Forget the cached ids. Remote resources are left in place.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.provision_lock.lock().await;
        self.ctx.store.clear(RecordKind::Index).await?;
        self.ctx.store.clear(RecordKind::File).await?;

        let mut state = self.provisioning.write().await;
        state.resources = None;
        state.banners = vec![Banner::new(
            EventLevel::Info,
            "Cached ids cleared; provision again to create new resources",
        )];
        info!(subsystem = "api", component = "provision", "Cleared cached ids");
        Ok(())
    }

    /// Resources to answer with, or `NotReady` when provisioning never succeeded.
    pub async fn resources(&self) -> Result<ProvisionedResources> {
        self.provisioning
            .read()
            .await
            .resources
            .clone()
            .ok_or_else(|| Error::NotReady("resources are not provisioned yet".to_string()))
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let state = self.provisioning.read().await;
        StatusSnapshot {
            ready: state
                .resources
                .as_ref()
                .map(ProvisionedResources::can_answer)
                .unwrap_or(false),
            index_id: state.resources.as_ref().map(|r| r.index_id.clone()),
            file_id: state.resources.as_ref().and_then(|r| r.file_id.clone()),
            output_mode: self.ctx.config.output_mode.to_string(),
            banners: state.banners.clone(),
            last_provisioned_at: state.last_run,
        }
    }
}
