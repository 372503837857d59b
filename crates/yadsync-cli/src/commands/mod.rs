//! CLI command implementations

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::error;
use yadsync_core::config::Config;
use yadsync_core::domain::CycleAbort;
use yadsync_core::ports::IRemoteStore;
use yadsync_disk::provider::DiskRemoteStore;
use yadsync_sync::{SyncEngine, SyncPlan};

pub mod config;
pub mod plan;
pub mod run;
pub mod status;
pub mod sync;

/// Refuses to continue unless every required setting is present and sane
pub(crate) fn ensure_valid(config: &Config) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    bail!("Invalid configuration:\n{}", lines.join("\n"))
}

/// Wires the Yandex Disk store into a sync engine
pub(crate) fn build_engine(config: &Config) -> Result<SyncEngine> {
    ensure_valid(config)?;
    let store: Arc<dyn IRemoteStore> = Arc::new(DiskRemoteStore::from_config(config)?);
    SyncEngine::from_config(store, config)
}

/// [`SyncEngine::plan`], logging an abort the way a real cycle does
pub(crate) async fn plan_logged(engine: &SyncEngine) -> Result<SyncPlan, CycleAbort> {
    let plan = engine.plan().await;
    if let Err(abort) = &plan {
        error!(
            phase = %abort.phase,
            kind = %abort.error.kind(),
            error_type = abort.error.variant_name(),
            error = %abort.error,
            "Planning aborted"
        );
    }
    plan
}
