//! One-way sync engine
//!
//! [`SyncEngine::run_cycle`] performs a single synchronization cycle:
//!
//! 1. Validate that the local folder exists (abort before any network call)
//! 2. Fetch the remote inventory (abort on remote errors)
//! 3. Collect the local inventory (abort on local read errors)
//! 4. Reconcile the two snapshots into an [`ActionSet`]
//! 5. Upload new or resized files, isolating per-file failures
//! 6. Delete remote orphans, isolating per-file failures
//! 7. Log and return a [`CycleReport`]
//!
//! Nothing escapes a cycle as an error: aborts and per-file failures are
//! recorded in the report, and each caught error is logged exactly once.
//!
//! Uploads and deletes run with bounded concurrency. All uploads finish
//! before the first delete starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, error, info, warn, Instrument};
use yadsync_core::config::Config;
use yadsync_core::domain::{
    reconcile, ActionKind, ActionSet, CycleAbort, CyclePhase, CycleReport, FileName, Inventory,
    SyncError, SyncOutcome,
};
use yadsync_core::ports::IRemoteStore;

use crate::filesystem;

/// Default number of file operations in flight
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

// ============================================================================
// SyncPlan
// ============================================================================

/// Snapshot pair and the actions derived from it
///
/// Produced by steps 1-4 of a cycle; [`SyncEngine::plan`] returns it without
/// executing anything.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub local: Inventory,
    pub remote: Inventory,
    pub actions: ActionSet,
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Mirrors one local folder into the remote root of an [`IRemoteStore`]
pub struct SyncEngine {
    /// Remote storage, already bound to its root folder
    store: Arc<dyn IRemoteStore>,
    /// Folder whose regular files are mirrored
    local_folder: PathBuf,
    /// Upper bound on concurrent uploads or deletes
    max_concurrent: usize,
}

impl SyncEngine {
    /// Creates a new `SyncEngine`
    ///
    /// # Arguments
    /// * `store` - Remote storage bound to the target folder
    /// * `local_folder` - Source folder
    pub fn new(store: Arc<dyn IRemoteStore>, local_folder: impl Into<PathBuf>) -> Self {
        Self {
            store,
            local_folder: local_folder.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Creates an engine from the `sync` section of the configuration
    pub fn from_config(store: Arc<dyn IRemoteStore>, config: &Config) -> anyhow::Result<Self> {
        let folder = config
            .sync
            .local_folder
            .clone()
            .ok_or_else(|| anyhow::anyhow!("sync.local_folder is not configured"))?;
        Ok(Self::new(store, folder)
            .with_max_concurrent(config.sync.max_concurrent_transfers as usize))
    }

    /// Sets the number of file operations allowed in flight; 1 is sequential
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn local_folder(&self) -> &Path {
        &self.local_folder
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn store(&self) -> &Arc<dyn IRemoteStore> {
        &self.store
    }

    // ========================================================================
    // Cycle
    // ========================================================================

    /// Runs one full cycle and returns its report
    ///
    /// Never fails: an aborted cycle is a report with
    /// [`abort`](CycleReport::abort) set.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::begin();
        let span = tracing::info_span!("sync_cycle", cycle_id = %report.cycle_id);
        self.run_cycle_inner(&mut report).instrument(span).await;
        report
    }

    async fn run_cycle_inner(&self, report: &mut CycleReport) {
        let start = Instant::now();
        info!(
            local_folder = %self.local_folder.display(),
            remote_root = self.store.root(),
            "Starting sync cycle"
        );

        match self.prepare().await {
            Ok(plan) => {
                report.local_files = plan.local.len();
                report.remote_files = plan.remote.len();
                info!(
                    local_files = plan.local.len(),
                    remote_files = plan.remote.len(),
                    uploads = plan.actions.uploads.len(),
                    deletes = plan.actions.deletes.len(),
                    "Reconciled inventories"
                );

                debug!(phase = %CyclePhase::Executing, "Phase transition");
                report.outcomes = self.execute(&plan.actions).await;
            }
            Err(abort) => {
                error!(
                    phase = %abort.phase,
                    kind = %abort.error.kind(),
                    error_type = abort.error.variant_name(),
                    error = %abort.error,
                    "Sync cycle aborted"
                );
                report.abort = Some(abort);
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        debug!(phase = %CyclePhase::Idle, "Phase transition");

        if !report.is_aborted() {
            let counts = report.counts();
            info!(
                uploaded = counts.uploaded,
                upload_failures = counts.upload_failures,
                deleted = counts.deleted,
                delete_failures = counts.delete_failures,
                duration_ms = report.duration_ms,
                "Sync cycle complete"
            );
        }
    }

    /// Runs steps 1-4 and returns the plan without executing it
    ///
    /// # Errors
    /// The [`CycleAbort`] that a real cycle would have stopped with.
    pub async fn plan(&self) -> Result<SyncPlan, CycleAbort> {
        self.prepare().await
    }

    async fn prepare(&self) -> Result<SyncPlan, CycleAbort> {
        let abort = |phase| move |error: SyncError| CycleAbort { phase, error };

        debug!(phase = %CyclePhase::Validating, "Phase transition");
        filesystem::validate_folder(&self.local_folder)
            .await
            .map_err(abort(CyclePhase::Validating))?;

        debug!(phase = %CyclePhase::FetchingRemote, "Phase transition");
        let remote = filesystem::remote_inventory(self.store.as_ref())
            .await
            .map_err(abort(CyclePhase::FetchingRemote))?;

        debug!(phase = %CyclePhase::CollectingLocal, "Phase transition");
        let local = filesystem::local_inventory(&self.local_folder)
            .await
            .map_err(abort(CyclePhase::CollectingLocal))?;

        debug!(phase = %CyclePhase::Reconciling, "Phase transition");
        let actions = reconcile(&local, &remote);

        Ok(SyncPlan {
            local,
            remote,
            actions,
        })
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Executes all uploads, then all deletes
    ///
    /// Outcomes are returned uploads first, each group sorted by name.
    async fn execute(&self, actions: &ActionSet) -> Vec<SyncOutcome> {
        let mut uploads: Vec<SyncOutcome> = stream::iter(actions.uploads.iter().cloned())
            .map(|name| self.upload_one(name))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;
        uploads.sort_by(|a, b| a.name.cmp(&b.name));

        let mut deletes: Vec<SyncOutcome> = stream::iter(actions.deletes.iter().cloned())
            .map(|name| self.delete_one(name))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;
        deletes.sort_by(|a, b| a.name.cmp(&b.name));

        uploads.extend(deletes);
        uploads
    }

    async fn upload_one(&self, name: FileName) -> SyncOutcome {
        let path = self.local_folder.join(name.as_str());
        match self.store.upload(&path).await {
            Ok(()) => {
                info!(%name, action = %ActionKind::Upload, "File uploaded");
                SyncOutcome::success(name, ActionKind::Upload)
            }
            Err(e) => {
                let error = match e {
                    e @ SyncError::FileUpload { .. } => e,
                    other => SyncError::FileUpload {
                        filename: name.to_string(),
                        detail: other.to_string(),
                    },
                };
                warn!(
                    %name,
                    action = %ActionKind::Upload,
                    error_type = error.variant_name(),
                    error = %error,
                    "Upload failed"
                );
                SyncOutcome::failure(name, ActionKind::Upload, &error)
            }
        }
    }

    async fn delete_one(&self, name: FileName) -> SyncOutcome {
        let error = match self.store.delete(&name).await {
            Ok(true) => {
                info!(%name, action = %ActionKind::Delete, "Remote file deleted");
                return SyncOutcome::success(name, ActionKind::Delete);
            }
            Ok(false) => SyncError::FileDelete {
                filename: name.to_string(),
                detail: "deletion not confirmed by remote storage".to_string(),
            },
            Err(e @ SyncError::FileDelete { .. }) => e,
            Err(other) => SyncError::FileDelete {
                filename: name.to_string(),
                detail: other.to_string(),
            },
        };
        warn!(
            %name,
            action = %ActionKind::Delete,
            error_type = error.variant_name(),
            error = %error,
            "Delete failed"
        );
        SyncOutcome::failure(name, ActionKind::Delete, &error)
    }
}
