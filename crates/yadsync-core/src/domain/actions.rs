//! Action sets, per-file outcomes and cycle reports
//!
//! These are the derived, ephemeral values of a single cycle:
//! [`ActionSet`] is what reconciliation decided, [`SyncOutcome`] is what
//! happened to each file, and [`CycleReport`] aggregates the cycle for the
//! log.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::SyncError;
use super::inventory::FileName;

// ============================================================================
// ActionSet
// ============================================================================

/// Uploads and deletes computed for one cycle
///
/// Built by [`reconcile`](super::reconcile::reconcile); the two sets are
/// disjoint by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    /// Local files that are missing remotely or differ in size
    pub uploads: BTreeSet<FileName>,
    /// Remote files with no local counterpart
    pub deletes: BTreeSet<FileName>,
}

impl ActionSet {
    /// Returns true when there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletes.is_empty()
    }

    /// Total number of file operations in the set
    pub fn len(&self) -> usize {
        self.uploads.len() + self.deletes.len()
    }
}

// ============================================================================
// SyncOutcome
// ============================================================================

/// Which operation a [`SyncOutcome`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Upload,
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Upload => f.write_str("upload"),
            ActionKind::Delete => f.write_str("delete"),
        }
    }
}

/// Whether a file operation succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Result of one upload or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub name: FileName,
    pub action: ActionKind,
    pub status: OutcomeStatus,
    /// Error text for failures
    pub detail: Option<String>,
}

impl SyncOutcome {
    /// A successful operation
    pub fn success(name: FileName, action: ActionKind) -> Self {
        Self {
            name,
            action,
            status: OutcomeStatus::Success,
            detail: None,
        }
    }

    /// A failed operation, carrying the error text
    pub fn failure(name: FileName, action: ActionKind, error: &SyncError) -> Self {
        Self {
            name,
            action,
            status: OutcomeStatus::Failure,
            detail: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

// ============================================================================
// CyclePhase
// ============================================================================

/// States a cycle moves through
///
/// `Idle → Validating → FetchingRemote → CollectingLocal → Reconciling →
/// Executing → Idle`. An abort jumps straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Idle,
    Validating,
    FetchingRemote,
    CollectingLocal,
    Reconciling,
    Executing,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Validating => "validating",
            CyclePhase::FetchingRemote => "fetching_remote",
            CyclePhase::CollectingLocal => "collecting_local",
            CyclePhase::Reconciling => "reconciling",
            CyclePhase::Executing => "executing",
        };
        f.write_str(s)
    }
}

// ============================================================================
// CycleReport
// ============================================================================

/// Why a cycle stopped before executing any action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleAbort {
    /// Phase in which the cycle was aborted
    pub phase: CyclePhase,
    /// The error that caused the abort
    pub error: SyncError,
}

/// Success/failure counts per action kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounts {
    pub uploaded: u32,
    pub upload_failures: u32,
    pub deleted: u32,
    pub delete_failures: u32,
}

impl CycleCounts {
    pub fn failures(&self) -> u32 {
        self.upload_failures + self.delete_failures
    }

    pub fn successes(&self) -> u32 {
        self.uploaded + self.deleted
    }
}

/// Summary of one synchronization cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Identifier used to correlate log lines of the same cycle
    pub cycle_id: Uuid,
    /// Wall-clock start of the cycle
    pub started_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Number of files in the local snapshot (0 if never collected)
    pub local_files: usize,
    /// Number of files in the remote snapshot (0 if never fetched)
    pub remote_files: usize,
    /// Set when the cycle stopped before execution
    pub abort: Option<CycleAbort>,
    /// Per-file results, uploads first
    pub outcomes: Vec<SyncOutcome>,
}

impl CycleReport {
    /// Starts an empty report stamped with a fresh cycle id
    pub fn begin() -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 0,
            local_files: 0,
            remote_files: 0,
            abort: None,
            outcomes: Vec::new(),
        }
    }

    /// Returns true if the cycle was skipped because of a local or remote error
    pub fn is_aborted(&self) -> bool {
        self.abort.is_some()
    }

    /// Returns true if the cycle ran to completion with no failed file
    pub fn is_clean(&self) -> bool {
        self.abort.is_none() && self.outcomes.iter().all(SyncOutcome::is_success)
    }

    /// Aggregated counts over all outcomes
    pub fn counts(&self) -> CycleCounts {
        let mut counts = CycleCounts::default();
        for outcome in &self.outcomes {
            match (outcome.action, outcome.status) {
                (ActionKind::Upload, OutcomeStatus::Success) => counts.uploaded += 1,
                (ActionKind::Upload, OutcomeStatus::Failure) => counts.upload_failures += 1,
                (ActionKind::Delete, OutcomeStatus::Success) => counts.deleted += 1,
                (ActionKind::Delete, OutcomeStatus::Failure) => counts.delete_failures += 1,
            }
        }
        counts
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
