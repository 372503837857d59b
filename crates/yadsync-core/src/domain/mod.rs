//! Domain entities and business logic
//!
//! This module contains the core domain types for yadsync:
//! - File records and inventories (one snapshot per side per cycle)
//! - Action sets, per-file outcomes and cycle reports
//! - The reconciliation function
//! - Domain-specific error types

pub mod actions;
pub mod errors;
pub mod inventory;
pub mod reconcile;

// Re-export commonly used types
pub use actions::{
    ActionKind, ActionSet, CycleAbort, CycleCounts, CyclePhase, CycleReport, OutcomeStatus,
    SyncOutcome,
};
pub use errors::{DomainError, ErrorKind, SyncError};
pub use inventory::{FileName, FileRecord, Inventory};
pub use reconcile::reconcile;
