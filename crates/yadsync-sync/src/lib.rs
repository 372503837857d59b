//! yadsync Sync - one-way folder synchronization
//!
//! Provides:
//! - Local inventory collection (flat, regular files only)
//! - The per-cycle sync driver: validate, fetch, collect, reconcile, execute
//! - A fixed-delay scheduler with cooperative cancellation
//!
//! ## Modules
//!
//! - [`filesystem`] - Builds the local and remote inventories for a cycle
//! - [`engine`] - Runs one cycle and produces a [`CycleReport`](yadsync_core::domain::CycleReport)
//! - [`scheduler`] - Repeats cycles with a wait-after-completion interval

pub mod engine;
pub mod filesystem;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{SyncEngine, SyncPlan};
pub use scheduler::{SchedulerSummary, SyncScheduler};
