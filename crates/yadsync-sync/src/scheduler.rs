//! Sync scheduler - repeats sync cycles with a fixed delay
//!
//! The first cycle runs immediately. After each cycle completes the scheduler
//! waits `interval` before starting the next, so cycles never overlap and a
//! slow cycle pushes the next one back.
//!
//! ## Cancellation
//!
//! Cancellation is cooperative through a [`CancellationToken`]. The token is
//! only observed between cycles: a running cycle always finishes, including
//! any in-flight uploads, and the scheduler then returns instead of sleeping.
//!
//! ```text
//! ┌──────────┐   done   ┌────────────────┐  interval  ┌──────────┐
//! │  cycle   │ ───────→ │ sleep / cancel │ ─────────→ │  cycle   │ ...
//! └──────────┘          └────────────────┘            └──────────┘
//!                              │ cancelled
//!                              ↓
//!                            return
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use yadsync_core::domain::CycleReport;

use crate::engine::SyncEngine;

/// What a scheduler run did
#[derive(Debug, Clone, Default)]
pub struct SchedulerSummary {
    /// Cycles started (and therefore finished)
    pub cycles_run: u64,
    /// Cycles that stopped before executing actions
    pub cycles_aborted: u64,
    /// Failed uploads and deletes across all cycles
    pub file_failures: u64,
    /// True if the run ended because the token was cancelled
    pub cancelled: bool,
    /// Report of the most recent cycle
    pub last_report: Option<CycleReport>,
}

impl SchedulerSummary {
    fn record(&mut self, report: CycleReport) {
        self.cycles_run += 1;
        if report.is_aborted() {
            self.cycles_aborted += 1;
        }
        self.file_failures += u64::from(report.counts().failures());
        self.last_report = Some(report);
    }
}

/// Runs a [`SyncEngine`] on a wait-after-completion schedule
pub struct SyncScheduler {
    engine: SyncEngine,
    /// Delay between the end of one cycle and the start of the next
    interval: Duration,
    /// Stop after this many cycles; `None` runs until cancelled
    max_cycles: Option<u64>,
    cancel: CancellationToken,
}

impl SyncScheduler {
    /// Creates a scheduler with its own cancellation token
    pub fn new(engine: SyncEngine, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            max_cycles: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops after `cycles` cycles
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that stops the scheduler at the next sleep boundary
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Runs cycles until cancelled or `max_cycles` is reached
    pub async fn run(&self) -> SchedulerSummary {
        let mut summary = SchedulerSummary::default();

        info!(
            interval_secs = self.interval.as_secs(),
            max_cycles = ?self.max_cycles,
            "Sync scheduler starting"
        );

        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let report = self.engine.run_cycle().await;
            summary.record(report);

            if self
                .max_cycles
                .is_some_and(|max| summary.cycles_run >= max)
            {
                debug!(cycles = summary.cycles_run, "Cycle limit reached");
                break;
            }

            debug!(
                next_in_secs = self.interval.as_secs(),
                "Waiting for next cycle"
            );
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            cycles = summary.cycles_run,
            aborted = summary.cycles_aborted,
            file_failures = summary.file_failures,
            cancelled = summary.cancelled,
            "Sync scheduler stopped"
        );
        summary
    }
}
