//! Run command - the periodic sync service
//!
//! Runs a cycle immediately, then one cycle per `sync.interval_secs` after
//! the previous one finishes. SIGINT and SIGTERM stop the service at the
//! next wait; a cycle in progress is allowed to finish.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use yadsync_core::config::Config;
use yadsync_sync::{SchedulerSummary, SyncScheduler};

use super::build_engine;
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Stop after this many cycles instead of running until interrupted
    #[arg(long)]
    pub cycles: Option<u64>,
}

impl RunCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let engine = build_engine(config)?;

        let mut scheduler =
            SyncScheduler::new(engine, Duration::from_secs(config.sync.interval_secs));
        if let Some(cycles) = self.cycles {
            scheduler = scheduler.with_max_cycles(cycles);
        }

        info!(
            local_folder = %scheduler.engine().local_folder().display(),
            remote_root = %scheduler.engine().store().root(),
            interval_secs = config.sync.interval_secs,
            "yadsync starting"
        );

        let shutdown_token = scheduler.cancellation_token();
        let signal_token = shutdown_token.clone();
        let signals = tokio::spawn(async move {
            shutdown_signal(signal_token).await;
        });

        let summary = scheduler.run().await;
        signals.abort();

        if summary.cancelled {
            info!("yadsync shut down gracefully");
        }
        print_summary(&*formatter, format, &summary);
        Ok(())
    }
}

fn print_summary(
    formatter: &dyn OutputFormatter,
    format: OutputFormat,
    summary: &SchedulerSummary,
) {
    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "cycles_run": summary.cycles_run,
            "cycles_aborted": summary.cycles_aborted,
            "file_failures": summary.file_failures,
            "cancelled": summary.cancelled,
            "last_cycle": summary.last_report,
        }));
        return;
    }

    formatter.success(&format!(
        "Ran {} cycle{}",
        summary.cycles_run,
        if summary.cycles_run == 1 { "" } else { "s" }
    ));
    if summary.cycles_aborted > 0 {
        formatter.warn(&format!("{} cycle(s) aborted", summary.cycles_aborted));
    }
    if summary.file_failures > 0 {
        formatter.warn(&format!(
            "{} file operation(s) failed",
            summary.file_failures
        ));
    }
}

/// Cancels `token` on SIGINT or SIGTERM
///
/// If a handler cannot be installed that signal is never observed; the other
/// one still works.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}
