//! Sync command - run exactly one cycle
//!
//! Exits non-zero when the cycle aborted or any file operation failed, so
//! the command can be driven from cron or a systemd timer.

use anyhow::{bail, Context, Result};
use clap::Args;
use yadsync_core::config::Config;

use super::build_engine;
use crate::output::{get_formatter, render_report, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let engine = build_engine(config)?;

        let report = engine.run_cycle().await;

        if format.is_json() {
            let json = serde_json::to_value(&report).context("Failed to serialize cycle report")?;
            formatter.print_json(&json);
        } else {
            render_report(&*formatter, &report);
        }

        if let Some(abort) = &report.abort {
            bail!("sync cycle aborted: {}", abort.error);
        }
        let failures = report.counts().failures();
        if failures > 0 {
            bail!("{} file operation(s) failed", failures);
        }
        Ok(())
    }
}
