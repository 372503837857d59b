//! Status command - remote folder and pending work
//!
//! Shows the remote root's metadata and the size of both inventories, plus
//! how many uploads and deletes the next cycle would perform.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use yadsync_core::config::Config;

use super::{build_engine, plan_logged};
use crate::output::{files, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let engine = build_engine(config)?;

        let root = engine
            .store()
            .root_info()
            .await
            .context("Failed to read remote folder")?;
        info!(remote_root = %root.path, "Remote folder reachable");

        let plan = plan_logged(&engine).await;

        if format.is_json() {
            let mut json = serde_json::json!({
                "remote": root,
                "local_folder": engine.local_folder(),
                "interval_secs": config.sync.interval_secs,
            });
            match &plan {
                Ok(plan) => {
                    json["local_files"] = plan.local.len().into();
                    json["local_bytes"] = plan.local.total_bytes().into();
                    json["remote_files"] = plan.remote.len().into();
                    json["pending_uploads"] = plan.actions.uploads.len().into();
                    json["pending_deletes"] = plan.actions.deletes.len().into();
                }
                Err(abort) => {
                    json["error"] = abort.error.to_string().into();
                }
            }
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!("Remote folder: {} ({})", root.name, root.path));
        if let Some(total) = root.total_items {
            formatter.info(&format!("Remote entries: {}", total));
        }
        formatter.info(&format!(
            "Local folder:   {}",
            engine.local_folder().display()
        ));
        formatter.info(&format!("Interval:       {}s", config.sync.interval_secs));

        match plan {
            Ok(plan) => {
                formatter.info(&format!(
                    "Local:  {} ({} bytes)",
                    files(plan.local.len()),
                    plan.local.total_bytes()
                ));
                formatter.info(&format!("Remote: {}", files(plan.remote.len())));
                formatter.info(&format!(
                    "Pending: {} to upload, {} to delete",
                    plan.actions.uploads.len(),
                    plan.actions.deletes.len()
                ));
            }
            Err(abort) => formatter.warn(&format!(
                "Inventory unavailable while {}: {}",
                abort.phase, abort.error
            )),
        }
        Ok(())
    }
}
