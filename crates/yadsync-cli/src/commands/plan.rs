//! Plan command - dry run of the next cycle
//!
//! Builds both inventories and reconciles them without uploading or
//! deleting anything.

use anyhow::{bail, Result};
use clap::Args;
use yadsync_core::config::Config;

use super::{build_engine, plan_logged};
use crate::output::{actions_json, files, get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct PlanCommand {}

impl PlanCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let engine = build_engine(config)?;

        let plan = match plan_logged(&engine).await {
            Ok(plan) => plan,
            Err(abort) => bail!("could not plan while {}: {}", abort.phase, abort.error),
        };

        if format.is_json() {
            let mut json = actions_json(&plan.actions);
            json["local_files"] = plan.local.len().into();
            json["remote_files"] = plan.remote.len().into();
            formatter.print_json(&json);
            return Ok(());
        }

        if plan.actions.is_empty() {
            formatter.success(&format!(
                "Nothing to do ({} local, {} remote)",
                files(plan.local.len()),
                files(plan.remote.len())
            ));
            return Ok(());
        }

        formatter.success(&format!(
            "{} to upload, {} to delete",
            files(plan.actions.uploads.len()),
            files(plan.actions.deletes.len())
        ));
        for name in &plan.actions.uploads {
            let size = plan.local.get(name).map(|r| r.size).unwrap_or_default();
            formatter.info(&format!("+ {} ({} bytes)", name, size));
        }
        for name in &plan.actions.deletes {
            formatter.info(&format!("- {}", name));
        }
        Ok(())
    }
}
