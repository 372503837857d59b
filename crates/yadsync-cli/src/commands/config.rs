//! Config command - view and validate the effective configuration
//!
//! The effective configuration is the file (if any) with environment
//! variables applied on top. The token is never printed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use yadsync_core::config::Config;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Check the effective configuration for missing or invalid values
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(
        &self,
        config: &Config,
        explicit_path: Option<&Path>,
        format: OutputFormat,
    ) -> Result<()> {
        match self {
            ConfigCommand::Show => show(config, format),
            ConfigCommand::Validate => validate(config, format),
            ConfigCommand::Path => {
                let path = config_path(explicit_path);
                let formatter = get_formatter(format);
                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "path": path,
                        "exists": path.exists(),
                    }));
                } else {
                    println!("{}", path.display());
                }
                Ok(())
            }
        }
    }
}

fn config_path(explicit_path: Option<&Path>) -> PathBuf {
    explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

fn show(config: &Config, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let redacted = config.redacted();

    if format.is_json() {
        let json =
            serde_json::to_value(&redacted).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        let yaml =
            serde_yaml::to_string(&redacted).context("Failed to serialize configuration to YAML")?;
        print!("{}", yaml);
    }
    Ok(())
}

fn validate(config: &Config, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let errors = config.validate();

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors
                .iter()
                .map(|e| serde_json::json!({"field": e.field, "message": e.message}))
                .collect::<Vec<_>>(),
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
    } else {
        for e in &errors {
            formatter.error(&e.to_string());
        }
    }

    if !errors.is_empty() {
        bail!("configuration has {} error(s)", errors.len());
    }
    Ok(())
}
