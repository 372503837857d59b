//! Console output for CLI commands
//!
//! Human output goes to stdout with status markers; errors and warnings go
//! to stderr. JSON output prints one document per command on stdout.

use yadsync_core::domain::{ActionSet, CycleReport, OutcomeStatus};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// JSON output formatter
///
/// Only `print_json` and `error` produce output; progress text is dropped so
/// stdout stays machine-readable.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, _message: &str) {}
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    if format.is_json() {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

// ============================================================================
// Shared renderers
// ============================================================================

/// `"1 file"` / `"3 files"`
pub fn files(n: usize) -> String {
    format!("{} file{}", n, if n == 1 { "" } else { "s" })
}

/// Milliseconds as `850ms` or `2.4s`
pub fn duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

/// Prints a cycle report in human form
pub fn render_report(formatter: &dyn OutputFormatter, report: &CycleReport) {
    if let Some(abort) = &report.abort {
        formatter.error(&format!(
            "Cycle aborted while {}: {}",
            abort.phase.to_string().replace('_', " "),
            abort.error
        ));
        return;
    }

    let counts = report.counts();
    if report.outcomes.is_empty() {
        formatter.success(&format!(
            "Already up to date ({} local, {} remote)",
            files(report.local_files),
            files(report.remote_files)
        ));
        return;
    }

    formatter.success(&format!(
        "Cycle finished in {}",
        duration(report.duration_ms)
    ));
    formatter.info(&format!(
        "Uploaded: {:>4}   failed: {}",
        counts.uploaded, counts.upload_failures
    ));
    formatter.info(&format!(
        "Deleted:  {:>4}   failed: {}",
        counts.deleted, counts.delete_failures
    ));

    for outcome in &report.outcomes {
        if outcome.status == OutcomeStatus::Failure {
            formatter.warn(&format!(
                "{} {}: {}",
                outcome.action,
                outcome.name,
                outcome.detail.as_deref().unwrap_or("unknown error")
            ));
        }
    }
}

/// The action set as JSON
pub fn actions_json(actions: &ActionSet) -> serde_json::Value {
    serde_json::json!({
        "uploads": actions.uploads.iter().map(|n| n.as_str()).collect::<Vec<_>>(),
        "deletes": actions.deletes.iter().map(|n| n.as_str()).collect::<Vec<_>>(),
    })
}
