//! Tracing subscriber setup
//!
//! Two layers share one filter:
//! - console: compact human lines on stderr
//! - file: JSON lines appended to `logging.file`, one object per event with
//!   timestamp, level, span fields (including `cycle_id`) and message
//!
//! `RUST_LOG` overrides the configured level entirely.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events follow the configured level; everything else is `warn`
const OWN_TARGETS: &[&str] = &["yadsync", "yadsync_core", "yadsync_disk", "yadsync_sync"];

/// Builds filter directives from the configured level and `-v` count
pub fn filter_directives(level: &str, verbose: u8) -> String {
    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|t| format!("{}={}", t, level)));
    directives.join(",")
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber
///
/// A log file that cannot be opened disables the file layer and is reported
/// as a warning on the console; it never stops the process.
pub fn init(level: &str, verbose: u8, log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level, verbose)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file, file_error) = match log_file.map(|p| (p, open_log_file(p))) {
        Some((_, Ok(f))) => (Some(f), None),
        Some((p, Err(e))) => (None, Some((p.to_path_buf(), e))),
        None => (None, None),
    };
    let file_layer = file.map(|f| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(Mutex::new(f))
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .try_init();

    if let Some((path, e)) = file_error {
        warn!(path = %path.display(), error = %e, "Log file unavailable, logging to console only");
    }
}
