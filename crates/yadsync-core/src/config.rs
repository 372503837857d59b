//! Configuration module for yadsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! an environment-variable overlay, validation, defaults, and a builder pattern
//! for programmatic use.
//!
//! The configuration is built once at startup and passed by reference into
//! the sync engine and scheduler; nothing reads it from global state.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default Yandex Disk REST API base URL.
pub const DEFAULT_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";

/// Placeholder shown instead of the credential token.
const REDACTED: &str = "********";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for yadsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    /// Environment values that could not be applied, reported by `validate`
    #[serde(skip)]
    env_errors: Vec<ValidationError>,
}

/// Remote storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// OAuth token sent as `Authorization: OAuth <token>`. Required.
    pub token: Option<String>,
    /// Remote root folder all operations are scoped to, e.g. `/Backup`. Required.
    pub root: Option<String>,
    /// Base URL of the REST API.
    pub api_url: String,
    /// Number of entries requested per listing page.
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Local folder mirrored to the remote root. Required.
    pub local_folder: Option<PathBuf>,
    /// Seconds to wait after a cycle completes before starting the next.
    pub interval_secs: u64,
    /// Maximum number of uploads or deletes in flight at once.
    pub max_concurrent_transfers: u32,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Path to the structured (JSON lines) log file.
    pub file: PathBuf,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            token: None,
            root: None,
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 1000,
            timeout_secs: 60,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_folder: None,
            interval_secs: 60,
            max_concurrent_transfers: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("yadsync");
        Self {
            level: "info".to_string(),
            file: data_dir.join("yadsync.log"),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Environment variables consulted by [`Config::apply_env`], in priority order
/// per key. The unprefixed names are accepted for compatibility with existing
/// `.env`-style deployments.
const ENV_TOKEN: &[&str] = &["YADSYNC_TOKEN", "TOKEN"];
const ENV_REMOTE_ROOT: &[&str] = &["YADSYNC_REMOTE_ROOT", "YANDEX_DISK_PATH"];
const ENV_LOCAL_FOLDER: &[&str] = &["YADSYNC_LOCAL_FOLDER", "LOCAL_FOLDER"];
const ENV_API_URL: &[&str] = &["YADSYNC_API_URL"];
const ENV_INTERVAL: &[&str] = &["YADSYNC_INTERVAL"];
const ENV_LOG_LEVEL: &[&str] = &["YADSYNC_LOG_LEVEL"];
const ENV_LOG_FILE: &[&str] = &["YADSYNC_LOG_FILE"];

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the effective configuration for a process.
    ///
    /// - An explicit `path` must exist and parse.
    /// - Without one, [`Config::default_path`] is used if present, otherwise
    ///   the defaults.
    /// - Environment variables are applied last.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::load(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/yadsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("yadsync")
            .join("config.yaml")
    }

    /// Overlay values from environment variables.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests. Empty
    /// values are ignored. An unparsable interval leaves the current value in
    /// place and is reported by [`validate`](Self::validate).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        };

        if let Some(token) = first(ENV_TOKEN) {
            self.remote.token = Some(token);
        }
        if let Some(root) = first(ENV_REMOTE_ROOT) {
            self.remote.root = Some(root);
        }
        if let Some(url) = first(ENV_API_URL) {
            self.remote.api_url = url;
        }
        if let Some(folder) = first(ENV_LOCAL_FOLDER) {
            self.sync.local_folder = Some(PathBuf::from(folder));
        }
        if let Some(raw) = first(ENV_INTERVAL) {
            match raw.trim().parse() {
                Ok(secs) => self.sync.interval_secs = secs,
                Err(_) => self.env_errors.push(ValidationError {
                    field: "sync.interval_secs".into(),
                    message: format!(
                        "invalid value '{}' from {}; expected whole seconds",
                        raw, ENV_INTERVAL[0]
                    ),
                }),
            }
        }
        if let Some(level) = first(ENV_LOG_LEVEL) {
            self.logging.level = level.to_lowercase();
        }
        if let Some(file) = first(ENV_LOG_FILE) {
            self.logging.file = PathBuf::from(file);
        }
    }

    /// A copy safe to print: the token is replaced by a placeholder.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.remote.token.is_some() {
            copy.remote.token = Some(REDACTED.to_string());
        }
        copy
    }

    /// The remote root without a trailing slash (`/` stays `/`).
    pub fn remote_root(&self) -> Option<&str> {
        self.remote.root.as_deref().map(normalize_remote_root)
    }
}

/// Strips trailing slashes from a remote folder path, keeping a bare root.
pub fn normalize_remote_root(root: &str) -> &str {
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() && root.starts_with('/') {
        "/"
    } else if trimmed.ends_with(':') && root.len() > trimmed.len() {
        // `disk:/` style roots keep their slash
        &root[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. The local folder's
    /// existence is deliberately not checked here: a missing folder only
    /// skips cycles, it does not stop the process.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.env_errors.clone();

        // --- remote ---
        if self.remote.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            errors.push(ValidationError {
                field: "remote.token".into(),
                message: "is required (set it in the config file or YADSYNC_TOKEN)".into(),
            });
        }
        if self.remote.root.as_deref().map_or(true, |r| r.trim().is_empty()) {
            errors.push(ValidationError {
                field: "remote.root".into(),
                message: "is required (set it in the config file or YADSYNC_REMOTE_ROOT)".into(),
            });
        }
        if !(self.remote.api_url.starts_with("http://")
            || self.remote.api_url.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "remote.api_url".into(),
                message: format!("must be an http(s) URL, got '{}'", self.remote.api_url),
            });
        }
        if self.remote.page_size == 0 {
            errors.push(ValidationError {
                field: "remote.page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.remote.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "remote.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- sync ---
        match &self.sync.local_folder {
            None => errors.push(ValidationError {
                field: "sync.local_folder".into(),
                message: "is required (set it in the config file or YADSYNC_LOCAL_FOLDER)".into(),
            }),
            Some(p) if p.as_os_str().is_empty() => errors.push(ValidationError {
                field: "sync.local_folder".into(),
                message: "must not be empty".into(),
            }),
            Some(_) => {}
        }
        if self.sync.interval_secs == 0 {
            errors.push(ValidationError {
                field: "sync.interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.max_concurrent_transfers == 0 || self.sync.max_concurrent_transfers > 32 {
            errors.push(ValidationError {
                field: "sync.max_concurrent_transfers".into(),
                message: "must be in range 1..=32".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use yadsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .remote_token("token")
///     .remote_root("/Backup")
///     .sync_local_folder(PathBuf::from("/home/user/backup"))
///     .sync_interval_secs(300)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- remote ---

    pub fn remote_token(mut self, token: impl Into<String>) -> Self {
        self.config.remote.token = Some(token.into());
        self
    }

    pub fn remote_root(mut self, root: impl Into<String>) -> Self {
        self.config.remote.root = Some(root.into());
        self
    }

    pub fn remote_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.api_url = url.into();
        self
    }

    pub fn remote_page_size(mut self, n: u32) -> Self {
        self.config.remote.page_size = n;
        self
    }

    pub fn remote_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.remote.timeout_secs = seconds;
        self
    }

    // --- sync ---

    pub fn sync_local_folder(mut self, folder: PathBuf) -> Self {
        self.config.sync.local_folder = Some(folder);
        self
    }

    pub fn sync_interval_secs(mut self, seconds: u64) -> Self {
        self.config.sync.interval_secs = seconds;
        self
    }

    pub fn sync_max_concurrent_transfers(mut self, n: u32) -> Self {
        self.config.sync.max_concurrent_transfers = n;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_file(mut self, file: PathBuf) -> Self {
        self.config.logging.file = file;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
