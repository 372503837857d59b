//! Yandex Disk API client
//!
//! Provides a typed HTTP client bound to one remote root folder. Handles the
//! `OAuth` authorization header, endpoint construction, remote path joining
//! and classification of non-success responses into [`DiskError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use yadsync_disk::client::DiskClient;
//!
//! # async fn example() -> Result<(), yadsync_disk::DiskError> {
//! let client = DiskClient::new("oauth-token", "/Backup");
//! let info = yadsync_disk::listing::root_info(&client).await?;
//! println!("{} holds {:?} entries", info.path, info.total_items);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::Context;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use yadsync_core::config::{normalize_remote_root, Config, DEFAULT_API_URL};

use crate::DiskError;

/// Entries requested per listing page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

// ============================================================================
// Error body
// ============================================================================

/// Error document returned by the API alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    /// Human-readable message (localized)
    message: Option<String>,
    /// English description
    description: Option<String>,
    /// Error class, e.g. `DiskNotFoundError`
    error: Option<String>,
}

impl ApiErrorBody {
    fn summary(self, fallback: String) -> String {
        match (self.error, self.description.or(self.message)) {
            (Some(error), Some(text)) => format!("{}: {}", error, text),
            (None, Some(text)) => text,
            (Some(error), None) => error,
            (None, None) => fallback,
        }
    }
}

// ============================================================================
// DiskClient
// ============================================================================

/// HTTP client for Yandex Disk API calls scoped to one remote root
#[derive(Clone)]
pub struct DiskClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests, without trailing slash
    base_url: String,
    /// OAuth token sent with every API request
    token: String,
    /// Remote root folder, normalized
    root: String,
    /// Listing page size
    page_size: u32,
}

impl DiskClient {
    /// Creates a client against the public API
    ///
    /// # Arguments
    /// * `token` - OAuth token for the Disk API
    /// * `root` - Remote folder every operation is scoped to
    pub fn new(token: impl Into<String>, root: impl Into<String>) -> Self {
        Self::with_base_url(token, root, DEFAULT_API_URL)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(
        token: impl Into<String>,
        root: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let root = root.into();
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            root: normalize_remote_root(&root).to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Builds a client from the `remote` section of the configuration
    ///
    /// Fails if the token or the root is missing, or if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let token = config
            .remote
            .token
            .as_deref()
            .context("remote.token is not configured")?;
        let root = config
            .remote_root()
            .context("remote.root is not configured")?;

        let client = Self::with_base_url(token, root, config.remote.api_url.as_str())
            .with_page_size(config.remote.page_size)
            .with_timeout(Duration::from_secs(config.remote.timeout_secs))
            .context("Failed to build HTTP client")?;
        Ok(client)
    }

    /// Sets the number of entries requested per listing page
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Rebuilds the underlying HTTP client with a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, DiskError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Returns the remote root folder
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the listing page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a reference to the current token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Full remote path of `name` inside the root
    pub fn remote_path(&self, name: &str) -> String {
        if self.root.ends_with('/') {
            format!("{}{}", self.root, name)
        } else {
            format!("{}/{}", self.root, name)
        }
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// Prepends the base URL and adds the `Authorization: OAuth` header.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g. "/resources")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
    }

    /// Returns the underlying HTTP client
    ///
    /// Upload targets are absolute pre-signed URLs and must not receive the
    /// API token, so they are requested through this client directly.
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for DiskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskClient")
            .field("base_url", &self.base_url)
            .field("root", &self.root)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// Passes a successful response through and classifies everything else
pub(crate) async fn check_status(response: Response) -> Result<Response, DiskError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let fallback = status
        .canonical_reason()
        .unwrap_or("no reason phrase")
        .to_string();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .unwrap_or_default()
        .summary(fallback);

    debug!(status = status.as_u16(), %message, "API returned error status");
    Err(classify(status, message, retry_after))
}

fn classify(status: StatusCode, message: String, retry_after: Option<Duration>) -> DiskError {
    match status {
        StatusCode::UNAUTHORIZED => DiskError::Unauthorized(message),
        StatusCode::FORBIDDEN => DiskError::Forbidden(message),
        StatusCode::NOT_FOUND => DiskError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => DiskError::TooManyRequests { retry_after },
        s if s.is_server_error() => DiskError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => DiskError::UnexpectedStatus {
            status: s.as_u16(),
            message,
        },
    }
}
