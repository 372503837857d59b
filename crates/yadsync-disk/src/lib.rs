//! yadsync Disk - Yandex Disk REST API client
//!
//! Provides an async client for the subset of the Yandex Disk API that
//! one-way folder sync needs:
//! - Paginated listing of a folder
//! - Two-phase upload (request a target URL, then stream the bytes)
//! - Deletion with `204 No Content` as the only confirmation
//! - Single-resource metadata lookups
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client bound to one remote root
//! - [`listing`] - Folder listing, stat, and root metadata
//! - [`upload`] - Upload link request and streaming upload
//! - [`provider`] - [`IRemoteStore`](yadsync_core::ports::IRemoteStore) adapter

pub mod client;
pub mod listing;
pub mod provider;
pub mod upload;

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when communicating with the Yandex Disk API
#[derive(Debug, Error)]
pub enum DiskError {
    /// The OAuth token is missing, invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks permission for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Server-suggested wait, if a `Retry-After` header was sent
        retry_after: Option<Duration>,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A local file involved in the request could not be read
    #[error("Local I/O error: {0}")]
    LocalIo(#[from] std::io::Error),
}

impl DiskError {
    /// Returns true if this error means the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiskError::NotFound(_))
    }
}
