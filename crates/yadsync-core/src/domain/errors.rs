//! Domain error types
//!
//! [`DomainError`] covers validation of domain values. [`SyncError`] is the
//! taxonomy every cycle failure is classified into:
//!
//! | Kind   | Variants                                   | Scope          |
//! |--------|--------------------------------------------|----------------|
//! | Local  | `LocalFolderNotFound`, `LocalRead`         | aborts a cycle |
//! | Remote | `RemoteAccess`, `RemoteResourceNotFound`   | aborts a cycle |
//! | File   | `FileUpload`, `FileDelete`                 | one file only  |

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A file name is empty, contains a path separator, or is a relative component
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// Coarse classification of a [`SyncError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Problem with the local folder; fatal to the cycle
    Local,
    /// Problem talking to the remote storage; fatal to the cycle
    Remote,
    /// Problem with a single file; the cycle continues
    File,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Local => "local",
            ErrorKind::Remote => "remote",
            ErrorKind::File => "file",
        };
        f.write_str(s)
    }
}

/// Errors produced while running a synchronization cycle
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum SyncError {
    /// The local folder does not exist or is not a directory
    #[error("Local folder not found: '{}'", path.display())]
    LocalFolderNotFound {
        /// The configured folder
        path: PathBuf,
    },

    /// The local folder exists but could not be enumerated
    #[error("Failed to read local folder '{}': {detail}", path.display())]
    LocalRead {
        /// The folder or entry that failed
        path: PathBuf,
        /// Underlying I/O error text
        detail: String,
    },

    /// Transport, authentication or decoding failure against the remote API
    #[error("Remote storage access failed: {0}")]
    RemoteAccess(String),

    /// The remote root folder does not exist (HTTP 404)
    #[error("Remote resource '{path}' not found (404)")]
    RemoteResourceNotFound {
        /// The remote path that was requested
        path: String,
    },

    /// A single upload failed in either phase
    #[error("Failed to upload file '{filename}': {detail}")]
    FileUpload {
        /// Basename of the file
        filename: String,
        /// What went wrong
        detail: String,
    },

    /// A single remote deletion was not confirmed
    #[error("Failed to delete file '{filename}' from remote storage: {detail}")]
    FileDelete {
        /// Basename of the file
        filename: String,
        /// What went wrong
        detail: String,
    },
}

impl SyncError {
    /// Returns the coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::LocalFolderNotFound { .. } | SyncError::LocalRead { .. } => {
                ErrorKind::Local
            }
            SyncError::RemoteAccess(_) | SyncError::RemoteResourceNotFound { .. } => {
                ErrorKind::Remote
            }
            SyncError::FileUpload { .. } | SyncError::FileDelete { .. } => ErrorKind::File,
        }
    }

    /// Returns true if this error aborts the whole cycle
    pub fn is_cycle_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::File)
    }

    /// Stable variant name used as a structured log field
    pub fn variant_name(&self) -> &'static str {
        match self {
            SyncError::LocalFolderNotFound { .. } => "LocalFolderNotFound",
            SyncError::LocalRead { .. } => "LocalRead",
            SyncError::RemoteAccess(_) => "RemoteAccess",
            SyncError::RemoteResourceNotFound { .. } => "RemoteResourceNotFound",
            SyncError::FileUpload { .. } => "FileUpload",
            SyncError::FileDelete { .. } => "FileDelete",
        }
    }
}
