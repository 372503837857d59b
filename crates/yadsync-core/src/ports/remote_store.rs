//! Remote store port (driven/secondary port)
//!
//! This module defines the capability set the sync driver needs from remote
//! storage. The primary implementation targets the Yandex Disk REST API,
//! but the trait only speaks in domain types so the driver can be exercised
//! against an in-memory store.
//!
//! ## Design Notes
//!
//! - Every operation is scoped to one remote root folder bound when the
//!   adapter is constructed.
//! - Errors are already classified into [`SyncError`] so the driver can
//!   decide between aborting the cycle and recording a per-file failure.
//! - Uses `#[async_trait]` for async trait methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncError;
use crate::domain::inventory::{FileName, FileRecord, Inventory};

/// Metadata about the remote root folder itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    /// Display name of the folder
    pub name: String,
    /// Full remote path, as reported by the provider
    pub path: String,
    /// Number of entries in the folder if the provider reports it
    pub total_items: Option<u64>,
}

/// Port trait for remote storage operations
///
/// ## Implementation Notes
///
/// - `list` must return the complete inventory of the root, following
///   pagination as needed. Folders are excluded.
/// - `upload` must overwrite an existing remote file of the same name so a
///   re-upload after a partial failure succeeds.
/// - `delete` returns `Ok(true)` only for a storage-confirmed deletion.
///   `Ok(false)` means the storage answered but did not confirm. Transport
///   failures are returned as errors. Implementations must not retry.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists all files directly under the remote root
    ///
    /// # Errors
    /// - [`SyncError::RemoteResourceNotFound`] if the root does not exist
    /// - [`SyncError::RemoteAccess`] on any other failure
    async fn list(&self) -> Result<Inventory, SyncError>;

    /// Uploads a local file to `root/<basename>`, overwriting any existing file
    ///
    /// # Errors
    /// [`SyncError::FileUpload`] if the file cannot be read or either upload
    /// phase fails.
    async fn upload(&self, local_path: &Path) -> Result<(), SyncError>;

    /// Deletes `root/<name>`
    ///
    /// # Returns
    /// `true` only on a confirmed deletion
    async fn delete(&self, name: &FileName) -> Result<bool, SyncError>;

    /// Returns the record for `root/<name>`, or `None` if it does not exist
    async fn stat(&self, name: &FileName) -> Result<Option<FileRecord>, SyncError>;

    /// Returns metadata about the remote root folder
    async fn root_info(&self) -> Result<RootInfo, SyncError>;

    /// The remote root path this store is bound to
    fn root(&self) -> &str;
}
