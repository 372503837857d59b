//! Inventory collection for both sides of a cycle
//!
//! The local side is a flat scan of one folder: regular files directly inside
//! it, no recursion. Symlinks are followed, so a link to a regular file counts
//! as that file and a link to a folder is skipped. The remote side is whatever
//! the [`IRemoteStore`] lists.
//!
//! Inventories are built fresh every cycle and never cached.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, instrument, warn};
use yadsync_core::domain::{FileName, FileRecord, Inventory, SyncError};
use yadsync_core::ports::IRemoteStore;

/// Checks that `folder` exists and is a directory
pub async fn validate_folder(folder: &Path) -> Result<(), SyncError> {
    match tokio::fs::metadata(folder).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(SyncError::LocalFolderNotFound {
            path: folder.to_path_buf(),
        }),
    }
}

/// Collects the regular files directly inside `folder`
///
/// # Errors
/// - [`SyncError::LocalFolderNotFound`] if `folder` is missing or not a directory
/// - [`SyncError::LocalRead`] if the folder or one of its entries cannot be read
#[instrument(skip_all, fields(folder = %folder.display()))]
pub async fn local_inventory(folder: &Path) -> Result<Inventory, SyncError> {
    let read_error = |path: &Path, e: std::io::Error| SyncError::LocalRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut entries = match tokio::fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SyncError::LocalFolderNotFound {
                path: folder.to_path_buf(),
            })
        }
        Err(e) => return Err(read_error(folder, e)),
    };

    let mut inventory = Inventory::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| read_error(folder, e))?
    {
        let path = entry.path();

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            // Removed since the listing, or a dangling symlink.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Entry vanished during scan");
                continue;
            }
            Err(e) => return Err(read_error(&path, e)),
        };
        if !meta.is_file() {
            continue;
        }

        let raw = match entry.file_name().into_string() {
            Ok(raw) => raw,
            Err(raw) => {
                warn!(name = ?raw, "Skipping local file with non UTF-8 name");
                continue;
            }
        };
        match FileName::new(raw) {
            Ok(name) => {
                inventory.insert(FileRecord::new(name, meta.len()));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping local file"),
        }
    }

    debug!(
        files = inventory.len(),
        bytes = inventory.total_bytes(),
        "Local inventory collected"
    );
    Ok(inventory)
}

/// Fetches the remote inventory for the store's root
pub async fn remote_inventory(store: &dyn IRemoteStore) -> Result<Inventory, SyncError> {
    let inventory = store.list().await?;
    debug!(files = inventory.len(), root = store.root(), "Remote inventory fetched");
    Ok(inventory)
}
