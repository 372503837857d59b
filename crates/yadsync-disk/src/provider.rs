//! DiskRemoteStore - IRemoteStore implementation for the Yandex Disk API
//!
//! Wraps a [`DiskClient`] and delegates to the listing and upload modules to
//! fulfil the [`IRemoteStore`] port contract, translating [`DiskError`] into
//! the domain [`SyncError`] taxonomy:
//!
//! | Operation   | DiskError                | SyncError                |
//! |-------------|--------------------------|--------------------------|
//! | list / info | `NotFound`               | `RemoteResourceNotFound` |
//! | list / info | anything else            | `RemoteAccess`           |
//! | stat        | anything but `NotFound`  | `RemoteAccess`           |
//! | upload      | anything                 | `FileUpload`             |
//! | delete      | transport failure        | `FileDelete`             |

use std::path::Path;

use tracing::debug;
use yadsync_core::config::Config;
use yadsync_core::domain::{FileName, FileRecord, Inventory, SyncError};
use yadsync_core::ports::{IRemoteStore, RootInfo};

use crate::client::DiskClient;
use crate::{listing, upload, DiskError};

/// Remote store backed by the Yandex Disk REST API
#[derive(Debug, Clone)]
pub struct DiskRemoteStore {
    client: DiskClient,
}

impl DiskRemoteStore {
    /// Creates a new `DiskRemoteStore` wrapping the given [`DiskClient`]
    pub fn new(client: DiskClient) -> Self {
        Self { client }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(DiskClient::from_config(config)?))
    }

    /// Returns the wrapped client
    pub fn client(&self) -> &DiskClient {
        &self.client
    }

    fn remote_error(&self, error: DiskError) -> SyncError {
        if error.is_not_found() {
            SyncError::RemoteResourceNotFound {
                path: self.client.root().to_string(),
            }
        } else {
            SyncError::RemoteAccess(error.to_string())
        }
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DiskRemoteStore {
    async fn list(&self) -> Result<Inventory, SyncError> {
        debug!(root = self.client.root(), "DiskRemoteStore::list");
        listing::list_files(&self.client)
            .await
            .map_err(|e| self.remote_error(e))
    }

    async fn upload(&self, local_path: &Path) -> Result<(), SyncError> {
        debug!(path = %local_path.display(), "DiskRemoteStore::upload");
        upload::upload_file(&self.client, local_path)
            .await
            .map(|_| ())
            .map_err(|e| SyncError::FileUpload {
                filename: local_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| local_path.display().to_string()),
                detail: e.to_string(),
            })
    }

    async fn delete(&self, name: &FileName) -> Result<bool, SyncError> {
        debug!(%name, "DiskRemoteStore::delete");
        let remote_path = self.client.remote_path(name.as_str());
        upload::delete_resource(&self.client, &remote_path)
            .await
            .map_err(|e| SyncError::FileDelete {
                filename: name.to_string(),
                detail: e.to_string(),
            })
    }

    async fn stat(&self, name: &FileName) -> Result<Option<FileRecord>, SyncError> {
        debug!(%name, "DiskRemoteStore::stat");
        listing::stat(&self.client, name)
            .await
            .map_err(|e| SyncError::RemoteAccess(e.to_string()))
    }

    async fn root_info(&self) -> Result<RootInfo, SyncError> {
        listing::root_info(&self.client)
            .await
            .map_err(|e| self.remote_error(e))
    }

    fn root(&self) -> &str {
        self.client.root()
    }
}
