//! Folder listing and metadata queries
//!
//! `GET /resources?path=<p>&limit=<n>&offset=<k>` returns the metadata of a
//! resource and, for folders, a page of its children under `_embedded`.
//! [`list_files`] walks the pages until the reported total is reached or a
//! short page arrives.

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, warn};
use yadsync_core::domain::{FileName, FileRecord, Inventory};
use yadsync_core::ports::RootInfo;

use crate::client::{check_status, DiskClient};
use crate::DiskError;

// ============================================================================
// API response types
// ============================================================================

/// Resource type as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Dir,
}

/// Metadata of a single resource
#[derive(Debug, Deserialize)]
pub struct Resource {
    /// Basename of the resource
    pub name: String,
    /// Full path, e.g. `disk:/Backup/a.txt`
    pub path: String,
    /// File or folder
    #[serde(rename = "type")]
    pub kind: ResourceType,
    /// Size in bytes; only present for files
    pub size: Option<u64>,
    /// Children page; only present for folders
    #[serde(rename = "_embedded")]
    pub embedded: Option<ResourceList>,
}

/// One page of folder children
#[derive(Debug, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub items: Vec<Resource>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Total number of children across all pages
    pub total: Option<u64>,
}

// ============================================================================
// Requests
// ============================================================================

/// Fetches the metadata of `path` with one page of children
pub async fn get_resource(
    client: &DiskClient,
    path: &str,
    limit: u32,
    offset: u64,
) -> Result<Resource, DiskError> {
    let response = client
        .request(Method::GET, "/resources")
        .query(&[
            ("path", path.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ])
        .send()
        .await?;

    check_status(response)
        .await?
        .json::<Resource>()
        .await
        .map_err(|e| DiskError::InvalidResponse(format!("resource metadata: {}", e)))
}

/// Lists every file directly under the client's root
///
/// Folders are skipped. Names the domain rejects are skipped with a warning.
pub async fn list_files(client: &DiskClient) -> Result<Inventory, DiskError> {
    let limit = client.page_size();
    let mut inventory = Inventory::new();
    let mut offset: u64 = 0;

    loop {
        let resource = get_resource(client, client.root(), limit, offset).await?;
        if resource.kind != ResourceType::Dir {
            return Err(DiskError::InvalidResponse(format!(
                "remote root '{}' is not a folder",
                client.root()
            )));
        }
        let page = resource.embedded.ok_or_else(|| {
            DiskError::InvalidResponse("folder listing without _embedded".to_string())
        })?;

        let received = page.items.len() as u64;
        for item in page.items {
            if item.kind != ResourceType::File {
                continue;
            }
            if let Some(record) = to_record(item) {
                inventory.insert(record);
            }
        }

        offset += received;
        debug!(offset, total = ?page.total, "Listing page received");

        // The server may cap pages below `limit`; trust `total` when present.
        let done = match page.total {
            Some(total) => received == 0 || offset >= total,
            None => received == 0 || received < u64::from(limit),
        };
        if done {
            break;
        }
    }

    debug!(files = inventory.len(), root = client.root(), "Remote listing complete");
    Ok(inventory)
}

/// Metadata of `root/<name>`, or `None` if it does not exist or is a folder
pub async fn stat(client: &DiskClient, name: &FileName) -> Result<Option<FileRecord>, DiskError> {
    match get_resource(client, &client.remote_path(name.as_str()), 1, 0).await {
        Ok(resource) if resource.kind == ResourceType::File => {
            Ok(Some(FileRecord::new(name.clone(), resource.size.unwrap_or(0))))
        }
        Ok(_) => Ok(None),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Metadata of the root folder itself
pub async fn root_info(client: &DiskClient) -> Result<RootInfo, DiskError> {
    let resource = get_resource(client, client.root(), 1, 0).await?;
    Ok(RootInfo {
        name: resource.name,
        path: resource.path,
        total_items: resource.embedded.and_then(|e| e.total),
    })
}

fn to_record(item: Resource) -> Option<FileRecord> {
    let name = match FileName::new(item.name) {
        Ok(name) => name,
        Err(e) => {
            warn!(path = %item.path, error = %e, "Skipping remote entry with unusable name");
            return None;
        }
    };
    Some(FileRecord::new(name, item.size.unwrap_or(0)))
}
