//! Upload and delete operations
//!
//! Uploading is two-phase:
//! 1. [`request_upload_link`] - `GET /resources/upload?path=<p>&overwrite=true`
//!    returns a pre-signed target URL
//! 2. [`upload_file`] - streams the local file to that URL with the method
//!    the API asked for (normally `PUT`)
//!
//! Overwrite is always requested so re-uploading after a partial failure
//! replaces the remote copy instead of conflicting with it.

use std::path::Path;

use reqwest::{header, Body, Method, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::client::{check_status, DiskClient};
use crate::DiskError;

/// Upload target returned by the first phase
#[derive(Debug, Clone, Deserialize)]
pub struct UploadLink {
    /// Pre-signed URL to send the bytes to
    pub href: String,
    /// HTTP method to use, usually `PUT`
    #[serde(default = "default_method")]
    pub method: String,
    /// Whether `href` is a URI template
    #[serde(default)]
    pub templated: bool,
}

fn default_method() -> String {
    "PUT".to_string()
}

/// Requests an upload target for `remote_path` with overwrite enabled
pub async fn request_upload_link(
    client: &DiskClient,
    remote_path: &str,
) -> Result<UploadLink, DiskError> {
    let response = client
        .request(Method::GET, "/resources/upload")
        .query(&[("path", remote_path), ("overwrite", "true")])
        .send()
        .await?;

    let link = check_status(response)
        .await?
        .json::<UploadLink>()
        .await
        .map_err(|e| DiskError::InvalidResponse(format!("upload link: {}", e)))?;

    // A template needs parameters this client never sends.
    if link.templated {
        return Err(DiskError::InvalidResponse(format!(
            "upload link for '{}' is a URI template",
            remote_path
        )));
    }
    Ok(link)
}

/// Uploads `local_path` to `root/<basename>`
///
/// The file is streamed, never buffered whole. The target URL does not get
/// the API token.
///
/// # Returns
/// The number of bytes sent
pub async fn upload_file(client: &DiskClient, local_path: &Path) -> Result<u64, DiskError> {
    let file_name = local_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' has no usable file name", local_path.display()),
            )
        })?;

    // Open first so an unreadable file never reserves a remote target.
    let file = tokio::fs::File::open(local_path).await?;
    let size = file.metadata().await?.len();

    let remote_path = client.remote_path(file_name);
    let link = request_upload_link(client, &remote_path).await?;
    debug!(remote_path, method = %link.method, "Upload target obtained");

    let method = Method::from_bytes(link.method.as_bytes())
        .map_err(|_| DiskError::InvalidResponse(format!("upload method '{}'", link.method)))?;

    let body = Body::wrap_stream(ReaderStream::new(file));
    let response = client
        .http_client()
        .request(method, &link.href)
        .header(header::CONTENT_LENGTH, size)
        .body(body)
        .send()
        .await?;
    check_status(response).await?;

    info!(remote_path, bytes = size, "File uploaded");
    Ok(size)
}

/// Deletes `remote_path`
///
/// # Returns
/// `Ok(true)` only on `204 No Content`. Any other status is `Ok(false)`;
/// only transport failures are errors. Never retried.
pub async fn delete_resource(client: &DiskClient, remote_path: &str) -> Result<bool, DiskError> {
    let response = client
        .request(Method::DELETE, "/resources")
        .query(&[("path", remote_path)])
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        debug!(remote_path, "Resource deleted");
        return Ok(true);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(remote_path, status = status.as_u16(), %body, "Delete not confirmed");
    Ok(false)
}
