//! Shared helpers for Disk API integration tests
//!
//! Each helper mounts the necessary mock endpoints on a wiremock server.
//! Clients are pointed at the server root, so API paths are `/resources...`.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yadsync_disk::client::DiskClient;
use yadsync_disk::provider::DiskRemoteStore;

pub const TOKEN: &str = "test-oauth-token";
pub const ROOT: &str = "/Backup";

/// Starts a server and returns a client bound to [`ROOT`]
pub async fn setup_disk_mock() -> (MockServer, DiskClient) {
    let server = MockServer::start().await;
    let client = DiskClient::with_base_url(TOKEN, ROOT, server.uri());
    (server, client)
}

/// Same as [`setup_disk_mock`] but wrapped in the port adapter
pub async fn setup_store_mock() -> (MockServer, DiskRemoteStore) {
    let (server, client) = setup_disk_mock().await;
    (server, DiskRemoteStore::new(client))
}

/// A file entry as the API lists it
pub fn file_item(name: &str, size: u64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "path": format!("disk:{}/{}", ROOT, name),
        "type": "file",
        "size": size,
        "mime_type": "application/octet-stream"
    })
}

/// A folder entry as the API lists it
pub fn dir_item(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "path": format!("disk:{}/{}", ROOT, name),
        "type": "dir"
    })
}

/// A folder listing page
pub fn listing_page(
    items: Vec<serde_json::Value>,
    limit: u64,
    offset: u64,
    total: u64,
) -> serde_json::Value {
    serde_json::json!({
        "name": "Backup",
        "path": format!("disk:{}", ROOT),
        "type": "dir",
        "_embedded": {
            "items": items,
            "limit": limit,
            "offset": offset,
            "total": total,
            "path": format!("disk:{}", ROOT),
            "sort": ""
        }
    })
}

/// Mounts a single listing page for the root at `offset`
pub async fn mount_listing_page(server: &MockServer, offset: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/resources"))
        .and(query_param("path", ROOT))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts an API error document with the given status on any `/resources` GET
pub async fn mount_resources_error(server: &MockServer, status: u16, error: &str) {
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "message": "error",
            "description": format!("{} description", error),
            "error": error
        })))
        .mount(server)
        .await;
}

/// Mounts the upload-link endpoint for `name`, pointing at `/upload-target/<name>`
pub async fn mount_upload_link(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/resources/upload"))
        .and(query_param("path", format!("{}/{}", ROOT, name)))
        .and(query_param("overwrite", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "operation_id": format!("op-{}", name),
            "href": format!("{}/upload-target/{}", server.uri(), name),
            "method": "PUT",
            "templated": false
        })))
        .mount(server)
        .await;
}

/// Mounts the upload target for `name` answering with `status`
pub async fn mount_upload_target(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("PUT"))
        .and(path(format!("/upload-target/{}", name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Writes `content` to `dir/name` and returns the path
pub fn write_local(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let p = dir.path().join(name);
    std::fs::write(&p, content).expect("write local file");
    p
}
