//! Listing, stat and root metadata against a mocked Disk API

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use yadsync_core::domain::{FileName, SyncError};
use yadsync_core::ports::IRemoteStore;
use yadsync_disk::{listing, DiskError};

use crate::common::{self, ROOT, TOKEN};

fn name(s: &str) -> FileName {
    FileName::new(s).unwrap()
}

#[tokio::test]
async fn test_list_sends_oauth_header_and_excludes_folders() {
    let (server, client) = common::setup_disk_mock().await;

    Mock::given(method("GET"))
        .and(path("/resources"))
        .and(query_param("path", ROOT))
        .and(header("Authorization", format!("OAuth {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::listing_page(
            vec![
                common::file_item("a.txt", 10),
                common::dir_item("photos"),
                common::file_item("b.bin", 0),
            ],
            1000,
            0,
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let inventory = listing::list_files(&client).await.expect("list failed");
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.get(&name("a.txt")).unwrap().size, 10);
    assert_eq!(inventory.get(&name("b.bin")).unwrap().size, 0);
    assert!(!inventory.contains(&name("photos")));
}

#[tokio::test]
async fn test_list_follows_pagination() {
    let (server, client) = common::setup_disk_mock().await;
    let client = client.with_page_size(2);

    common::mount_listing_page(
        &server,
        0,
        common::listing_page(
            vec![common::file_item("a", 1), common::file_item("b", 2)],
            2,
            0,
            5,
        ),
    )
    .await;
    common::mount_listing_page(
        &server,
        2,
        common::listing_page(
            vec![common::dir_item("c"), common::file_item("d", 4)],
            2,
            2,
            5,
        ),
    )
    .await;
    common::mount_listing_page(
        &server,
        4,
        common::listing_page(vec![common::file_item("e", 5)], 2, 4, 5),
    )
    .await;

    let inventory = listing::list_files(&client).await.expect("list failed");
    let names: Vec<&str> = inventory.names().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "d", "e"]);
    assert_eq!(inventory.total_bytes(), 12);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.url.query().unwrap_or_default().contains("limit=2")));
}

#[tokio::test]
async fn test_list_stops_when_total_reached_on_full_page() {
    let (server, client) = common::setup_disk_mock().await;
    let client = client.with_page_size(2);

    common::mount_listing_page(
        &server,
        0,
        common::listing_page(
            vec![common::file_item("a", 1), common::file_item("b", 2)],
            2,
            0,
            2,
        ),
    )
    .await;

    let inventory = listing::list_files(&client).await.unwrap();
    assert_eq!(inventory.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_continues_when_server_caps_page_size() {
    let (server, client) = common::setup_disk_mock().await;
    let client = client.with_page_size(3);

    // Asked for 3, served 2 per page; `total` says there is more.
    common::mount_listing_page(
        &server,
        0,
        common::listing_page(
            vec![common::file_item("a", 1), common::file_item("b", 2)],
            2,
            0,
            4,
        ),
    )
    .await;
    common::mount_listing_page(
        &server,
        2,
        common::listing_page(
            vec![common::file_item("c", 3), common::file_item("d", 4)],
            2,
            2,
            4,
        ),
    )
    .await;

    let inventory = listing::list_files(&client).await.expect("list failed");
    let names: Vec<&str> = inventory.names().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_without_total_stops_on_short_page() {
    let (server, client) = common::setup_disk_mock().await;
    let client = client.with_page_size(3);

    let mut body = common::listing_page(vec![common::file_item("a", 1)], 3, 0, 0);
    body["_embedded"]
        .as_object_mut()
        .unwrap()
        .remove("total");
    common::mount_listing_page(&server, 0, body).await;

    let inventory = listing::list_files(&client).await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_folder_lists_nothing() {
    let (server, client) = common::setup_disk_mock().await;
    common::mount_listing_page(&server, 0, common::listing_page(vec![], 1000, 0, 0)).await;

    let inventory = listing::list_files(&client).await.unwrap();
    assert!(inventory.is_empty());
}

#[tokio::test]
async fn test_missing_root_maps_to_resource_not_found() {
    let (server, store) = common::setup_store_mock().await;
    common::mount_resources_error(&server, 404, "DiskNotFoundError").await;

    let err = store.list().await.unwrap_err();
    assert_eq!(
        err,
        SyncError::RemoteResourceNotFound {
            path: ROOT.to_string()
        }
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_remote_access() {
    let (server, store) = common::setup_store_mock().await;
    common::mount_resources_error(&server, 401, "UnauthorizedError").await;

    let err = store.list().await.unwrap_err();
    match err {
        SyncError::RemoteAccess(detail) => {
            assert!(detail.contains("Unauthorized"), "{}", detail);
            assert!(detail.contains("UnauthorizedError"), "{}", detail);
        }
        other => panic!("expected RemoteAccess, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let (server, client) = common::setup_disk_mock().await;
    common::mount_resources_error(&server, 503, "ServiceUnavailable").await;

    let err = listing::list_files(&client).await.unwrap_err();
    assert!(matches!(err, DiskError::ServerError { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_listing_is_invalid_response() {
    let (server, client) = common::setup_disk_mock().await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = listing::list_files(&client).await.unwrap_err();
    assert!(matches!(err, DiskError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_stat_returns_size_or_none() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path("/resources"))
        .and(query_param("path", format!("{}/a.txt", ROOT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_item("a.txt", 77)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .and(query_param("path", format!("{}/gone.txt", ROOT)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "DiskNotFoundError"
        })))
        .mount(&server)
        .await;

    let record = store.stat(&name("a.txt")).await.unwrap().unwrap();
    assert_eq!(record.size, 77);
    assert!(store.stat(&name("gone.txt")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_root_info_reports_total() {
    let (server, store) = common::setup_store_mock().await;
    common::mount_listing_page(
        &server,
        0,
        common::listing_page(vec![common::file_item("a", 1)], 1, 0, 42),
    )
    .await;

    let info = store.root_info().await.unwrap();
    assert_eq!(info.name, "Backup");
    assert_eq!(info.path, format!("disk:{}", ROOT));
    assert_eq!(info.total_items, Some(42));
}
