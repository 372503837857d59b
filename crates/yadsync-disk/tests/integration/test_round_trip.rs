//! Upload followed by list against a stateful fake of the Disk API

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use yadsync_core::domain::FileName;
use yadsync_core::ports::IRemoteStore;

use crate::common::{self, ROOT};

/// Remote folder contents shared by the responders below
type Folder = Arc<Mutex<BTreeMap<String, u64>>>;

fn query(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.into_owned())
}

struct ListResponder {
    folder: Folder,
}

impl Respond for ListResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let folder = self.folder.lock().unwrap();
        let items = folder
            .iter()
            .map(|(name, size)| common::file_item(name, *size))
            .collect::<Vec<_>>();
        let total = items.len() as u64;
        ResponseTemplate::new(200).set_body_json(common::listing_page(items, 1000, 0, total))
    }
}

struct LinkResponder {
    base: String,
}

impl Respond for LinkResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let target = query(request, "path").unwrap_or_default();
        let name = target.rsplit('/').next().unwrap_or_default().to_string();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload-target/{}", self.base, name),
            "method": "PUT",
            "templated": false
        }))
    }
}

struct PutResponder {
    folder: Folder,
}

impl Respond for PutResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let name = request.url.path().trim_start_matches("/upload-target/");
        self.folder
            .lock()
            .unwrap()
            .insert(name.to_string(), request.body.len() as u64);
        ResponseTemplate::new(201)
    }
}

struct DeleteResponder {
    folder: Folder,
}

impl Respond for DeleteResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let target = query(request, "path").unwrap_or_default();
        let name = target.rsplit('/').next().unwrap_or_default();
        match self.folder.lock().unwrap().remove(name) {
            Some(_) => ResponseTemplate::new(204),
            None => ResponseTemplate::new(404),
        }
    }
}

async fn mount_fake_disk(server: &MockServer, folder: Folder) {
    Mock::given(method("GET"))
        .and(path("/resources/upload"))
        .respond_with(LinkResponder { base: server.uri() })
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resources"))
        .respond_with(ListResponder {
            folder: folder.clone(),
        })
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(PutResponder {
            folder: folder.clone(),
        })
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/resources"))
        .respond_with(DeleteResponder { folder })
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_uploaded_file_is_listed_with_exact_size() {
    let (server, store) = common::setup_store_mock().await;
    let folder: Folder = Arc::default();
    mount_fake_disk(&server, folder.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..65_537u32).map(|i| (i % 251) as u8).collect();
    let local = common::write_local(&dir, "blob.bin", &content);

    store.upload(&local).await.expect("upload failed");

    let inventory = store.list().await.expect("list failed");
    let record = inventory
        .get(&FileName::new("blob.bin").unwrap())
        .expect("uploaded file missing from listing");
    assert_eq!(record.size, content.len() as u64);
    assert_eq!(store.root(), ROOT);
}

#[tokio::test]
async fn test_reupload_overwrites_and_delete_removes() {
    let (server, store) = common::setup_store_mock().await;
    let folder: Folder = Arc::default();
    mount_fake_disk(&server, folder.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let local = common::write_local(&dir, "notes.txt", b"short");
    store.upload(&local).await.unwrap();

    std::fs::write(&local, b"a much longer body").unwrap();
    store.upload(&local).await.unwrap();

    let name = FileName::new("notes.txt").unwrap();
    let inventory = store.list().await.unwrap();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory.get(&name).unwrap().size, 18);

    assert_eq!(store.delete(&name).await, Ok(true));
    assert!(store.list().await.unwrap().is_empty());
    assert_eq!(store.delete(&name).await, Ok(false));
}
