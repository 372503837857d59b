//! Test doubles for engine and scheduler tests
//!
//! - [`MemoryStore`]: in-memory [`IRemoteStore`] holding a name → size map
//!   and counting every call. Failures can be injected per operation or per
//!   file name.
//! - [`LogCapture`]: tracing layer that records every event with its fields.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use yadsync_core::domain::{FileName, FileRecord, Inventory, SyncError};
use yadsync_core::ports::{IRemoteStore, RootInfo};

#[derive(Default)]
pub(crate) struct MemoryStore {
    files: Mutex<BTreeMap<String, u64>>,
    list_error: Mutex<Option<SyncError>>,
    failing_uploads: Mutex<BTreeSet<String>>,
    unconfirmed_deletes: Mutex<BTreeSet<String>>,
    /// Operation log, e.g. `upload:a.txt`, in call order
    log: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_files(files: &[(&str, u64)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.files.lock().unwrap();
            for (name, size) in files {
                map.insert((*name).to_string(), *size);
            }
        }
        store
    }

    pub(crate) fn fail_list_with(&self, error: SyncError) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_upload_of(&self, name: &str) {
        self.failing_uploads.lock().unwrap().insert(name.to_string());
    }

    pub(crate) fn leave_delete_unconfirmed(&self, name: &str) {
        self.unconfirmed_deletes
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub(crate) fn files(&self) -> BTreeMap<String, u64> {
        self.files.lock().unwrap().clone()
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind
    pub(crate) fn network_calls(&self) -> usize {
        self.list_calls() + self.upload_calls() + self.delete_calls()
    }
}

#[async_trait::async_trait]
impl IRemoteStore for MemoryStore {
    async fn list(&self) -> Result<Inventory, SyncError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("list".to_string());
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, size)| FileRecord::new(FileName::new(name.as_str()).unwrap(), *size))
            .collect())
    }

    async fn upload(&self, local_path: &Path) -> Result<(), SyncError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let name = local_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        self.log.lock().unwrap().push(format!("upload:{}", name));

        if self.failing_uploads.lock().unwrap().contains(&name) {
            return Err(SyncError::FileUpload {
                filename: name,
                detail: "simulated transport error".to_string(),
            });
        }

        let size = tokio::fs::metadata(local_path)
            .await
            .map_err(|e| SyncError::FileUpload {
                filename: name.clone(),
                detail: e.to_string(),
            })?
            .len();
        self.files.lock().unwrap().insert(name, size);
        Ok(())
    }

    async fn delete(&self, name: &FileName) -> Result<bool, SyncError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("delete:{}", name));

        if self.unconfirmed_deletes.lock().unwrap().contains(name.as_str()) {
            return Ok(false);
        }
        Ok(self.files.lock().unwrap().remove(name.as_str()).is_some())
    }

    async fn stat(&self, name: &FileName) -> Result<Option<FileRecord>, SyncError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(name.as_str())
            .map(|size| FileRecord::new(name.clone(), *size)))
    }

    async fn root_info(&self) -> Result<RootInfo, SyncError> {
        Ok(RootInfo {
            name: "memory".to_string(),
            path: "mem:/".to_string(),
            total_items: Some(self.files.lock().unwrap().len() as u64),
        })
    }

    fn root(&self) -> &str {
        "mem:/"
    }
}

// ============================================================================
// LogCapture
// ============================================================================

/// One recorded tracing event
#[derive(Debug, Clone)]
pub(crate) struct CapturedEvent {
    pub(crate) level: Level,
    /// Field values as strings; the message is under `message`
    pub(crate) fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct FieldVisitor(BTreeMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Layer collecting events for assertions
#[derive(Clone, Default)]
pub(crate) struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Routes this thread's events into the capture until the guard drops
    ///
    /// Works with `#[tokio::test]`, whose runtime stays on the test thread.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub(crate) fn at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}
