use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use common::observability::SNAPSHOT_UPDATES_TOTAL;
use models::{normalize, Endpoint, Mock};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::persist::SnapshotWriter;
use crate::storage::{MockStore, UpdateMode};

/// Single-tenant store holding one mutable mock, mirrored to a JSON file.
///
/// Readers load the current snapshot without locking. Mutations build a new
/// snapshot and swap it in while holding `writer`, so they never interleave
/// and a reader sees either the old or the new mock, never a mix.
pub struct StaticStore {
    snapshot: Arc<ArcSwap<Mock>>,
    writer: Mutex<Option<SnapshotWriter>>,
    file_path: PathBuf,
}

impl StaticStore {
    /// Load the seed file and start the background writer.
    ///
    /// An unreadable or invalid seed is returned as an error; callers treat it
    /// as fatal.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        let bytes = tokio::fs::read(&file_path).await.map_err(|e| {
            ServiceError::BackendUnavailable(format!("cannot read {}: {e}", file_path.display()))
        })?;
        let mock = normalize(&bytes)?;
        info!(
            event = "static_store_init",
            path = %file_path.display(),
            paths = mock.len(),
            "loaded static mock file"
        );

        let snapshot = Arc::new(ArcSwap::from_pointee(mock));
        let writer = SnapshotWriter::spawn(file_path.clone(), Arc::clone(&snapshot));
        Ok(Arc::new(Self { snapshot, writer: Mutex::new(Some(writer)), file_path }))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Mock> {
        self.snapshot.load_full()
    }
}

#[async_trait]
impl MockStore for StaticStore {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn create(&self, _mock: Mock) -> Result<String, ServiceError> {
        Err(ServiceError::Unsupported(
            "static store is read-only for registration; update the snapshot instead".into(),
        ))
    }

    async fn fetch(&self, _id: &str, path: &str) -> Result<Endpoint, ServiceError> {
        self.snapshot
            .load()
            .get(path)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("endpoint '{path}' not found")))
    }

    async fn fetch_mock(&self, _id: &str) -> Result<Arc<Mock>, ServiceError> {
        Ok(self.snapshot())
    }

    async fn update(&self, _id: &str, mode: UpdateMode) -> Result<(), ServiceError> {
        let writer = self.writer.lock().await;
        let kind = mode.kind();
        let next = match mode {
            UpdateMode::Replace(mock) => mock,
            UpdateMode::Merge(overlay) => {
                let mut next = (**self.snapshot.load()).clone();
                next.merge(overlay);
                next
            }
            UpdateMode::Clear => Mock::new(),
        };
        let paths = next.len();
        self.snapshot.store(Arc::new(next));

        match writer.as_ref() {
            Some(w) => w.schedule(),
            None => warn!(
                event = "snapshot_not_persisted",
                mode = kind.as_str(),
                "store closed; update kept in memory only"
            ),
        }
        SNAPSHOT_UPDATES_TOTAL.with_label_values(&[kind.as_str()]).inc();
        info!(event = "snapshot_updated", mode = kind.as_str(), paths, "static snapshot updated");
        Ok(())
    }

    async fn close(&self) {
        let writer = self.writer.lock().await.take();
        if let Some(w) = writer {
            w.shutdown().await;
            info!(event = "static_store_closed", path = %self.file_path.display(), "static mock store closed");
        }
    }
}
