use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{Endpoint, Mock};
use moka::future::Cache;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::{MockStore, UpdateMode};

/// Default retention window for registered mock sets.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// One client's registered mock set.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub mock: Arc<Mock>,
}

/// Multi-tenant store whose records expire `retention` after creation.
///
/// Expiry is enforced by the cache's time-to-live: an expired record is never
/// returned by a read, and is evicted by the cache's own maintenance.
/// The cache is unbounded, so a live record is only ever dropped by expiry or `close`.
pub struct EphemeralStore {
    records: Cache<String, Arc<StoredRecord>>,
    closed: AtomicBool,
}

impl EphemeralStore {
    pub fn new(retention: Duration) -> Self {
        let records = Cache::builder().time_to_live(retention).build();
        info!(
            event = "ephemeral_store_init",
            retention_secs = retention.as_secs(),
            "ephemeral mock store ready"
        );
        Self { records, closed: AtomicBool::new(false) }
    }

    /// Number of live records after pending evictions have been applied.
    pub async fn len(&self) -> u64 {
        self.records.run_pending_tasks().await;
        self.records.entry_count()
    }

    /// Look up a full record by identifier.
    pub async fn record(&self, id: &str) -> Result<Arc<StoredRecord>, ServiceError> {
        self.ensure_open()?;
        self.records
            .get(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("mock '{id}' not found")))
    }

    fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ServiceError::BackendUnavailable("ephemeral store is closed".into()));
        }
        Ok(())
    }
}

impl Default for EphemeralStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

#[async_trait]
impl MockStore for EphemeralStore {
    fn kind(&self) -> &'static str {
        "ephemeral"
    }

    async fn create(&self, mock: Mock) -> Result<String, ServiceError> {
        self.ensure_open()?;
        let mock = Arc::new(mock);
        loop {
            let id = Uuid::new_v4().simple().to_string();
            let record = Arc::new(StoredRecord {
                id: id.clone(),
                created_at: Utc::now(),
                mock: Arc::clone(&mock),
            });
            // insert-if-absent: a concurrent reader sees the whole record or nothing
            let entry = self.records.entry(id.clone()).or_insert_with(async move { record }).await;
            if entry.is_fresh() {
                info!(event = "mock_created", %id, paths = mock.len(), "registered mock set");
                return Ok(id);
            }
            warn!(event = "id_collision", %id, "generated identifier already in use; retrying");
        }
    }

    async fn fetch(&self, id: &str, path: &str) -> Result<Endpoint, ServiceError> {
        let record = self.record(id).await?;
        let endpoint = record.mock.get(path).cloned();
        debug!(%id, %path, found = endpoint.is_some(), "endpoint lookup");
        endpoint.ok_or_else(|| ServiceError::NotFound(format!("endpoint '{path}' not found")))
    }

    async fn fetch_mock(&self, id: &str) -> Result<Arc<Mock>, ServiceError> {
        Ok(Arc::clone(&self.record(id).await?.mock))
    }

    async fn update(&self, _id: &str, mode: UpdateMode) -> Result<(), ServiceError> {
        self.ensure_open()?;
        Err(ServiceError::Unsupported(format!(
            "{} is not supported: registered mocks are immutable",
            mode.kind().as_str()
        )))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.records.invalidate_all();
        self.records.run_pending_tasks().await;
        info!(event = "ephemeral_store_closed", "ephemeral mock store closed");
    }
}
