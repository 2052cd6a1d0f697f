use std::sync::Arc;

use common::observability::{ENDPOINT_HITS_TOTAL, ENDPOINT_MISSES_TOTAL, MOCKS_CREATED_TOTAL};
use models::{normalize, Endpoint, Method, Mock};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::storage::{MockStore, UpdateKind, UpdateMode};

/// Application service in front of a `MockStore`.
/// Runs the normalizer before any mutation and performs method dispatch.
#[derive(Clone)]
pub struct MockService {
    store: Arc<dyn MockStore>,
}

impl MockService {
    pub fn new(store: Arc<dyn MockStore>) -> Self { Self { store } }

    pub fn backend(&self) -> &'static str { self.store.kind() }

    /// Normalize `raw` and register it; returns the new identifier.
    #[instrument(skip(self, raw), fields(backend = self.store.kind(), bytes = raw.len()))]
    pub async fn create_mock(&self, raw: &[u8]) -> Result<String, ServiceError> {
        let mock = normalize(raw)?;
        let id = self.store.create(mock).await?;
        MOCKS_CREATED_TOTAL.inc();
        Ok(id)
    }

    /// Replace, merge into or clear the single-tenant snapshot.
    /// The body is ignored for `Clear`; otherwise it must normalize first.
    #[instrument(skip(self, raw), fields(backend = self.store.kind(), mode = kind.as_str()))]
    pub async fn update_mock(&self, raw: &[u8], kind: UpdateKind) -> Result<(), ServiceError> {
        let mode = match kind {
            UpdateKind::Replace => UpdateMode::Replace(normalize(raw)?),
            UpdateKind::Merge => UpdateMode::Merge(normalize(raw)?),
            UpdateKind::Clear => UpdateMode::Clear,
        };
        self.store.update("", mode).await
    }

    /// The mock set addressed by `id` (ignored by the static backend).
    pub async fn get_mock(&self, id: &str) -> Result<Arc<Mock>, ServiceError> {
        self.store.fetch_mock(id).await
    }

    pub async fn resolve_endpoint(&self, id: &str, path: &str) -> Result<Endpoint, ServiceError> {
        let res = self.store.fetch(id, path).await;
        if let Err(ServiceError::NotFound(_)) = &res {
            ENDPOINT_MISSES_TOTAL.inc();
        }
        res
    }

    /// Resolve and dispatch in one step.
    pub async fn respond(&self, id: &str, path: &str, method: &str) -> Result<Value, ServiceError> {
        let endpoint = self.resolve_endpoint(id, path).await?;
        let body = dispatch_method(&endpoint, method);
        match &body {
            Ok(_) => ENDPOINT_HITS_TOTAL.with_label_values(&[method]).inc(),
            Err(_) => ENDPOINT_MISSES_TOTAL.inc(),
        }
        debug!(%id, %path, %method, hit = body.is_ok(), "mock dispatch");
        body
    }

    pub async fn close(&self) { self.store.close().await }
}

/// Look up `method` in `endpoint`; the stored body is returned unchanged.
pub fn dispatch_method(endpoint: &Endpoint, method: &str) -> Result<Value, ServiceError> {
    method
        .parse::<Method>()
        .ok()
        .and_then(|m| endpoint.get(m))
        .cloned()
        .ok_or_else(|| ServiceError::NotImplemented(format!("method {method} not registered")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ephemeral::EphemeralStore;
    use crate::storage::static_store::StaticStore;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn dispatch_returns_stored_value_or_not_implemented() {
        let body = json!({"nested": {"list": [1, "two", null], "f": 1.5}});
        let endpoint: Endpoint = [(Method::Get, body.clone())].into_iter().collect();

        assert_eq!(dispatch_method(&endpoint, "GET").unwrap(), body);
        assert!(matches!(dispatch_method(&endpoint, "POST"), Err(ServiceError::NotImplemented(_))));
        assert!(matches!(dispatch_method(&endpoint, "HEAD"), Err(ServiceError::NotImplemented(_))));
    }

    #[tokio::test]
    async fn create_and_respond_through_ephemeral_backend() -> Result<(), anyhow::Error> {
        let svc = MockService::new(Arc::new(EphemeralStore::default()));
        let id = svc.create_mock(br#"{"items": {"get": [1, 2]}, "/": {"POST": {"ok": true}}}"#).await?;

        assert_eq!(svc.respond(&id, "/items", "GET").await?, json!([1, 2]));
        assert_eq!(svc.respond(&id, "/", "POST").await?, json!({"ok": true}));
        assert!(matches!(svc.respond(&id, "/items", "DELETE").await, Err(ServiceError::NotImplemented(_))));
        assert!(matches!(svc.respond(&id, "/nope", "GET").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_submissions_fail_before_storage() -> Result<(), anyhow::Error> {
        let store = Arc::new(EphemeralStore::default());
        let svc = MockService::new(store.clone());
        assert!(matches!(svc.create_mock(b"not json").await, Err(ServiceError::MalformedInput(_))));
        assert!(matches!(
            svc.create_mock(br#"{"/a": {"head": 1}}"#).await,
            Err(ServiceError::InvalidMethod(m)) if m == "head"
        ));
        assert_eq!(store.len().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_leaves_snapshot_unchanged() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("mock_service_{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, br#"{"/a": {"GET": {"x": 1}}}"#).await?;
        let svc = MockService::new(StaticStore::open(&path).await?);
        let before = svc.get_mock("").await?;

        let err = svc.update_mock(br#"{"/b": {"GET": 1, "bogus": 2}}"#, UpdateKind::Merge).await;
        assert!(matches!(err, Err(ServiceError::InvalidMethod(_))));
        assert!(svc.update_mock(b"{", UpdateKind::Replace).await.is_err());
        assert_eq!(svc.get_mock("").await?, before);

        // clear ignores the body entirely
        svc.update_mock(b"", UpdateKind::Clear).await?;
        assert!(svc.get_mock("").await?.is_empty());
        assert!(matches!(svc.create_mock(b"{}").await, Err(ServiceError::Unsupported(_))));

        svc.close().await;
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
